// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Parameters for CLEAN. Unlike arguments, parameters are always valid; they
//! can only be made through [`CleanParams::new`], [`Default`] or by parsing
//! [`crate::CleanArgs`].


use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

/// The default fraction of the peak that is subtracted each iteration.
pub const DEFAULT_GAIN: f64 = 0.1;

/// The default maximum number of CLEAN iterations.
pub const DEFAULT_MAX_ITERATIONS: u32 = 200;

/// The default threshold on the (normalised) improvement in residual RMS below
/// which CLEAN is considered converged.
pub const DEFAULT_TOLERANCE: f64 = 0.001;

/// Where the first CLEAN step is taken.
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, EnumIter, EnumString)]
pub enum InitialPeak {
    /// The peak starts at the origin with an amplitude of zero. The first
    /// iteration therefore subtracts nothing; it only finds the residual's
    /// real peak and sets the reference score. This is how CLEAN has
    /// traditionally behaved.
    #[default]
    #[strum(serialize = "zero")]
    Zero,

    /// The residual is scanned for its peak before the first iteration, so
    /// the first iteration takes a real step.
    #[strum(serialize = "scan")]
    Scan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CleanParams {
    /// The fraction of the peak that is subtracted each iteration. Always in
    /// (0, 1].
    pub(crate) gain: f64,

    pub(crate) max_iterations: u32,

    /// Always finite. A negative tolerance means CLEAN never converges; it
    /// only stops on divergence or after the maximum number of iterations.
    pub(crate) tolerance: f64,

    pub(crate) initial_peak: InitialPeak,

    /// Log every iteration at the info level, rather than the trace level.
    pub(crate) verbose: bool,
}

impl Default for CleanParams {
    fn default() -> Self {
        CleanParams {
            gain: DEFAULT_GAIN,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
            initial_peak: InitialPeak::default(),
            verbose: false,
        }
    }
}

impl CleanParams {
    pub fn new(
        gain: f64,
        max_iterations: u32,
        tolerance: f64,
        initial_peak: InitialPeak,
        verbose: bool,
    ) -> Result<CleanParams, CleanParamsError> {
        // This also catches NaN.
        if !(gain > 0.0 && gain <= 1.0) {
            return Err(CleanParamsError::GainOutOfRange(gain));
        }
        if !tolerance.is_finite() {
            return Err(CleanParamsError::InvalidTolerance(tolerance));
        }

        Ok(CleanParams {
            gain,
            max_iterations,
            tolerance,
            initial_peak,
            verbose,
        })
    }

    pub fn gain(&self) -> f64 {
        self.gain
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn initial_peak(&self) -> InitialPeak {
        self.initial_peak
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// The same parameters, but with every iteration logged at the info level
    /// (or not).
    pub fn with_verbose(self, verbose: bool) -> CleanParams {
        CleanParams { verbose, ..self }
    }
}

#[derive(Error, Debug)]
pub enum CleanParamsError {
    #[error("The CLEAN gain must be greater than 0 and at most 1; got {0}")]
    GainOutOfRange(f64),

    #[error("The CLEAN tolerance must be a finite number; got {0}")]
    InvalidTolerance(f64),

    #[error("Unrecognised initial peak '{got}'; supported values are: {}", *crate::args::INITIAL_PEAKS_COMMA_SEPARATED)]
    UnknownInitialPeak { got: String },
}
