// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The CLEAN deconvolution algorithm (Högbom).
//!
//! CLEAN is a greedy matching pursuit. Every iteration, a scaled copy of the
//! kernel (the point-spread function, or "dirty beam") is subtracted from the
//! residual (initially the dirty image) at the location of the residual's
//! largest-magnitude element, and the amplitude of the subtraction is added to
//! the model at that location. The kernel is treated as periodic, so all
//! shifts wrap around the edges of the arrays.
//!
//! Iteration stops when the residual's RMS grows (the step is undone), when
//! the improvement in RMS relative to the first iteration falls below a
//! tolerance, or when the maximum number of iterations is reached.

mod element;
mod error;
mod grid;
mod observer;

pub use element::{CleanElement, ElementKind, RealScalar};
pub use error::CleanError;
pub use grid::ToroidalDim;
pub use observer::{CleanObserver, IterationReport, ProgressObserver};

use log::{debug, info, trace, warn};
use ndarray::prelude::*;
use num_traits::{Float, One, Zero};

use crate::params::{CleanParams, InitialPeak};

/// How a CLEAN run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanOutcome {
    /// The improvement in the residual's RMS fell below the tolerance on this
    /// (zero-based) iteration. That iteration's step was kept.
    Converged(u32),

    /// The residual's RMS grew on this (zero-based) iteration. That
    /// iteration's step was not kept; the residual and model are exactly as
    /// they were at the start of the iteration.
    Diverged(u32),

    /// The maximum number of iterations was performed without converging or
    /// diverging.
    Exhausted(u32),
}

impl CleanOutcome {
    /// The signed iteration count traditionally returned by CLEAN: positive
    /// when converged, negative when diverged and the maximum number of
    /// iterations when exhausted.
    pub fn code(self) -> i64 {
        match self {
            CleanOutcome::Converged(i) => i64::from(i),
            CleanOutcome::Diverged(i) => -i64::from(i),
            CleanOutcome::Exhausted(n) => i64::from(n),
        }
    }

    pub fn iterations(self) -> u32 {
        match self {
            CleanOutcome::Converged(i) => i,
            CleanOutcome::Diverged(i) => i,
            CleanOutcome::Exhausted(n) => n,
        }
    }

    pub fn is_converged(self) -> bool {
        matches!(self, CleanOutcome::Converged(_))
    }

    pub fn is_diverged(self) -> bool {
        matches!(self, CleanOutcome::Diverged(_))
    }

    pub fn is_exhausted(self) -> bool {
        matches!(self, CleanOutcome::Exhausted(_))
    }
}

impl std::fmt::Display for CleanOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CleanOutcome::Converged(i) => write!(f, "converged on iteration {i}"),
            CleanOutcome::Diverged(i) => {
                write!(f, "diverged on iteration {i}; the last step was undone")
            }
            CleanOutcome::Exhausted(n) => {
                write!(f, "did not converge within {n} iterations")
            }
        }
    }
}

/// Find the element of the kernel with the largest squared magnitude. Ties go
/// to the first such element in logical order. `None` is returned if no
/// element is non-zero.
pub fn kernel_peak<T, D>(ker: ArrayView<T, D>) -> Option<(D::Index, T)>
where
    T: CleanElement,
    D: ToroidalDim,
{
    let mut mq = T::Real::zero();
    let mut peak = None;
    for (pattern, &val) in ker.indexed_iter() {
        let mval = val.norm_sqr();
        if mval > mq {
            mq = mval;
            peak = Some((D::from_pattern(pattern), val));
        }
    }
    peak
}

/// The constant `q` that CLEAN steps are scaled by, such that subtracting
/// `kernel * peak_value * q` exactly cancels a residual peak. See
/// [`CleanElement::peak_reciprocal`].
pub fn kernel_normalisation<T, D>(ker: ArrayView<T, D>) -> Option<T>
where
    T: CleanElement,
    D: ToroidalDim,
{
    kernel_peak(ker).map(|(_, peak)| T::peak_reciprocal(peak))
}

/// CLEAN a 1D residual. See [`clean`].
pub fn clean_1d<T, O>(
    res: ArrayViewMut1<T>,
    ker: ArrayView1<T>,
    mdl: ArrayViewMut1<T>,
    params: &CleanParams,
    observer: &mut O,
) -> Result<CleanOutcome, CleanError>
where
    T: CleanElement,
    O: CleanObserver + ?Sized,
{
    clean(res, ker, mdl, params, observer)
}

/// CLEAN a 2D residual. See [`clean`].
pub fn clean_2d<T, O>(
    res: ArrayViewMut2<T>,
    ker: ArrayView2<T>,
    mdl: ArrayViewMut2<T>,
    params: &CleanParams,
    observer: &mut O,
) -> Result<CleanOutcome, CleanError>
where
    T: CleanElement,
    O: CleanObserver + ?Sized,
{
    clean(res, ker, mdl, params, observer)
}

/// Deconvolve `ker` out of `res` with CLEAN, accumulating the recovered
/// components into `mdl`.
///
/// * `res` is the residual (initially the dirty image). It is modified in
///   place.
/// * `ker` is the kernel (dirty beam). It must have the same shape as `res`,
///   have at least one non-zero element, and is assumed to be periodic with
///   its centre at the origin.
/// * `mdl` is the model. It must have the same shape as `res`. Components are
///   *added* to whatever it already contains.
///
/// Because `res` and `mdl` are both mutable views, they cannot alias.
///
/// Every iteration's report is given to `observer`; pass `&mut ()` to ignore
/// them. When `params.verbose` is set, each report is also logged at the info
/// level.
///
/// No memory is allocated for the arrays; each iteration walks the kernel
/// twice, once to score the step and once to apply it, so a rejected step
/// never touches `res` or `mdl`.
pub fn clean<T, D, O>(
    mut res: ArrayViewMut<T, D>,
    ker: ArrayView<T, D>,
    mut mdl: ArrayViewMut<T, D>,
    params: &CleanParams,
    observer: &mut O,
) -> Result<CleanOutcome, CleanError>
where
    T: CleanElement,
    D: ToroidalDim,
    O: CleanObserver + ?Sized,
{
    for (what, shape) in [("kernel", ker.shape()), ("model", mdl.shape())] {
        if shape != res.shape() {
            return Err(CleanError::ShapeMismatch {
                what,
                expected: res.shape().to_vec(),
                got: shape.to_vec(),
            });
        }
    }
    if res.is_empty() {
        return Err(CleanError::EmptyArray);
    }

    let (peak_index, peak) = kernel_peak(ker.view()).ok_or(CleanError::ZeroKernel)?;
    if peak_index != D::ORIGIN {
        warn!("The CLEAN kernel peaks at {peak_index:?} rather than its origin; model components will be offset from the residual peaks");
    }
    let q = T::peak_reciprocal(peak);
    debug!(
        "CLEAN {} kernel peak {peak:?} at {peak_index:?}; normalisation {q:?}",
        T::KIND
    );
    debug!(
        "CLEAN with gain {}, at most {} iterations, tolerance {:e}, initial peak {}",
        params.gain, params.max_iterations, params.tolerance, params.initial_peak
    );

    let extent = D::from_pattern(res.raw_dim().into_pattern());
    let gain = T::Real::from_f64_lossy(params.gain);
    let num_elements = T::Real::from_count(res.len());

    let (mut argmax, mut max) = match params.initial_peak {
        InitialPeak::Zero => (D::ORIGIN, T::zero()),
        InitialPeak::Scan => residual_peak(res.view()),
    };
    let mut score: Option<T::Real> = None;
    let mut first_score: Option<T::Real> = None;

    observer.start(params.max_iterations);
    let mut outcome = CleanOutcome::Exhausted(params.max_iterations);
    for i in 0..params.max_iterations {
        let step = T::clean_step(gain, max, q);

        // Score the step without applying it.
        let mut sum_sq = T::Real::zero();
        let mut mmax = -T::Real::one();
        let mut nargmax = argmax;
        let mut nmax = max;
        for (offset, &k) in ker.indexed_iter() {
            let wrapped = D::wrap(D::from_pattern(offset), argmax, extent);
            let val = res[wrapped] - k * step;
            let mval = val.norm_sqr();
            sum_sq = sum_sq + mval;
            if mval > mmax {
                nargmax = wrapped;
                nmax = val;
                mmax = mval;
            }
        }
        let nscore = (sum_sq / num_elements).sqrt();
        let first = *first_score.get_or_insert(nscore);

        let report = IterationReport {
            iteration: i,
            score: nscore.into_f64(),
            prev_score: score.map(RealScalar::into_f64),
            first_score: first.into_f64(),
            peak: D::coords(nargmax),
            rank: D::RANK,
        };
        if params.verbose {
            info!("{report}");
        } else {
            trace!("{report}");
        }
        observer.iteration(&report);

        if let Some(score) = score {
            if nscore > score {
                outcome = CleanOutcome::Diverged(i);
                break;
            }
        }

        // Apply the step. The arithmetic is identical to the scoring pass, so
        // the residual ends up holding exactly the values that were scored.
        mdl[argmax] += step;
        for (offset, &k) in ker.indexed_iter() {
            let wrapped = D::wrap(D::from_pattern(offset), argmax, extent);
            res[wrapped] -= k * step;
        }

        if let Some(score) = score {
            if ((score - nscore) / first).into_f64() < params.tolerance {
                outcome = CleanOutcome::Converged(i);
                break;
            }
        }

        score = Some(nscore);
        argmax = nargmax;
        max = nmax;
    }

    debug!("CLEAN {outcome}");
    observer.finish(&outcome);
    Ok(outcome)
}

/// The largest-magnitude element of the residual and its location. Ties go to
/// the first such element in logical order.
fn residual_peak<T, D>(res: ArrayView<T, D>) -> (D::Index, T)
where
    T: CleanElement,
    D: ToroidalDim,
{
    let mut mmax = -T::Real::one();
    let mut argmax = D::ORIGIN;
    let mut max = T::zero();
    for (pattern, &val) in res.indexed_iter() {
        let mval = val.norm_sqr();
        if mval > mmax {
            argmax = D::from_pattern(pattern);
            max = val;
            mmax = mval;
        }
    }
    (argmax, max)
}
