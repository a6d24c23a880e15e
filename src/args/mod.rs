// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! User-facing CLEAN arguments, and parsing them into parameters.
//!
//! All booleans must have `#[serde(default)]` annotated, and anything that
//! isn't a boolean must be optional. This allows all arguments to be optional
//! *and* usable in an arguments file. [`CleanArgs`] can be flattened into any
//! `clap` command.


use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
    str::FromStr,
};

use clap::Parser;
use itertools::Itertools;
use log::debug;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::{
    params::{
        CleanParams, CleanParamsError, InitialPeak, DEFAULT_GAIN, DEFAULT_MAX_ITERATIONS,
        DEFAULT_TOLERANCE,
    },
    DeconvError,
};

lazy_static::lazy_static! {
    static ref ARG_FILE_TYPES_COMMA_SEPARATED: String = ArgFileTypes::iter().join(", ");

    pub(crate) static ref INITIAL_PEAKS_COMMA_SEPARATED: String = InitialPeak::iter().join(", ");

    static ref ARG_FILE_HELP: String =
        format!("All arguments may be specified in a file. Any CLI arguments override arguments set in the file. Supported formats: {}", *ARG_FILE_TYPES_COMMA_SEPARATED);

    static ref GAIN_HELP: String =
        format!("The fraction of the residual peak that is subtracted every iteration. Must be greater than 0 and at most 1. Default: {DEFAULT_GAIN}");

    static ref MAX_ITERATIONS_HELP: String =
        format!("The maximum number of CLEAN iterations. Default: {DEFAULT_MAX_ITERATIONS}");

    static ref TOLERANCE_HELP: String =
        format!("CLEAN stops when an iteration improves the residual RMS by less than this fraction of the first iteration's RMS. A negative value disables this check. Default: {DEFAULT_TOLERANCE}");

    static ref INITIAL_PEAK_HELP: String =
        format!("How the first CLEAN step is found. 'zero' spends the first iteration locating the residual peak, 'scan' locates it before iterating. Supported values: {}. Default: {}", *INITIAL_PEAKS_COMMA_SEPARATED, InitialPeak::default());
}

#[derive(Debug, Display, EnumIter, EnumString)]
enum ArgFileTypes {
    #[strum(serialize = "toml")]
    Toml,
    #[strum(serialize = "json")]
    Json,
}

#[derive(Parser, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub args_file: Option<PathBuf>,

    #[clap(long, help = GAIN_HELP.as_str(), help_heading = "CLEAN")]
    pub gain: Option<f64>,

    #[clap(long, help = MAX_ITERATIONS_HELP.as_str(), help_heading = "CLEAN")]
    pub max_iterations: Option<u32>,

    #[clap(long, help = TOLERANCE_HELP.as_str(), help_heading = "CLEAN")]
    pub tolerance: Option<f64>,

    #[clap(long, help = INITIAL_PEAK_HELP.as_str(), help_heading = "CLEAN")]
    pub initial_peak: Option<String>,

    /// Log the peak location and score of every CLEAN iteration.
    #[clap(short, long, help_heading = "CLEAN")]
    #[serde(default)]
    pub verbose: bool,
}

impl CleanArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified into
    /// a single struct. Where applicable, it will prefer CLI parameters over
    /// those in the file.
    ///
    /// This function should only ever merge arguments, and not try to make
    /// sense of them.
    pub fn merge(self) -> Result<CleanArgs, DeconvError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            // Read in the file arguments. Ensure all of the file args are
            // accounted for by pattern matching.
            let CleanArgs {
                args_file: _,
                gain,
                max_iterations,
                tolerance,
                initial_peak,
                verbose,
            } = unpack_arg_file(&arg_file)?;

            // Merge all the arguments, preferring the CLI args when available.
            Ok(CleanArgs {
                args_file: None,
                gain: cli_args.gain.or(gain),
                max_iterations: cli_args.max_iterations.or(max_iterations),
                tolerance: cli_args.tolerance.or(tolerance),
                initial_peak: cli_args.initial_peak.or(initial_peak),
                verbose: cli_args.verbose || verbose,
            })
        } else {
            Ok(cli_args)
        }
    }

    /// Parse the arguments into parameters ready for CLEAN. Unspecified
    /// arguments take their default values.
    pub fn parse(self) -> Result<CleanParams, DeconvError> {
        debug!("{:#?}", self);

        let CleanArgs {
            args_file: _,
            gain,
            max_iterations,
            tolerance,
            initial_peak,
            verbose,
        } = self;

        let initial_peak = match initial_peak {
            None => InitialPeak::default(),
            Some(s) => InitialPeak::from_str(&s.to_lowercase())
                .map_err(|_| CleanParamsError::UnknownInitialPeak { got: s })?,
        };

        let params = CleanParams::new(
            gain.unwrap_or(DEFAULT_GAIN),
            max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS),
            tolerance.unwrap_or(DEFAULT_TOLERANCE),
            initial_peak,
            verbose,
        )?;
        debug!("{:#?}", params);
        Ok(params)
    }

    /// Serialise these arguments into a TOML string that can be used as an
    /// arguments file to reproduce a run.
    pub fn to_toml(&self) -> Result<String, DeconvError> {
        Ok(toml::to_string(self)?)
    }
}

/// Read an arguments file, working out its format from its extension.
fn unpack_arg_file<T: DeserializeOwned>(arg_file: &Path) -> Result<T, DeconvError> {
    debug!("Attempting to parse argument file {}", arg_file.display());

    let mut contents = String::new();
    let arg_file_type = arg_file
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .and_then(|e| ArgFileTypes::from_str(&e).ok());

    match arg_file_type {
        Some(ArgFileTypes::Toml) => {
            debug!("Parsing toml file...");
            let mut fh = File::open(arg_file)?;
            fh.read_to_string(&mut contents)?;
            toml::from_str(&contents).map_err(|err| {
                DeconvError::ArgFile(format!(
                    "Couldn't decode toml structure from {}:\n{err}",
                    arg_file.display()
                ))
            })
        }

        Some(ArgFileTypes::Json) => {
            debug!("Parsing json file...");
            let mut fh = File::open(arg_file)?;
            fh.read_to_string(&mut contents)?;
            serde_json::from_str(&contents).map_err(|err| {
                DeconvError::ArgFile(format!(
                    "Couldn't decode json structure from {}:\n{err}",
                    arg_file.display()
                ))
            })
        }

        None => Err(DeconvError::ArgFile(format!(
            "Argument file '{}' doesn't have a recognised file extension! Valid extensions are: {}",
            arg_file.display(),
            *ARG_FILE_TYPES_COMMA_SEPARATED
        ))),
    }
}
