// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all deconvolution-related errors. This should be the *only*
//! error enum that users need to handle.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeconvError {
    #[error(transparent)]
    Clean(#[from] crate::clean::CleanError),

    #[error(transparent)]
    CleanParams(#[from] crate::params::CleanParamsError),

    /// An error with an arguments file.
    #[error("{0}")]
    ArgFile(String),

    #[error("Couldn't serialise arguments to toml: {0}")]
    Toml(#[from] toml::ser::Error),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
