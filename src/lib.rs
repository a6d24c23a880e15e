// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
CLEAN deconvolution of dirty images and beams for radio-interferometric image
synthesis.

The typed entry points ([`clean`], [`clean_1d`], [`clean_2d`]) take `ndarray`
views of `f32`, `f64`, `Complex<f32>` or `Complex<f64>` elements. When the
rank and element type of the arrays are only known at runtime (e.g. they came
from Python or a file), wrap them in [`ImageData`] and use [`clean_image`].
 */

pub mod args;
pub mod clean;
mod error;
pub mod image;
pub mod params;

// Re-exports.
pub use args::CleanArgs;
pub use clean::{
    clean, clean_1d, clean_2d, kernel_normalisation, kernel_peak, CleanElement, CleanError,
    CleanObserver, CleanOutcome, ElementKind, IterationReport, ProgressObserver,
};
pub use error::DeconvError;
pub use image::{clean_image, ImageData};
pub use params::{CleanParams, CleanParamsError, InitialPeak};
