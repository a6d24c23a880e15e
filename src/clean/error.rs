// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors that prevent CLEAN from running. Divergence and non-convergence are
//! not errors; see [`super::CleanOutcome`].

use thiserror::Error;

use super::ElementKind;

#[derive(Error, Debug)]
pub enum CleanError {
    #[error("CLEAN can only operate on 1D or 2D arrays, but the residual has {rank} dimensions")]
    UnsupportedRank { rank: usize },

    #[error("The {what} array has {got} dimensions, but the residual has {expected}")]
    RankMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("The {what} array has shape {got:?}, but the residual has shape {expected:?}")]
    ShapeMismatch {
        what: &'static str,
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    #[error("The {what} array has element type {got}, but the residual has {expected}; array types must match")]
    ElementKindMismatch {
        what: &'static str,
        expected: ElementKind,
        got: ElementKind,
    },

    #[error("Cannot CLEAN an empty array")]
    EmptyArray,

    #[error("The kernel has no non-zero elements; it cannot be normalised")]
    ZeroKernel,

    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
}
