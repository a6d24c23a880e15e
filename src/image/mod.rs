// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Arrays whose rank and element type are only known at runtime.
//!
//! Before such arrays can be CLEANed, they must all have the same rank (1 or
//! 2), shape and element type. [`clean_image`] checks this and then hands over
//! to the typed CLEAN code.


use ndarray::prelude::*;
use num_complex::Complex;

use crate::{
    clean::{clean, CleanElement, CleanError, CleanObserver, CleanOutcome, ElementKind},
    params::CleanParams,
};

/// A dynamically-dimensioned array of any element type supported by CLEAN.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageData {
    Float32(ArrayD<f32>),
    Float64(ArrayD<f64>),
    Complex64(ArrayD<Complex<f32>>),
    Complex128(ArrayD<Complex<f64>>),
}

impl ImageData {
    pub fn element_kind(&self) -> ElementKind {
        match self {
            ImageData::Float32(_) => ElementKind::Float32,
            ImageData::Float64(_) => ElementKind::Float64,
            ImageData::Complex64(_) => ElementKind::Complex64,
            ImageData::Complex128(_) => ElementKind::Complex128,
        }
    }

    pub fn shape(&self) -> &[usize] {
        match self {
            ImageData::Float32(a) => a.shape(),
            ImageData::Float64(a) => a.shape(),
            ImageData::Complex64(a) => a.shape(),
            ImageData::Complex128(a) => a.shape(),
        }
    }

    pub fn ndim(&self) -> usize {
        self.shape().len()
    }
}

macro_rules! impl_from_array {
    ($t:ty, $variant:ident) => {
        impl<D: Dimension> From<Array<$t, D>> for ImageData {
            fn from(a: Array<$t, D>) -> Self {
                ImageData::$variant(a.into_dyn())
            }
        }
    };
}

impl_from_array!(f32, Float32);
impl_from_array!(f64, Float64);
impl_from_array!(Complex<f32>, Complex64);
impl_from_array!(Complex<f64>, Complex128);

/// Validate the residual, kernel and model arrays against each other, then
/// CLEAN them. See [`crate::clean()`] for what each array is used for.
///
/// The checks are done in this order: the residual's rank must be 1 or 2, the
/// kernel and model must have the residual's rank and shape, then all element
/// types must match. No array is touched if any check fails.
pub fn clean_image<O>(
    res: &mut ImageData,
    ker: &ImageData,
    mdl: &mut ImageData,
    params: &CleanParams,
    observer: &mut O,
) -> Result<CleanOutcome, CleanError>
where
    O: CleanObserver + ?Sized,
{
    let rank = res.ndim();
    if rank != 1 && rank != 2 {
        return Err(CleanError::UnsupportedRank { rank });
    }
    for (what, other) in [("kernel", ker), ("model", &*mdl)] {
        if other.ndim() != rank {
            return Err(CleanError::RankMismatch {
                what,
                expected: rank,
                got: other.ndim(),
            });
        }
        if other.shape() != res.shape() {
            return Err(CleanError::ShapeMismatch {
                what,
                expected: res.shape().to_vec(),
                got: other.shape().to_vec(),
            });
        }
    }

    let expected = res.element_kind();
    let kinds = [("kernel", ker.element_kind()), ("model", mdl.element_kind())];
    match (res, ker, mdl) {
        (ImageData::Float32(r), ImageData::Float32(k), ImageData::Float32(m)) => {
            clean_dyn(r, k, m, params, observer)
        }
        (ImageData::Float64(r), ImageData::Float64(k), ImageData::Float64(m)) => {
            clean_dyn(r, k, m, params, observer)
        }
        (ImageData::Complex64(r), ImageData::Complex64(k), ImageData::Complex64(m)) => {
            clean_dyn(r, k, m, params, observer)
        }
        (ImageData::Complex128(r), ImageData::Complex128(k), ImageData::Complex128(m)) => {
            clean_dyn(r, k, m, params, observer)
        }
        _ => {
            let (what, got) = kinds
                .into_iter()
                .find(|&(_, got)| got != expected)
                .unwrap_or(kinds[0]);
            Err(CleanError::ElementKindMismatch {
                what,
                expected,
                got,
            })
        }
    }
}

fn clean_dyn<T, O>(
    res: &mut ArrayD<T>,
    ker: &ArrayD<T>,
    mdl: &mut ArrayD<T>,
    params: &CleanParams,
    observer: &mut O,
) -> Result<CleanOutcome, CleanError>
where
    T: CleanElement,
    O: CleanObserver + ?Sized,
{
    match res.ndim() {
        1 => clean(
            res.view_mut().into_dimensionality::<Ix1>()?,
            ker.view().into_dimensionality::<Ix1>()?,
            mdl.view_mut().into_dimensionality::<Ix1>()?,
            params,
            observer,
        ),
        2 => clean(
            res.view_mut().into_dimensionality::<Ix2>()?,
            ker.view().into_dimensionality::<Ix2>()?,
            mdl.view_mut().into_dimensionality::<Ix2>()?,
            params,
            observer,
        ),
        rank => Err(CleanError::UnsupportedRank { rank }),
    }
}
