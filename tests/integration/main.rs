// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests.
//!
//! Some help for laying out these tests was taken from:
//! https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

mod arg_files;
mod deconvolve;

use ndarray::prelude::*;
use num_complex::Complex64;

/// An 8x8 periodic beam with a unit peak at the origin, 0.3 on the four
/// direct neighbours and 0.1 on the four diagonals (all wrapped).
fn get_beam() -> Array2<f64> {
    let mut ker = Array2::zeros((8, 8));
    ker[(0, 0)] = 1.0;
    for &(i, j) in &[(0, 1), (1, 0), (0, 7), (7, 0)] {
        ker[(i, j)] = 0.3;
    }
    for &(i, j) in &[(1, 1), (1, 7), (7, 1), (7, 7)] {
        ker[(i, j)] = 0.1;
    }
    ker
}

/// Two point sources, well separated.
fn get_true_model() -> Array2<f64> {
    let mut model = Array2::zeros((8, 8));
    model[(2, 3)] = 5.0;
    model[(5, 6)] = 2.5;
    model
}

/// Circular convolution of `model` with `ker`: every model component is
/// replaced by a copy of the kernel shifted to it, wrapping around the edges.
fn circular_convolve<T>(ker: ArrayView2<T>, model: ArrayView2<T>) -> Array2<T>
where
    T: Copy + num_traits::Zero + std::ops::Mul<Output = T> + std::ops::AddAssign,
{
    let (dim1, dim2) = model.dim();
    let mut out = Array2::zeros((dim1, dim2));
    for ((s1, s2), &m) in model.indexed_iter() {
        if m.is_zero() {
            continue;
        }
        for ((k1, k2), &k) in ker.indexed_iter() {
            out[((s1 + k1) % dim1, (s2 + k2) % dim2)] += m * k;
        }
    }
    out
}

fn rms(a: ArrayView2<Complex64>) -> f64 {
    (a.iter().map(|v| v.norm_sqr()).sum::<f64>() / a.len() as f64).sqrt()
}
