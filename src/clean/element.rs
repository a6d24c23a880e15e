// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The numeric element kinds that can be CLEANed.
//!
//! Real and complex numbers are handled by the same CLEAN loop; the only
//! differences are how a "magnitude" is formed, how the kernel peak is
//! inverted and how a step is formed from the current peak. Those three things
//! live in [`CleanElement`].

use std::fmt::{Debug, Display, LowerExp};
use std::ops::{AddAssign, Mul, Sub, SubAssign};

use num_complex::Complex;
use num_traits::{Float, Zero};
use strum_macros::{Display, EnumIter, EnumString};

/// The kinds of array elements supported by CLEAN. The names follow those used
/// by numpy, which is where most dirty images and beams come from.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, EnumIter, EnumString)]
pub enum ElementKind {
    #[strum(serialize = "float32")]
    Float32,

    #[strum(serialize = "float64")]
    Float64,

    #[strum(serialize = "complex64")]
    Complex64,

    #[strum(serialize = "complex128")]
    Complex128,
}

/// A real floating-point scalar; the precision that CLEAN scores are computed
/// in. Only `f32` and `f64` implement this.
pub trait RealScalar: Float + Debug + Display + LowerExp + Send + Sync + 'static {
    /// Convert a user-supplied `f64` (e.g. the loop gain) into this precision.
    fn from_f64_lossy(x: f64) -> Self;

    /// Convert an element count into this precision.
    fn from_count(n: usize) -> Self;

    /// Widen into an `f64`. This is exact for both implementors.
    fn into_f64(self) -> f64;
}

macro_rules! impl_real_scalar {
    ($t:ty) => {
        impl RealScalar for $t {
            #[inline(always)]
            fn from_f64_lossy(x: f64) -> Self {
                x as $t
            }

            #[inline(always)]
            fn from_count(n: usize) -> Self {
                n as $t
            }

            #[inline(always)]
            fn into_f64(self) -> f64 {
                self as f64
            }
        }
    };
}

impl_real_scalar!(f32);
impl_real_scalar!(f64);

/// An element of a residual, kernel or model array.
pub trait CleanElement:
    Copy
    + Debug
    + PartialEq
    + Zero
    + Sub<Output = Self>
    + Mul<Output = Self>
    + AddAssign
    + SubAssign
    + Send
    + Sync
    + 'static
{
    /// The precision that magnitudes and scores are computed in.
    type Real: RealScalar;

    /// The element kind, for boundary validation.
    const KIND: ElementKind;

    /// The squared magnitude (real) or squared modulus (complex).
    fn norm_sqr(self) -> Self::Real;

    /// The normalisation constant `q` for a kernel peaking at `peak`, such that
    /// `peak * q == 1`. For real numbers, this is `1 / peak`; note that this is
    /// the *signed* peak, not its magnitude. For complex numbers, this is
    /// `conj(peak) / |peak|^2`.
    fn peak_reciprocal(peak: Self) -> Self;

    /// The component amplitude to be placed at the current peak, i.e.
    /// `gain * max * q`.
    fn clean_step(gain: Self::Real, max: Self, q: Self) -> Self;
}

macro_rules! impl_clean_element_real {
    ($t:ty, $kind:expr) => {
        impl CleanElement for $t {
            type Real = $t;
            const KIND: ElementKind = $kind;

            #[inline(always)]
            fn norm_sqr(self) -> $t {
                self * self
            }

            #[inline(always)]
            fn peak_reciprocal(peak: $t) -> $t {
                1.0 / peak
            }

            #[inline(always)]
            fn clean_step(gain: $t, max: $t, q: $t) -> $t {
                gain * max * q
            }
        }
    };
}

macro_rules! impl_clean_element_complex {
    ($t:ty, $kind:expr) => {
        impl CleanElement for Complex<$t> {
            type Real = $t;
            const KIND: ElementKind = $kind;

            #[inline(always)]
            fn norm_sqr(self) -> $t {
                self.re * self.re + self.im * self.im
            }

            #[inline(always)]
            fn peak_reciprocal(peak: Complex<$t>) -> Complex<$t> {
                let mq = peak.re * peak.re + peak.im * peak.im;
                Complex::new(peak.re / mq, -peak.im / mq)
            }

            #[inline(always)]
            fn clean_step(gain: $t, max: Complex<$t>, q: Complex<$t>) -> Complex<$t> {
                (max * q) * gain
            }
        }
    };
}

impl_clean_element_real!(f32, ElementKind::Float32);
impl_clean_element_real!(f64, ElementKind::Float64);
impl_clean_element_complex!(f32, ElementKind::Complex64);
impl_clean_element_complex!(f64, ElementKind::Complex128);
