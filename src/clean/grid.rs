// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Toroidal (wrap-around) indexing for 1D and 2D arrays.
//!
//! Kernels handed to CLEAN are normally derived from FFTs, so they're periodic;
//! shifting a kernel to a peak means wrapping every index modulo the extent of
//! its axis.

use std::fmt::Debug;

use ndarray::{Dimension, Ix1, Ix2, NdIndex};

/// An `ndarray` dimension that CLEAN can operate over.
pub trait ToroidalDim: Dimension {
    /// A cheap index into an array of this dimensionality.
    type Index: Copy + Debug + PartialEq + NdIndex<Self>;

    /// The number of axes.
    const RANK: usize;

    /// The first element of an array.
    const ORIGIN: Self::Index;

    fn from_pattern(pattern: Self::Pattern) -> Self::Index;

    /// Shift `offset` by `shift`, wrapping each axis by `extent`.
    fn wrap(offset: Self::Index, shift: Self::Index, extent: Self::Index) -> Self::Index;

    /// The coordinates of `index`. Only the first [`ToroidalDim::RANK`] values
    /// are meaningful.
    fn coords(index: Self::Index) -> [usize; 2];
}

impl ToroidalDim for Ix1 {
    type Index = usize;
    const RANK: usize = 1;
    const ORIGIN: usize = 0;

    #[inline(always)]
    fn from_pattern(pattern: usize) -> usize {
        pattern
    }

    #[inline(always)]
    fn wrap(offset: usize, shift: usize, extent: usize) -> usize {
        (offset + shift) % extent
    }

    fn coords(index: usize) -> [usize; 2] {
        [index, 0]
    }
}

impl ToroidalDim for Ix2 {
    type Index = (usize, usize);
    const RANK: usize = 2;
    const ORIGIN: (usize, usize) = (0, 0);

    #[inline(always)]
    fn from_pattern(pattern: (usize, usize)) -> (usize, usize) {
        pattern
    }

    #[inline(always)]
    fn wrap(
        (n1, n2): (usize, usize),
        (a1, a2): (usize, usize),
        (dim1, dim2): (usize, usize),
    ) -> (usize, usize) {
        ((n1 + a1) % dim1, (n2 + a2) % dim2)
    }

    fn coords((i1, i2): (usize, usize)) -> [usize; 2] {
        [i1, i2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_1d() {
        assert_eq!(Ix1::wrap(0, 2, 4), 2);
        assert_eq!(Ix1::wrap(1, 2, 4), 3);
        assert_eq!(Ix1::wrap(2, 2, 4), 0);
        assert_eq!(Ix1::wrap(3, 2, 4), 1);
    }

    #[test]
    fn test_wrap_2d() {
        assert_eq!(Ix2::wrap((0, 0), (2, 3), (3, 4)), (2, 3));
        assert_eq!(Ix2::wrap((1, 1), (2, 3), (3, 4)), (0, 0));
        assert_eq!(Ix2::wrap((2, 3), (2, 3), (3, 4)), (1, 2));
    }
}
