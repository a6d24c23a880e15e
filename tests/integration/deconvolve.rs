// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Deconvolve a dirty image made from a known model.

use approx::assert_abs_diff_eq;
use ndarray::prelude::*;
use num_complex::Complex64;

use super::*;
use mwa_deconv::{
    clean_2d, clean_image, CleanOutcome, CleanParams, ImageData, InitialPeak, IterationReport,
};

#[test]
fn test_recover_point_sources() {
    let ker = get_beam();
    let truth = get_true_model();
    let dirty = circular_convolve(ker.view(), truth.view());

    let mut res = dirty.clone();
    let mut mdl = Array2::zeros(res.dim());
    let mut reports: Vec<IterationReport> = vec![];
    let params = CleanParams::new(0.2, 500, 1e-6, InitialPeak::Zero, false).unwrap();
    let outcome = clean_2d(
        res.view_mut(),
        ker.view(),
        mdl.view_mut(),
        &params,
        &mut reports,
    )
    .unwrap();

    assert!(outcome.is_converged(), "{outcome}");

    // The residual and the re-convolved model always account for the dirty
    // image.
    let reconstructed = &res + &circular_convolve(ker.view(), mdl.view());
    assert_abs_diff_eq!(reconstructed, dirty, epsilon = 1e-9);

    // Components only ever went where the sources are.
    assert_abs_diff_eq!(mdl, truth, epsilon = 1e-3);
    for ((i, j), &m) in mdl.indexed_iter() {
        if (i, j) != (2, 3) && (i, j) != (5, 6) {
            assert_eq!(m, 0.0, "({i}, {j})");
        }
    }

    let first = reports.first().unwrap();
    let last = reports.last().unwrap();
    assert!(last.score < first.score);
    assert!(res.iter().all(|&r| r >= 0.0));
}

#[test]
fn test_recover_rotated_complex_sources() {
    // The same sky, but seen through a beam with a constant phase.
    let phase = Complex64::from_polar(1.0, 0.7);
    let ker = get_beam().mapv(|v| Complex64::new(v, 0.0) * phase);
    let truth = get_true_model().mapv(|v| Complex64::new(v, 0.0));
    let dirty = circular_convolve(ker.view(), truth.view());

    let mut res = ImageData::from(dirty.clone());
    let mut mdl = ImageData::from(Array2::<Complex64>::zeros((8, 8)));
    let params = CleanParams::new(0.2, 500, 1e-6, InitialPeak::Scan, false).unwrap();
    let outcome = clean_image(
        &mut res,
        &ImageData::from(ker.clone()),
        &mut mdl,
        &params,
        &mut (),
    )
    .unwrap();
    assert!(outcome.is_converged(), "{outcome}");

    let (res, mdl) = match (res, mdl) {
        (ImageData::Complex128(res), ImageData::Complex128(mdl)) => (
            res.into_dimensionality::<Ix2>().unwrap(),
            mdl.into_dimensionality::<Ix2>().unwrap(),
        ),
        _ => panic!("the element types changed"),
    };

    // The beam's phase is removed from the model.
    assert_abs_diff_eq!(mdl, truth, epsilon = 1e-3);
    assert!(rms(res.view()) < 1e-3 * rms(dirty.view()));

    let reconstructed = &res + &circular_convolve(ker.view(), mdl.view());
    assert_abs_diff_eq!(reconstructed, dirty, epsilon = 1e-9);
}

#[test]
fn test_strong_sidelobes_diverge() {
    // A beam whose sidelobe is as strong as its peak. Cleaning the source at
    // (0, 0) pushes its neighbour the wrong way, which makes the residual
    // worse.
    let mut ker = Array2::<f64>::zeros((1, 4));
    ker[(0, 0)] = 1.0;
    ker[(0, 1)] = 1.0;
    let original = array![[1.0, -1.0, 0.0, 0.0]];
    let mut res = original.clone();
    let mut mdl = Array2::zeros((1, 4));
    let params = CleanParams::new(1.0, 200, 0.001, InitialPeak::Zero, false).unwrap();

    let outcome = clean_2d(res.view_mut(), ker.view(), mdl.view_mut(), &params, &mut ()).unwrap();
    // The first iteration only finds the peak; the first real step diverges.
    assert_eq!(outcome, CleanOutcome::Diverged(1));
    assert_eq!(outcome.code(), -1);
    assert_eq!(res, original);
    assert_eq!(mdl, Array2::<f64>::zeros((1, 4)));
}
