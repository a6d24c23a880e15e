// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Drive CLEAN from an arguments file, the way a command-line tool would.

use std::{fs::File, io::Write};

use approx::assert_abs_diff_eq;
use clap::Parser;
use indoc::indoc;
use ndarray::prelude::*;
use tempfile::TempDir;

use super::*;
use mwa_deconv::{clean_image, CleanArgs, DeconvError, ImageData, InitialPeak, ProgressObserver};

#[test]
fn test_clean_from_arg_file() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let arg_file = tmp_dir.path().join("clean.toml");
    let mut f = File::create(&arg_file).expect("couldn't make file");
    f.write_all(
        indoc! {r#"
            gain = 0.2
            max_iterations = 500
            tolerance = 1e-6
            initial_peak = "scan"
        "#}
        .as_bytes(),
    )
    .unwrap();

    let args = CleanArgs::parse_from(["clean", arg_file.to_str().unwrap()]);
    let params = args.merge().unwrap().parse().unwrap();
    assert_eq!(params.initial_peak(), InitialPeak::Scan);

    let ker = get_beam();
    let truth = get_true_model();
    let mut res = ImageData::from(circular_convolve(ker.view(), truth.view()));
    let mut mdl = ImageData::from(Array2::<f64>::zeros((8, 8)));
    let mut progress = ProgressObserver::new("CLEANing", false);

    let outcome = clean_image(
        &mut res,
        &ImageData::from(ker),
        &mut mdl,
        &params,
        &mut progress,
    )
    .unwrap();
    assert!(outcome.is_converged(), "{outcome}");
    assert_eq!(progress.position(), u64::from(outcome.iterations()) + 1);

    match mdl {
        ImageData::Float64(mdl) => {
            assert_abs_diff_eq!(mdl, truth.into_dyn(), epsilon = 1e-3)
        }
        _ => panic!("the element type changed"),
    }
}

#[test]
fn test_saved_args_reproduce_params() {
    let args = CleanArgs::parse_from([
        "clean",
        "--gain",
        "0.05",
        "--initial-peak",
        "zero",
        "--verbose",
    ]);
    let toml = args.to_toml().unwrap();

    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let arg_file = tmp_dir.path().join("saved.toml");
    std::fs::write(&arg_file, toml).unwrap();

    let from_file = CleanArgs {
        args_file: Some(arg_file),
        ..Default::default()
    }
    .merge()
    .unwrap()
    .parse()
    .unwrap();
    assert_eq!(from_file, args.parse().unwrap());
}

#[test]
fn test_invalid_params_from_file() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let arg_file = tmp_dir.path().join("clean.json");
    std::fs::write(&arg_file, r#"{"gain": 0.0}"#).unwrap();

    let result = CleanArgs::parse_from(["clean", arg_file.to_str().unwrap()])
        .merge()
        .and_then(|args| args.parse());
    let err = result.unwrap_err();
    assert!(matches!(err, DeconvError::CleanParams(_)));
    assert!(err.to_string().contains("gain"), "{err}");
}
