// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Hooks to watch CLEAN as it iterates. Observers never influence the loop.

use std::borrow::Cow;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use itertools::Itertools;

use super::CleanOutcome;

/// What happened during a single CLEAN iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationReport {
    /// The zero-based iteration index.
    pub iteration: u32,

    /// The RMS of the residual after this iteration's step.
    pub score: f64,

    /// The RMS of the residual before this iteration's step. This is `None` on
    /// the very first iteration.
    pub prev_score: Option<f64>,

    /// The RMS of the residual after the very first iteration. All score
    /// comparisons are normalised by this.
    pub first_score: f64,

    pub(super) peak: [usize; 2],
    pub(super) rank: usize,
}

impl IterationReport {
    /// The location of the largest-magnitude residual element after this
    /// iteration's step. This is where the next step will be taken.
    pub fn peak(&self) -> &[usize] {
        &self.peak[..self.rank]
    }

    pub fn score_ratio(&self) -> f64 {
        self.score / self.first_score
    }

    pub fn prev_ratio(&self) -> Option<f64> {
        self.prev_score.map(|s| s / self.first_score)
    }
}

impl std::fmt::Display for IterationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let peak = self.peak().iter().join(",");
        write!(
            f,
            "Iter {}: Max=({peak}), Score = {:.6}",
            self.iteration,
            self.score_ratio()
        )?;
        match self.prev_ratio() {
            Some(prev) => write!(f, ", Prev = {prev:.6}"),
            None => write!(f, ", Prev = -"),
        }
    }
}

/// Something that wants to know about CLEAN's progress. All methods default
/// to doing nothing.
pub trait CleanObserver {
    /// Called once before the first iteration.
    fn start(&mut self, _max_iterations: u32) {}

    /// Called once per iteration, after the new score is known but before the
    /// convergence and divergence checks.
    fn iteration(&mut self, _report: &IterationReport) {}

    /// Called once when CLEAN returns an outcome.
    fn finish(&mut self, _outcome: &CleanOutcome) {}
}

/// Don't observe anything.
impl CleanObserver for () {}

/// Keep every report.
impl CleanObserver for Vec<IterationReport> {
    fn iteration(&mut self, report: &IterationReport) {
        self.push(*report);
    }
}

/// Draw a progress bar over the maximum number of iterations. When CLEAN stops,
/// the bar is left where it got to, with a message describing how it stopped.
pub struct ProgressObserver {
    bar: ProgressBar,
    message: Cow<'static, str>,
}

impl ProgressObserver {
    /// Make a new progress bar. If `draw` is false, the bar is hidden; this is
    /// useful for non-interactive use.
    pub fn new<S: Into<Cow<'static, str>>>(message: S, draw: bool) -> ProgressObserver {
        let message = message.into();
        let bar = ProgressBar::with_draw_target(
            None,
            if draw {
                // Use stdout, like the log messages.
                ProgressDrawTarget::stdout()
            } else {
                ProgressDrawTarget::hidden()
            },
        )
        .with_style(
            ProgressStyle::with_template(
                "{msg}: [{wide_bar:.blue}] {pos:3}/{len:3} ({elapsed_precise}<{eta_precise})",
            )
            .map(|s| s.progress_chars("=> "))
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
        )
        .with_message(message.clone());

        ProgressObserver { bar, message }
    }

    pub fn is_hidden(&self) -> bool {
        self.bar.is_hidden()
    }

    /// The number of iterations seen so far.
    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl CleanObserver for ProgressObserver {
    fn start(&mut self, max_iterations: u32) {
        self.bar.set_length(max_iterations.into());
        self.bar.set_position(0);
    }

    fn iteration(&mut self, _report: &IterationReport) {
        self.bar.inc(1);
    }

    fn finish(&mut self, outcome: &CleanOutcome) {
        self.bar
            .abandon_with_message(format!("{}: {outcome}", self.message));
    }
}
