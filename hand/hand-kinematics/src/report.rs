//! Per-solve fit summary.

use std::fmt;

use hand_types::Handedness;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How well the last solve fits its keypoints.
///
/// Errors are distances in metres between the solved joint positions and the
/// observed keypoints, after the final alignment.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolveReport {
    /// Hand that was solved.
    pub handedness: Handedness,
    /// Outer iterations run.
    pub iterations: usize,
    /// Root-mean-square keypoint error.
    pub rms_error: f64,
    /// Largest single keypoint error.
    pub max_error: f64,
}

impl fmt::Display for SolveReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} hand: {} iterations, rms {:.2} mm, max {:.2} mm",
            self.handedness,
            self.iterations,
            self.rms_error * 1000.0,
            self.max_error * 1000.0
        )
    }
}
