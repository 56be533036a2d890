//! The per-hand solver handle.

use hand_types::{HandJointSet, HandKeypoints, Handedness, Keypoint};
use tracing::{debug, info, warn};

use crate::alignment::alignment_error;
use crate::config::SolverConfig;
use crate::error::KinematicsResult;
use crate::frame::write_joint_set;
use crate::model::HandModel;
use crate::optimizer::optimize;
use crate::report::SolveReport;
use crate::skeleton::HandSkeleton;

/// Solves one hand's pose from 21 keypoints per frame.
///
/// Keep one solver per physical hand: each solve starts from the previous
/// frame's solution. Instances share nothing and may live on different threads.
///
/// # Example
///
/// ```
/// use hand_kinematics::HandSolver;
/// use hand_types::{HandJoint, Handedness};
///
/// let mut solver = HandSolver::default();
/// let frame = solver.model().current_keypoints();
///
/// let joints = solver.solve(&frame, Handedness::Left);
/// assert!(joints.is_active);
/// assert!(joints[HandJoint::Wrist].orientation.angle() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct HandSolver {
    skeleton: HandSkeleton,
    config: SolverConfig,
    model: HandModel,
    solved_handedness: Handedness,
    last_report: Option<SolveReport>,
}

impl Default for HandSolver {
    fn default() -> Self {
        Self::from_parts(HandSkeleton::default(), SolverConfig::default())
    }
}

impl HandSolver {
    /// Creates a solver after validating the skeleton and configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the skeleton or configuration fails validation.
    pub fn new(skeleton: HandSkeleton, config: SolverConfig) -> KinematicsResult<Self> {
        skeleton.validate()?;
        config.validate()?;
        Ok(Self::from_parts(skeleton, config))
    }

    fn from_parts(skeleton: HandSkeleton, config: SolverConfig) -> Self {
        info!(
            iterations = config.iterations,
            hidden_thumb_bone = skeleton.hidden_thumb_bone,
            "hand solver created"
        );
        let model = HandModel::new(&skeleton);
        Self {
            skeleton,
            config,
            model,
            solved_handedness: Handedness::Left,
            last_report: None,
        }
    }

    /// Solves one frame and returns the 26 output joints.
    pub fn solve(&mut self, keypoints: &HandKeypoints, handedness: Handedness) -> HandJointSet {
        let mut joints = HandJointSet::default();
        self.solve_into(keypoints, handedness, &mut joints);
        joints
    }

    /// Solves one frame into a caller-owned joint set.
    ///
    /// Never fails. A frame with non-finite coordinates is not solved: the
    /// previous solution is written out again, with the handedness it was
    /// solved for, and the report repeats its fit.
    pub fn solve_into(&mut self, keypoints: &HandKeypoints, handedness: Handedness, out: &mut HandJointSet) -> SolveReport {
        let iterations = if keypoints.is_finite() {
            self.model.set_targets(keypoints, handedness);
            optimize(&mut self.model, &self.config);
            self.solved_handedness = handedness;
            self.config.iterations
        } else {
            warn!(%handedness, previous = %self.solved_handedness, "skipping frame with non-finite keypoints");
            0
        };

        let (rms_error, max_error) = alignment_error(self.model.current(), self.model.targets());
        let report = SolveReport {
            handedness: self.solved_handedness,
            iterations,
            rms_error,
            max_error,
        };
        write_joint_set(&self.model, &self.skeleton, self.solved_handedness, out);

        debug!(
            handedness = %report.handedness,
            iterations = report.iterations,
            rms = report.rms_error,
            max = report.max_error,
            "hand solved"
        );
        self.last_report = Some(report);
        report
    }

    /// Keypoints to feed a joint set back in as the next frame.
    ///
    /// Each keypoint is read from the joint the skeleton reports it on. A
    /// keypoint whose joint is hidden takes the current solution's position.
    #[must_use]
    pub fn feedback_keypoints(&self, joints: &HandJointSet) -> HandKeypoints {
        let mut keypoints = self.model.current_keypoints();
        if self.solved_handedness.is_mirrored() {
            keypoints = keypoints.mirrored_x();
        }
        for keypoint in Keypoint::ALL {
            if let Some(joint) = self.skeleton.joint_for(keypoint) {
                keypoints[keypoint] = joints[joint].position;
            }
        }
        keypoints
    }

    /// Returns the model to its rest pose, discarding the warm start.
    pub fn reset(&mut self) {
        self.model.reset();
        self.solved_handedness = Handedness::Left;
        self.last_report = None;
    }

    /// Fit summary of the most recent solve.
    #[must_use]
    pub fn last_report(&self) -> Option<&SolveReport> {
        self.last_report.as_ref()
    }

    /// The hand model in its solved state.
    #[must_use]
    pub fn model(&self) -> &HandModel {
        &self.model
    }

    /// The skeleton this solver was built with.
    #[must_use]
    pub fn skeleton(&self) -> &HandSkeleton {
        &self.skeleton
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }
}
