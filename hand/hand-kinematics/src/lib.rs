//! Joint-limited inverse kinematics for optical hand tracking.
//!
//! Given one frame of 21 noisy keypoints for one hand, [`HandSolver`]
//! reconstructs a rigid wrist placement and a local rotation for every finger
//! bone, respecting anatomical joint limits, and emits the 26-joint
//! [`HandJointSet`](hand_types::HandJointSet).
//!
//! # Pipeline
//!
//! Each solve loads the keypoints as targets (mirrored across X for a right
//! hand) and runs a fixed number of coordinate-descent iterations:
//!
//! 1. [`align_wrist`]: rigid (Kabsch) fit of the whole hand onto the targets
//! 2. Thumb: [`estimate_bone_rotation`] then a [`JointLimit`] per bone
//! 3. [`align_wrist`] again
//! 4. Index to little finger, knuckle outward, same as the thumb
//!
//! A last alignment follows the final iteration. Every rotation change is
//! followed by [`HandModel::forward_kinematics`].
//!
//! # Joint Limits
//!
//! | Joint | Model |
//! |-------|-------|
//! | Thumb CMC | [`SwingTwistLimit`], wide cone |
//! | Thumb MCP, IP | [`HingeLimit`] |
//! | Finger metacarpal | [`SwingTwistLimit`], narrow cone |
//! | Finger MCP | [`SwingTwistLimit`] |
//! | Finger PIP, DIP | [`HingeLimit`] |
//!
//! Defaults live in [`SolverConfig`].
//!
//! # Errors
//!
//! Solving never fails. Degenerate geometry is handled by the epsilon policy
//! in [`math`]; only [`HandSolver::new`] returns a [`KinematicsError`].
//!
//! # Example
//!
//! ```
//! use hand_kinematics::{HandSkeleton, HandSolver, SolverConfig};
//! use hand_types::Handedness;
//!
//! let mut solver = HandSolver::new(HandSkeleton::default(), SolverConfig::default()).unwrap();
//! let frame = solver.model().current_keypoints();
//!
//! let joints = solver.solve(&frame, Handedness::Right);
//! assert!(joints.is_active);
//! println!("{}", solver.last_report().unwrap());
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod alignment;
mod config;
mod error;
mod estimator;
mod frame;
mod limits;
pub mod math;
mod model;
mod optimizer;
mod report;
mod skeleton;
mod solver;

pub use alignment::{align_wrist, alignment_error, rigid_transform};
pub use config::{DEFAULT_ITERATIONS, FingerLimits, SolverConfig, ThumbLimits};
pub use error::{KinematicsError, KinematicsResult};
pub use estimator::estimate_bone_rotation;
pub use frame::{joint_pose, mirror_rotation, palm_pose, write_joint_set};
pub use limits::{
    HEMISPHERE_EPSILON, HingeLimit, JointLimit, SwingTwistLimit, forward, hinge_angle, swing_twist, twist_angle,
};
pub use model::{Bone, FingerChain, HandModel, KeypointMatrix};
pub use optimizer::optimize;
pub use report::SolveReport;
pub use skeleton::{BONES_PER_FINGER, HandSkeleton};
pub use solver::HandSolver;
