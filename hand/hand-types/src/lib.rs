//! Core data types for optical hand tracking.
//!
//! This crate provides the values exchanged at the boundary of the hand
//! kinematics solver:
//!
//! - [`HandKeypoints`] - One frame of 21 keypoint estimates for one hand
//! - [`Keypoint`] - Named landmarks of the 21-point schema
//! - [`HandJointSet`] - Solved poses for the 26 output joints
//! - [`Handedness`] - Left/right selector, with raw `u8` conversion
//!
//! # Design Philosophy
//!
//! These types are **pure data**. They carry no solver state. They are the
//! common language between the keypoint estimator upstream, the kinematics
//! solver, and whatever consumes the solved joints downstream.
//!
//! # Coordinate System
//!
//! - Units: metres
//! - Right-handed
//! - Right-hand frames are solved in X-mirrored space; output is mirrored back
//!
//! # Example
//!
//! ```
//! use hand_types::{HandKeypoints, Handedness, Keypoint};
//! use nalgebra::Point3;
//!
//! let mut frame = HandKeypoints::default();
//! frame[Keypoint::IndexTip] = Point3::new(0.02, 0.0, -0.17);
//!
//! let hand = Handedness::try_from(1).unwrap();
//! assert_eq!(hand, Handedness::Right);
//! assert_eq!(frame.mirrored_x()[Keypoint::IndexTip].x, -0.02);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod error;
mod finger;
mod handedness;
mod joint;
mod keypoint;

pub use error::{HandTypesError, HandTypesResult};
pub use finger::{FINGER_COUNT, Finger};
pub use handedness::Handedness;
pub use joint::{HAND_JOINT_COUNT, HandJoint, HandJointSet, JointPose, RelationFlags};
pub use keypoint::{HandKeypoints, KEYPOINT_COUNT, KEYPOINTS_PER_FINGER, Keypoint};

// Re-export math types used in the public API
pub use nalgebra::{Point3, UnitQuaternion, Vector3};
