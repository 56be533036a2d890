//! Output joints and joint sets.
//!
//! The joint layout follows the OpenXR hand-joint enumeration: palm, wrist,
//! four thumb joints, then five joints for each remaining finger.

use std::ops::{Index, IndexMut};

use nalgebra::{Point3, UnitQuaternion};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{HandKeypoints, Keypoint};

/// Number of joints in a [`HandJointSet`].
pub const HAND_JOINT_COUNT: usize = 26;

/// One output joint, in OpenXR order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[allow(missing_docs)]
pub enum HandJoint {
    Palm,
    Wrist,
    ThumbMetacarpal,
    ThumbProximal,
    ThumbDistal,
    ThumbTip,
    IndexMetacarpal,
    IndexProximal,
    IndexIntermediate,
    IndexDistal,
    IndexTip,
    MiddleMetacarpal,
    MiddleProximal,
    MiddleIntermediate,
    MiddleDistal,
    MiddleTip,
    RingMetacarpal,
    RingProximal,
    RingIntermediate,
    RingDistal,
    RingTip,
    LittleMetacarpal,
    LittleProximal,
    LittleIntermediate,
    LittleDistal,
    LittleTip,
}

impl HandJoint {
    /// All joints in output order.
    pub const ALL: [Self; HAND_JOINT_COUNT] = [
        Self::Palm,
        Self::Wrist,
        Self::ThumbMetacarpal,
        Self::ThumbProximal,
        Self::ThumbDistal,
        Self::ThumbTip,
        Self::IndexMetacarpal,
        Self::IndexProximal,
        Self::IndexIntermediate,
        Self::IndexDistal,
        Self::IndexTip,
        Self::MiddleMetacarpal,
        Self::MiddleProximal,
        Self::MiddleIntermediate,
        Self::MiddleDistal,
        Self::MiddleTip,
        Self::RingMetacarpal,
        Self::RingProximal,
        Self::RingIntermediate,
        Self::RingDistal,
        Self::RingTip,
        Self::LittleMetacarpal,
        Self::LittleProximal,
        Self::LittleIntermediate,
        Self::LittleDistal,
        Self::LittleTip,
    ];

    /// First finger joint; finger joints occupy the slots from here on.
    pub const FIRST_FINGER_JOINT: Self = Self::ThumbMetacarpal;

    /// Position of this joint in the output order.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Joint at the given output position, if any.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < HAND_JOINT_COUNT {
            Some(Self::ALL[index])
        } else {
            None
        }
    }
}

/// Validity and tracking state of a joint relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RelationFlags {
    /// Position holds a usable value.
    pub position_valid: bool,
    /// Position comes from tracking rather than inference.
    pub position_tracked: bool,
    /// Orientation holds a usable value.
    pub orientation_valid: bool,
    /// Orientation comes from tracking rather than inference.
    pub orientation_tracked: bool,
}

impl RelationFlags {
    /// Every flag set.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            position_valid: true,
            position_tracked: true,
            orientation_valid: true,
            orientation_tracked: true,
        }
    }

    /// No flag set.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            position_valid: false,
            position_tracked: false,
            orientation_valid: false,
            orientation_tracked: false,
        }
    }

    /// Whether position and orientation are both valid and tracked.
    #[must_use]
    pub const fn is_fully_tracked(&self) -> bool {
        self.position_valid
            && self.position_tracked
            && self.orientation_valid
            && self.orientation_tracked
    }
}

/// Pose of one output joint.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointPose {
    /// Joint position.
    pub position: Point3<f64>,
    /// Joint orientation.
    pub orientation: UnitQuaternion<f64>,
    /// Relation state.
    pub flags: RelationFlags,
}

impl Default for JointPose {
    fn default() -> Self {
        Self {
            position: Point3::origin(),
            orientation: UnitQuaternion::identity(),
            flags: RelationFlags::none(),
        }
    }
}

impl JointPose {
    /// A fully tracked pose.
    #[must_use]
    pub const fn tracked(position: Point3<f64>, orientation: UnitQuaternion<f64>) -> Self {
        Self {
            position,
            orientation,
            flags: RelationFlags::all(),
        }
    }
}

/// Poses for every joint of one hand.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HandJointSet {
    /// Joint poses in [`HandJoint`] order.
    pub joints: [JointPose; HAND_JOINT_COUNT],
    /// Whether the set holds a solved pose.
    pub is_active: bool,
}

impl Default for HandJointSet {
    fn default() -> Self {
        Self {
            joints: [JointPose::default(); HAND_JOINT_COUNT],
            is_active: false,
        }
    }
}

impl HandJointSet {
    /// Iterate over `(joint, pose)` pairs in output order.
    pub fn iter(&self) -> impl Iterator<Item = (HandJoint, &JointPose)> {
        HandJoint::ALL.into_iter().zip(self.joints.iter())
    }

    /// Joint positions at the 21 keypoint locations, read through
    /// [`Keypoint::joint`].
    ///
    /// Assumes the standard layout, in which only the thumb root is left out
    /// of the set.
    #[must_use]
    pub fn keypoints(&self) -> HandKeypoints {
        let mut keypoints = HandKeypoints::default();
        for keypoint in Keypoint::ALL {
            keypoints[keypoint] = self[keypoint.joint()].position;
        }
        keypoints
    }
}

impl Index<HandJoint> for HandJointSet {
    type Output = JointPose;

    fn index(&self, joint: HandJoint) -> &Self::Output {
        &self.joints[joint.index()]
    }
}

impl IndexMut<HandJoint> for HandJointSet {
    fn index_mut(&mut self, joint: HandJoint) -> &mut Self::Output {
        &mut self.joints[joint.index()]
    }
}
