//! Fixed hand geometry: bone offsets, rest orientations and the hidden thumb bone.

use hand_types::{FINGER_COUNT, Finger, HandJoint, KEYPOINTS_PER_FINGER, Keypoint};
use nalgebra::{UnitQuaternion, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{KinematicsError, KinematicsResult};
use crate::math::DEGENERATE_EPSILON;

/// Number of bones in every finger chain (bone 0 is the keypoint-less root).
pub const BONES_PER_FINGER: usize = 5;

/// Static description of a hand.
///
/// Bones hang off their parent along the offsets stored here, in the parent's
/// frame. The wrist frame points the fingers along -Z with the palm normal on
/// -Y and the thumb toward +X (the left-hand convention every frame is solved in).
/// Bone offsets are never touched by the solver.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HandSkeleton {
    /// Offset of each bone's joint from its parent joint, indexed `[finger][bone]`.
    ///
    /// Bone 0's parent is the wrist.
    pub offsets: [[Vector3<f64>; BONES_PER_FINGER]; FINGER_COUNT],

    /// Rest orientation of each finger's root bone relative to the wrist.
    pub root_rotations: [UnitQuaternion<f64>; FINGER_COUNT],

    /// Index of the thumb bone left out of the 26-joint output.
    ///
    /// The thumb root (bone 0) is never reported; naming another bone hides
    /// it as well and leaves the last thumb slot untracked.
    pub hidden_thumb_bone: usize,
}

impl Default for HandSkeleton {
    fn default() -> Self {
        Self::adult()
    }
}

impl HandSkeleton {
    /// An average adult hand, roughly 18 cm from wrist to middle fingertip.
    #[must_use]
    pub fn adult() -> Self {
        // (root offset, bone lengths from root to tip)
        let thumb = (Vector3::new(0.020, -0.012, -0.005), [0.025, 0.045, 0.032, 0.027]);
        let index = (Vector3::new(0.025, 0.0, -0.010), [0.068, 0.040, 0.024, 0.022]);
        let middle = (Vector3::new(0.006, 0.0, -0.010), [0.065, 0.045, 0.028, 0.024]);
        let ring = (Vector3::new(-0.012, 0.0, -0.010), [0.060, 0.042, 0.027, 0.023]);
        let little = (Vector3::new(-0.028, 0.0, -0.010), [0.055, 0.033, 0.019, 0.021]);

        let mut offsets = [[Vector3::zeros(); BONES_PER_FINGER]; FINGER_COUNT];
        for (chain, (root, lengths)) in offsets.iter_mut().zip([thumb, index, middle, ring, little]) {
            chain[0] = root;
            for (offset, length) in chain[1..].iter_mut().zip(lengths) {
                *offset = Vector3::new(0.0, 0.0, -length);
            }
        }

        let mut root_rotations = [UnitQuaternion::identity(); FINGER_COUNT];
        root_rotations[Finger::Thumb.index()] =
            UnitQuaternion::from_axis_angle(&Vector3::y_axis(), (-40.0_f64).to_radians());

        Self {
            offsets,
            root_rotations,
            hidden_thumb_bone: 0,
        }
    }

    /// Returns a copy with every offset multiplied by `factor`.
    #[must_use]
    pub fn scaled(mut self, factor: f64) -> Self {
        for chain in &mut self.offsets {
            for offset in chain {
                *offset *= factor;
            }
        }
        self
    }

    /// Replaces the four distal bone lengths of a finger, laid out along -Z.
    #[must_use]
    pub fn with_bone_lengths(mut self, finger: Finger, lengths: [f64; BONES_PER_FINGER - 1]) -> Self {
        let chain = &mut self.offsets[finger.index()];
        for (offset, length) in chain[1..].iter_mut().zip(lengths) {
            *offset = Vector3::new(0.0, 0.0, -length);
        }
        self
    }

    /// Sets which thumb bone is left out of the output joint set.
    #[must_use]
    pub fn with_hidden_thumb_bone(mut self, bone: usize) -> Self {
        self.hidden_thumb_bone = bone;
        self
    }

    /// Offset of a bone from its parent.
    #[must_use]
    pub fn offset(&self, finger: Finger, bone: usize) -> Vector3<f64> {
        self.offsets[finger.index()][bone]
    }

    /// Distance from a bone's joint to its parent joint.
    #[must_use]
    pub fn bone_length(&self, finger: Finger, bone: usize) -> f64 {
        self.offset(finger, bone).norm()
    }

    /// The keypoint observed at a bone's joint. Root bones have none.
    #[must_use]
    pub fn keypoint(finger: Finger, bone: usize) -> Option<Keypoint> {
        bone.checked_sub(1).and_then(|joint| Keypoint::of_finger(finger, joint))
    }

    /// Output joint reporting a bone's pose.
    ///
    /// `None` for the thumb root, the hidden thumb bone, and bones past the
    /// tip. Thumb bones after a hidden one move up one slot; the other
    /// fingers keep a fixed layout.
    #[must_use]
    pub fn output_joint(&self, finger: Finger, bone: usize) -> Option<HandJoint> {
        if bone >= BONES_PER_FINGER {
            return None;
        }
        if !finger.is_thumb() {
            let first = HandJoint::IndexMetacarpal.index() + (finger.index() - 1) * BONES_PER_FINGER;
            return HandJoint::from_index(first + bone);
        }
        if bone == 0 || bone == self.hidden_thumb_bone {
            return None;
        }
        let skipped = usize::from(self.hidden_thumb_bone != 0 && self.hidden_thumb_bone < bone);
        HandJoint::from_index(HandJoint::ThumbMetacarpal.index() + bone - 1 - skipped)
    }

    /// Output joint located at a keypoint, `None` if that joint is hidden.
    #[must_use]
    pub fn joint_for(&self, keypoint: Keypoint) -> Option<HandJoint> {
        match keypoint.finger() {
            None => Some(HandJoint::Wrist),
            Some(finger) => {
                let bone = (keypoint.index() - 1) % KEYPOINTS_PER_FINGER + 1;
                self.output_joint(finger, bone)
            }
        }
    }

    /// Checks that the geometry can drive the solver.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A bone offset other than a root offset is non-finite or zero-length
    /// - A root offset is non-finite
    /// - The hidden thumb bone index is out of range
    pub fn validate(&self) -> KinematicsResult<()> {
        for (finger, chain) in self.offsets.iter().enumerate() {
            for (bone, offset) in chain.iter().enumerate() {
                let length = offset.norm();
                let usable = if bone == 0 {
                    length.is_finite()
                } else {
                    length.is_finite() && length > DEGENERATE_EPSILON
                };
                if !usable {
                    return Err(KinematicsError::InvalidBoneOffset { finger, bone, length });
                }
            }
        }

        if self.hidden_thumb_bone >= BONES_PER_FINGER {
            return Err(KinematicsError::HiddenThumbBoneOutOfRange {
                index: self.hidden_thumb_bone,
                bones: BONES_PER_FINGER,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_is_valid() {
        assert!(HandSkeleton::default().validate().is_ok());
    }

    #[test]
    fn test_bone_lengths() {
        let skeleton = HandSkeleton::adult();
        assert_relative_eq!(skeleton.bone_length(Finger::Middle, 1), 0.065, epsilon = 1e-12);
        assert_relative_eq!(skeleton.bone_length(Finger::Thumb, 4), 0.027, epsilon = 1e-12);

        let skeleton = skeleton.with_bone_lengths(Finger::Index, [0.07, 0.04, 0.03, 0.02]);
        assert_relative_eq!(skeleton.bone_length(Finger::Index, 3), 0.03, epsilon = 1e-12);
        assert_relative_eq!(skeleton.offset(Finger::Index, 1).z, -0.07, epsilon = 1e-12);
    }

    #[test]
    fn test_scaled() {
        let skeleton = HandSkeleton::adult().scaled(0.5);
        assert_relative_eq!(skeleton.bone_length(Finger::Ring, 2), 0.021, epsilon = 1e-12);
        assert!(skeleton.validate().is_ok());
    }

    #[test]
    fn test_keypoint_mapping() {
        assert_eq!(HandSkeleton::keypoint(Finger::Index, 0), None);
        assert_eq!(HandSkeleton::keypoint(Finger::Index, 1), Some(Keypoint::IndexMcp));
        assert_eq!(HandSkeleton::keypoint(Finger::Thumb, 1), Some(Keypoint::ThumbCmc));
        assert_eq!(HandSkeleton::keypoint(Finger::Little, 4), Some(Keypoint::LittleTip));
        assert_eq!(HandSkeleton::keypoint(Finger::Little, 5), None);
    }

    #[test]
    fn test_default_joint_layout_matches_keypoints() {
        let skeleton = HandSkeleton::adult();
        for keypoint in Keypoint::ALL {
            assert_eq!(skeleton.joint_for(keypoint), Some(keypoint.joint()), "{keypoint:?}");
        }
        assert_eq!(skeleton.output_joint(Finger::Thumb, 0), None);
        assert_eq!(skeleton.output_joint(Finger::Ring, 0), Some(HandJoint::RingMetacarpal));
        assert_eq!(skeleton.output_joint(Finger::Ring, 5), None);
    }

    #[test]
    fn test_hidden_thumb_bone_layout() {
        let skeleton = HandSkeleton::adult().with_hidden_thumb_bone(2);

        assert_eq!(skeleton.output_joint(Finger::Thumb, 0), None);
        assert_eq!(skeleton.output_joint(Finger::Thumb, 1), Some(HandJoint::ThumbMetacarpal));
        assert_eq!(skeleton.output_joint(Finger::Thumb, 2), None);
        assert_eq!(skeleton.output_joint(Finger::Thumb, 3), Some(HandJoint::ThumbProximal));
        assert_eq!(skeleton.output_joint(Finger::Thumb, 4), Some(HandJoint::ThumbDistal));

        assert_eq!(skeleton.joint_for(Keypoint::ThumbMcp), None);
        assert_eq!(skeleton.joint_for(Keypoint::ThumbTip), Some(HandJoint::ThumbDistal));
        assert_eq!(skeleton.joint_for(Keypoint::IndexMcp), Some(HandJoint::IndexProximal));
        assert_eq!(skeleton.joint_for(Keypoint::Wrist), Some(HandJoint::Wrist));
    }

    #[test]
    fn test_rejects_zero_length_bone() {
        let mut skeleton = HandSkeleton::adult();
        skeleton.offsets[2][3] = Vector3::zeros();
        assert_eq!(
            skeleton.validate(),
            Err(KinematicsError::InvalidBoneOffset {
                finger: 2,
                bone: 3,
                length: 0.0
            })
        );
    }

    #[test]
    fn test_rejects_non_finite_root() {
        let mut skeleton = HandSkeleton::adult();
        skeleton.offsets[0][0].x = f64::NAN;
        assert!(matches!(
            skeleton.validate(),
            Err(KinematicsError::InvalidBoneOffset { finger: 0, bone: 0, .. })
        ));
    }

    #[test]
    fn test_rejects_hidden_bone_out_of_range() {
        let skeleton = HandSkeleton::adult().with_hidden_thumb_bone(5);
        assert_eq!(
            skeleton.validate(),
            Err(KinematicsError::HiddenThumbBoneOutOfRange { index: 5, bones: 5 })
        );
    }
}
