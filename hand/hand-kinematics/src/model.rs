//! The articulated hand: wrist, finger chains, and the current/target point sets.

use hand_types::{FINGER_COUNT, Finger, HandKeypoints, Handedness, KEYPOINT_COUNT, Keypoint};
use nalgebra::{Isometry3, Point3, SMatrix, Translation3, UnitQuaternion, Vector3};

use crate::skeleton::{BONES_PER_FINGER, HandSkeleton};

/// 21 keypoint positions as the columns of a 3×21 matrix.
pub type KeypointMatrix = SMatrix<f64, 3, KEYPOINT_COUNT>;

/// One bone of a finger chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bone {
    local_rotation: UnitQuaternion<f64>,
    offset: Vector3<f64>,
    world_pose: Isometry3<f64>,
    keypoint: Option<Keypoint>,
}

impl Bone {
    fn new(offset: Vector3<f64>, local_rotation: UnitQuaternion<f64>, keypoint: Option<Keypoint>) -> Self {
        Self {
            local_rotation,
            offset,
            world_pose: Isometry3::identity(),
            keypoint,
        }
    }

    /// Orientation relative to the parent bone (or the wrist for bone 0).
    #[must_use]
    pub fn local_rotation(&self) -> &UnitQuaternion<f64> {
        &self.local_rotation
    }

    /// Fixed offset from the parent joint, in the parent's frame.
    #[must_use]
    pub fn offset(&self) -> &Vector3<f64> {
        &self.offset
    }

    /// World pose as of the last forward-kinematics pass.
    #[must_use]
    pub fn world_pose(&self) -> &Isometry3<f64> {
        &self.world_pose
    }

    /// World position of this bone's joint.
    #[must_use]
    pub fn position(&self) -> Point3<f64> {
        Point3::from(self.world_pose.translation.vector)
    }

    /// The keypoint observed at this joint, if any.
    #[must_use]
    pub fn keypoint(&self) -> Option<Keypoint> {
        self.keypoint
    }
}

/// The five bones of one finger, root first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FingerChain {
    bones: [Bone; BONES_PER_FINGER],
}

impl FingerChain {
    /// Bones ordered from the wrist outward.
    #[must_use]
    pub fn bones(&self) -> &[Bone; BONES_PER_FINGER] {
        &self.bones
    }
}

/// Solver state for one hand.
///
/// Persists across frames: the previous solution is where the next solve
/// starts. Every `local_rotation_mut` or wrist change must be followed by
/// [`HandModel::forward_kinematics`] before world poses are read again.
#[derive(Debug, Clone, PartialEq)]
pub struct HandModel {
    wrist_pose: Isometry3<f64>,
    fingers: [FingerChain; FINGER_COUNT],
    rest_rotations: [[UnitQuaternion<f64>; BONES_PER_FINGER]; FINGER_COUNT],
    current: KeypointMatrix,
    target: KeypointMatrix,
}

impl HandModel {
    /// Builds a hand at its rest pose with the wrist at the origin.
    ///
    /// Root bones start at the skeleton's rest orientation; all other bones
    /// start straight.
    #[must_use]
    pub fn new(skeleton: &HandSkeleton) -> Self {
        let mut rest_rotations = [[UnitQuaternion::identity(); BONES_PER_FINGER]; FINGER_COUNT];
        for (rest, root) in rest_rotations.iter_mut().zip(skeleton.root_rotations) {
            rest[0] = root;
        }

        let fingers = Finger::ALL.map(|finger| FingerChain {
            bones: std::array::from_fn(|bone| {
                Bone::new(
                    skeleton.offset(finger, bone),
                    rest_rotations[finger.index()][bone],
                    HandSkeleton::keypoint(finger, bone),
                )
            }),
        });

        let mut hand = Self {
            wrist_pose: Isometry3::identity(),
            fingers,
            rest_rotations,
            current: KeypointMatrix::zeros(),
            target: KeypointMatrix::zeros(),
        };
        hand.forward_kinematics();
        hand.target = hand.current;
        hand
    }

    /// Returns the wrist and every bone to the rest pose and clears the targets to it.
    pub fn reset(&mut self) {
        self.wrist_pose = Isometry3::identity();
        for (chain, rest) in self.fingers.iter_mut().zip(&self.rest_rotations) {
            for (bone, rotation) in chain.bones.iter_mut().zip(rest) {
                bone.local_rotation = *rotation;
            }
        }
        self.forward_kinematics();
        self.target = self.current;
    }

    /// Recomputes every bone's world pose from the wrist down, then the current point matrix.
    ///
    /// Allocation-free.
    pub fn forward_kinematics(&mut self) {
        let wrist = self.wrist_pose;
        for chain in &mut self.fingers {
            let mut parent = wrist;
            for bone in &mut chain.bones {
                bone.world_pose = parent * Isometry3::from_parts(Translation3::from(bone.offset), bone.local_rotation);
                parent = bone.world_pose;
            }
        }

        self.current.set_column(0, &self.wrist_pose.translation.vector);
        for chain in &self.fingers {
            for bone in &chain.bones {
                if let Some(keypoint) = bone.keypoint {
                    self.current
                        .set_column(keypoint.index(), &bone.world_pose.translation.vector);
                }
            }
        }
    }

    /// Loads one frame of observations as the target point set.
    ///
    /// Right-hand frames are mirrored across X so both hands are solved in
    /// the same space.
    pub fn set_targets(&mut self, keypoints: &HandKeypoints, handedness: Handedness) {
        for (index, point) in keypoints.points.iter().enumerate() {
            let x = if handedness.is_mirrored() { -point.x } else { point.x };
            self.target.set_column(index, &Vector3::new(x, point.y, point.z));
        }
    }

    /// Rigidly moves the whole hand: `wrist ← transform ∘ wrist`.
    ///
    /// World poses are stale until [`HandModel::forward_kinematics`] runs.
    pub fn transform_wrist(&mut self, transform: &Isometry3<f64>) {
        let mut pose = transform * self.wrist_pose;
        pose.rotation = UnitQuaternion::new_normalize(pose.rotation.into_inner());
        self.wrist_pose = pose;
    }

    /// The wrist pose, root of the kinematic tree.
    #[must_use]
    pub fn wrist_pose(&self) -> &Isometry3<f64> {
        &self.wrist_pose
    }

    /// A finger chain.
    #[must_use]
    pub fn finger(&self, finger: Finger) -> &FingerChain {
        &self.fingers[finger.index()]
    }

    /// One bone.
    ///
    /// # Panics
    ///
    /// Panics if `bone >= BONES_PER_FINGER`.
    #[must_use]
    pub fn bone(&self, finger: Finger, bone: usize) -> &Bone {
        &self.fingers[finger.index()].bones[bone]
    }

    /// Mutable access to one bone's local rotation.
    ///
    /// # Panics
    ///
    /// Panics if `bone >= BONES_PER_FINGER`.
    pub fn local_rotation_mut(&mut self, finger: Finger, bone: usize) -> &mut UnitQuaternion<f64> {
        &mut self.fingers[finger.index()].bones[bone].local_rotation
    }

    /// Joint positions as of the last forward-kinematics pass.
    #[must_use]
    pub fn current(&self) -> &KeypointMatrix {
        &self.current
    }

    /// Observed positions for the frame being solved.
    #[must_use]
    pub fn targets(&self) -> &KeypointMatrix {
        &self.target
    }

    /// Observed position of one keypoint.
    #[must_use]
    pub fn target(&self, keypoint: Keypoint) -> Point3<f64> {
        Point3::from(self.target.column(keypoint.index()).into_owned())
    }

    /// Current positions in keypoint form, in solver (left-hand) space.
    #[must_use]
    pub fn current_keypoints(&self) -> HandKeypoints {
        let mut keypoints = HandKeypoints::default();
        for (point, column) in keypoints.points.iter_mut().zip(self.current.column_iter()) {
            *point = Point3::from(column.into_owned());
        }
        keypoints
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn hand() -> HandModel {
        HandModel::new(&HandSkeleton::adult())
    }

    #[test]
    fn test_rest_pose_geometry() {
        let hand = hand();
        let skeleton = HandSkeleton::adult();

        assert_relative_eq!(hand.current().column(0).into_owned(), Vector3::zeros());

        // Non-thumb fingers are straight along -Z at rest.
        let mcp = hand.bone(Finger::Middle, 1).position();
        let tip = hand.bone(Finger::Middle, 4).position();
        let length: f64 = (2..5).map(|b| skeleton.bone_length(Finger::Middle, b)).sum();
        assert_relative_eq!(tip - mcp, Vector3::new(0.0, 0.0, -length), epsilon = 1e-12);

        // Targets start at the rest pose.
        assert_eq!(hand.targets(), hand.current());
    }

    #[test]
    fn test_current_matrix_matches_bones() {
        let hand = hand();
        for finger in Finger::ALL {
            for bone in hand.finger(finger).bones() {
                if let Some(keypoint) = bone.keypoint() {
                    assert_eq!(hand.current().column(keypoint.index()).into_owned(), bone.position().coords);
                }
            }
        }
        assert!(hand.bone(Finger::Index, 0).keypoint().is_none());
    }

    #[test]
    fn test_forward_kinematics_after_rotation() {
        let mut hand = hand();
        let before = hand.bone(Finger::Index, 2).position();
        *hand.local_rotation_mut(Finger::Index, 2) = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), -FRAC_PI_2);
        hand.forward_kinematics();

        // The joint itself stays put; the distal bones fold.
        assert_relative_eq!(hand.bone(Finger::Index, 2).position(), before, epsilon = 1e-12);
        let bent = hand.bone(Finger::Index, 3).position() - before;
        assert_relative_eq!(bent, Vector3::new(0.0, -0.024, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_transform_wrist_moves_everything() {
        let mut hand = hand();
        let tip = hand.bone(Finger::Ring, 4).position();
        let transform = Isometry3::new(Vector3::new(0.1, 0.2, 0.3), Vector3::new(0.0, 0.5, 0.0));
        hand.transform_wrist(&transform);
        hand.forward_kinematics();

        assert_relative_eq!(hand.bone(Finger::Ring, 4).position(), transform * tip, epsilon = 1e-12);
    }

    #[test]
    fn test_right_hand_targets_are_mirrored() {
        let mut hand = hand();
        let mut frame = HandKeypoints::default();
        frame[Keypoint::IndexTip] = Point3::new(0.03, 0.01, -0.17);

        hand.set_targets(&frame, Handedness::Right);
        assert_eq!(hand.target(Keypoint::IndexTip), Point3::new(-0.03, 0.01, -0.17));

        hand.set_targets(&frame, Handedness::Left);
        assert_eq!(hand.target(Keypoint::IndexTip), Point3::new(0.03, 0.01, -0.17));
    }

    #[test]
    fn test_reset_restores_rest_pose() {
        let rest = hand();
        let mut hand = hand();
        *hand.local_rotation_mut(Finger::Thumb, 0) = UnitQuaternion::identity();
        hand.transform_wrist(&Isometry3::translation(1.0, 0.0, 0.0));
        hand.set_targets(&HandKeypoints::default(), Handedness::Left);
        hand.reset();

        assert_eq!(hand, rest);
    }

    #[test]
    fn test_current_keypoints() {
        let hand = hand();
        let keypoints = hand.current_keypoints();
        assert_eq!(keypoints[Keypoint::ThumbTip], hand.bone(Finger::Thumb, 4).position());
    }
}
