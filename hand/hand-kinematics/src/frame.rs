//! Conversion from the solved model to the 26-joint output set.
//!
//! Both hands are solved in left-hand space. Right-hand output is mirrored
//! back across X: positions flip `x`, and orientations are conjugated by the
//! mirror so they remain proper rotations.

use hand_types::{Finger, HandJoint, HandJointSet, Handedness, JointPose};
use nalgebra::{Isometry3, Point3, Rotation3, Translation3, UnitQuaternion};

use crate::model::HandModel;
use crate::skeleton::{BONES_PER_FINGER, HandSkeleton};

/// Converts one solver-space pose to an output joint pose.
#[must_use]
pub fn joint_pose(pose: &Isometry3<f64>, handedness: Handedness) -> JointPose {
    let mut position = Point3::from(pose.translation.vector);
    if !handedness.is_mirrored() {
        return JointPose::tracked(position, pose.rotation);
    }

    position.x = -position.x;
    JointPose::tracked(position, mirror_rotation(&pose.rotation))
}

/// Reflects a rotation across the YZ plane: `M · R · M` with `M = diag(-1, 1, 1)`.
///
/// Negates the first row (reflecting the basis), then the first column.
#[must_use]
pub fn mirror_rotation(rotation: &UnitQuaternion<f64>) -> UnitQuaternion<f64> {
    let mut m = rotation.to_rotation_matrix().into_inner();
    for j in 0..3 {
        m[(0, j)] = -m[(0, j)];
    }
    for i in 0..3 {
        m[(i, 0)] = -m[(i, 0)];
    }
    UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(m))
}

/// Palm pose: midway between the middle finger's metacarpal base and knuckle,
/// oriented like the metacarpal.
#[must_use]
pub fn palm_pose(hand: &HandModel) -> Isometry3<f64> {
    let metacarpal = hand.bone(Finger::Middle, 0).world_pose();
    let proximal = hand.bone(Finger::Middle, 1).world_pose();
    let midpoint = (metacarpal.translation.vector + proximal.translation.vector) * 0.5;
    Isometry3::from_parts(Translation3::from(midpoint), metacarpal.rotation)
}

/// Writes every output joint of the solved hand into `out`.
///
/// Bones land in the slots [`HandSkeleton::output_joint`] assigns. Thumb
/// slots left over by a hidden thumb bone are reset to an untracked pose.
pub fn write_joint_set(hand: &HandModel, skeleton: &HandSkeleton, handedness: Handedness, out: &mut HandJointSet) {
    out[HandJoint::Palm] = joint_pose(&palm_pose(hand), handedness);
    out[HandJoint::Wrist] = joint_pose(hand.wrist_pose(), handedness);

    for joint in [
        HandJoint::ThumbMetacarpal,
        HandJoint::ThumbProximal,
        HandJoint::ThumbDistal,
        HandJoint::ThumbTip,
    ] {
        out[joint] = JointPose::default();
    }

    for finger in Finger::ALL {
        for bone in 0..BONES_PER_FINGER {
            if let Some(joint) = skeleton.output_joint(finger, bone) {
                out[joint] = joint_pose(hand.bone(finger, bone).world_pose(), handedness);
            }
        }
    }

    out.is_active = true;
}
