//! Per-bone rotation estimate: swing a bone so its distal chain points at its targets.

use hand_types::Finger;
use nalgebra::{Point3, UnitQuaternion, Vector3};

use crate::math::rotation_between;
use crate::model::HandModel;

/// Rotates one bone so the centroid of its descendants turns toward the
/// centroid of their targets.
///
/// Both centroids are measured in the bone's own frame and the correction is
/// composed on the right of the local rotation. Tip bones have no descendants
/// and are left alone. World poses are stale afterwards.
pub fn estimate_bone_rotation(hand: &mut HandModel, finger: Finger, bone: usize) {
    let Some(descendants) = hand.finger(finger).bones().get(bone + 1..) else {
        return;
    };
    if descendants.is_empty() {
        return;
    }

    let mut current = Vector3::zeros();
    let mut target = Vector3::zeros();
    for descendant in descendants {
        current += descendant.position().coords;
        if let Some(keypoint) = descendant.keypoint() {
            target += hand.target(keypoint).coords;
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let count = descendants.len() as f64;
    let pose = hand.bone(finger, bone).world_pose();
    let current_dir = pose.inverse_transform_point(&Point3::from(current / count)).coords;
    let target_dir = pose.inverse_transform_point(&Point3::from(target / count)).coords;

    let correction = rotation_between(&current_dir, &target_dir);
    let rotation = hand.local_rotation_mut(finger, bone);
    *rotation = UnitQuaternion::new_normalize((*rotation * correction).into_inner());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::HandSkeleton;
    use approx::assert_relative_eq;
    use hand_types::{HandKeypoints, Handedness};

    fn hand() -> HandModel {
        HandModel::new(&HandSkeleton::adult())
    }

    /// Targets taken from a copy of the hand with one bone bent.
    fn bent_targets(finger: Finger, bone: usize, bend: UnitQuaternion<f64>) -> HandKeypoints {
        let mut posed = hand();
        *posed.local_rotation_mut(finger, bone) = bend;
        posed.forward_kinematics();
        posed.current_keypoints()
    }

    #[test]
    fn test_matching_targets_leave_rotation_unchanged() {
        let mut hand = hand();
        let before = *hand.bone(Finger::Ring, 1).local_rotation();
        estimate_bone_rotation(&mut hand, Finger::Ring, 1);

        assert!(hand.bone(Finger::Ring, 1).local_rotation().angle_to(&before) < 1e-7);
    }

    #[test]
    fn test_recovers_single_bend() {
        let bend = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), -0.6);
        let mut hand = hand();
        hand.set_targets(&bent_targets(Finger::Index, 2, bend), Handedness::Left);

        estimate_bone_rotation(&mut hand, Finger::Index, 2);
        hand.forward_kinematics();

        assert!(hand.bone(Finger::Index, 2).local_rotation().angle_to(&bend) < 1e-7);
        assert_relative_eq!(
            hand.bone(Finger::Index, 4).position(),
            hand.target(hand_types::Keypoint::IndexTip),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_tip_bone_is_untouched() {
        let mut hand = hand();
        let mut frame = hand.current_keypoints();
        frame.points[8].y += 0.05;
        hand.set_targets(&frame, Handedness::Left);

        let before = *hand.bone(Finger::Index, 4).local_rotation();
        estimate_bone_rotation(&mut hand, Finger::Index, 4);
        assert_eq!(*hand.bone(Finger::Index, 4).local_rotation(), before);
    }

    #[test]
    fn test_collapsed_targets_are_ignored() {
        // Targets at the bone's own joint give a zero-length direction.
        let mut hand = hand();
        let joint = hand.bone(Finger::Middle, 3).position();
        let mut frame = hand.current_keypoints();
        frame.points[12] = joint;
        hand.set_targets(&frame, Handedness::Left);

        estimate_bone_rotation(&mut hand, Finger::Middle, 3);
        assert!(hand.bone(Finger::Middle, 3).local_rotation().angle() < 1e-7);
    }
}
