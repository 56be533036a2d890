//! Fixed-iteration coordinate descent over the whole hand.
//!
//! Each iteration aligns the wrist, refines the thumb, aligns again, then
//! refines every other finger from the knuckle outward. One final alignment
//! follows the last iteration. There is no convergence test: every solve
//! runs the configured number of iterations so frame cost is constant.

use hand_types::Finger;
use tracing::trace;

use crate::alignment::{align_wrist, alignment_error};
use crate::config::SolverConfig;
use crate::estimator::estimate_bone_rotation;
use crate::limits::JointLimit;
use crate::model::HandModel;

/// Runs the full optimizer schedule against the hand's current targets.
pub fn optimize(hand: &mut HandModel, config: &SolverConfig) {
    for iteration in 0..config.iterations {
        align_wrist(hand);
        refine_thumb(hand, config);
        align_wrist(hand);
        for finger in Finger::NON_THUMB {
            refine_finger(hand, finger, config);
        }

        trace!(
            iteration,
            rms = alignment_error(hand.current(), hand.targets()).0,
            "optimizer iteration"
        );
    }

    align_wrist(hand);
}

/// Estimates then limits one bone, and refreshes forward kinematics.
fn refine_bone(hand: &mut HandModel, finger: Finger, bone: usize, limit: &impl JointLimit) {
    estimate_bone_rotation(hand, finger, bone);
    limit.apply(hand.local_rotation_mut(finger, bone));
    hand.forward_kinematics();
}

/// Thumb bone 0 keeps its rest orientation; bones 1-3 are solved.
fn refine_thumb(hand: &mut HandModel, config: &SolverConfig) {
    let limits = &config.thumb;
    refine_bone(hand, Finger::Thumb, 1, &limits.metacarpal);
    refine_bone(hand, Finger::Thumb, 2, &limits.hinge);
    refine_bone(hand, Finger::Thumb, 3, &limits.hinge);
}

fn refine_finger(hand: &mut HandModel, finger: Finger, config: &SolverConfig) {
    let limits = &config.fingers;
    refine_bone(hand, finger, 0, &limits.metacarpal);
    refine_bone(hand, finger, 1, &limits.proximal);
    refine_bone(hand, finger, 2, &limits.hinge);
    refine_bone(hand, finger, 3, &limits.hinge);
}
