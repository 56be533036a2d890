//! Whole-hand rigid alignment (Kabsch without scale).
//!
//! Finds the rotation and translation that best map the hand's current joint
//! positions onto the observed keypoints, in the least-squares sense, and
//! applies it to the wrist.

use nalgebra::{Isometry3, Matrix3, Rotation3, Translation3, UnitQuaternion};
use tracing::warn;

use crate::model::{HandModel, KeypointMatrix};

/// Optimal rigid transform taking the `source` columns onto the `target` columns.
///
/// Reflections are corrected so the result is always a proper rotation.
/// Returns `None` when the SVD does not yield singular vectors.
///
/// # Example
///
/// ```
/// use hand_kinematics::{HandModel, HandSkeleton, rigid_transform};
/// use nalgebra::{Isometry3, Point3, Vector3};
///
/// let source = *HandModel::new(&HandSkeleton::default()).current();
/// let motion = Isometry3::new(Vector3::new(0.1, 0.0, -0.2), Vector3::new(0.0, 0.3, 0.0));
/// let mut target = source;
/// for mut column in target.column_iter_mut() {
///     let moved = motion * Point3::from(column.clone_owned());
///     column.copy_from(&moved.coords);
/// }
///
/// let found = rigid_transform(&source, &target).unwrap();
/// assert!(found.rotation.angle_to(&motion.rotation) < 1e-7);
/// ```
#[must_use]
pub fn rigid_transform(source: &KeypointMatrix, target: &KeypointMatrix) -> Option<Isometry3<f64>> {
    let source_centroid = source.column_mean();
    let target_centroid = target.column_mean();

    // Covariance H = sum(source_i * target_i^T) over the centered columns
    let mut h = Matrix3::zeros();
    for (s, t) in source.column_iter().zip(target.column_iter()) {
        h += (s - source_centroid) * (t - target_centroid).transpose();
    }

    let svd = h.svd(true, true);
    let u = svd.u?;
    let v_t = svd.v_t?;

    // R = V * U^T
    let mut rotation_matrix = v_t.transpose() * u.transpose();

    // det(R) = -1 means a reflection; flip the last column of V
    if rotation_matrix.determinant() < 0.0 {
        let mut v = v_t.transpose();
        for i in 0..3 {
            v[(i, 2)] = -v[(i, 2)];
        }
        rotation_matrix = v * u.transpose();
    }

    let rotation = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(rotation_matrix));
    let translation = target_centroid - rotation * source_centroid;

    Some(Isometry3::from_parts(Translation3::from(translation), rotation))
}

/// Root-mean-square and maximum distance between corresponding columns.
#[must_use]
pub fn alignment_error(source: &KeypointMatrix, target: &KeypointMatrix) -> (f64, f64) {
    let mut sum_squared = 0.0;
    let mut max_error: f64 = 0.0;

    for (s, t) in source.column_iter().zip(target.column_iter()) {
        let distance = (s - t).norm();
        sum_squared += distance * distance;
        max_error = max_error.max(distance);
    }

    #[allow(clippy::cast_precision_loss)]
    let rms = (sum_squared / source.ncols() as f64).sqrt();
    (rms, max_error)
}

/// Moves the whole hand onto its targets and refreshes forward kinematics.
///
/// Falls back to the identity transform, with a warning, if the alignment
/// cannot be computed.
pub fn align_wrist(hand: &mut HandModel) {
    let transform = rigid_transform(hand.current(), hand.targets()).unwrap_or_else(|| {
        warn!("SVD produced no singular vectors, keeping wrist pose");
        Isometry3::identity()
    });

    hand.transform_wrist(&transform);
    hand.forward_kinematics();
}
