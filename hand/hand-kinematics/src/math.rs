//! Rotation helpers and the epsilon policy for degenerate geometry.
//!
//! Every rotation built from two vectors goes through [`rotation_between`],
//! which never produces `NaN`:
//!
//! | Input | Result |
//! |-------|--------|
//! | either vector shorter than [`DEGENERATE_EPSILON`] | identity |
//! | directions within [`ANTIPARALLEL_EPSILON`] of opposite | 180° about an axis orthogonal to `from` |
//! | otherwise | shortest-arc rotation |

use std::f64::consts::PI;

use nalgebra::{Quaternion, Unit, UnitQuaternion, Vector3};

/// Vectors with a norm below this are treated as zero-length.
pub const DEGENERATE_EPSILON: f64 = 1e-9;

/// Unit directions whose dot product is below `-1 + ANTIPARALLEL_EPSILON`
/// are treated as exactly opposite.
pub const ANTIPARALLEL_EPSILON: f64 = 1e-10;

/// Shortest-arc rotation taking the direction of `from` onto the direction of `to`.
///
/// Inputs need not be normalized.
///
/// # Example
///
/// ```
/// use hand_kinematics::math::rotation_between;
/// use nalgebra::Vector3;
///
/// let rot = rotation_between(&Vector3::x(), &Vector3::new(0.0, 2.0, 0.0));
/// assert!((rot * Vector3::x() - Vector3::y()).norm() < 1e-12);
/// ```
#[must_use]
pub fn rotation_between(from: &Vector3<f64>, to: &Vector3<f64>) -> UnitQuaternion<f64> {
    let (Some(from), Some(to)) = (
        Unit::try_new(*from, DEGENERATE_EPSILON),
        Unit::try_new(*to, DEGENERATE_EPSILON),
    ) else {
        return UnitQuaternion::identity();
    };

    let cos = from.dot(to.as_ref());
    if cos < -1.0 + ANTIPARALLEL_EPSILON {
        return UnitQuaternion::from_axis_angle(&orthogonal_axis(&from), PI);
    }

    // Half-angle construction: (1 + cos, from × to) normalizes to the shortest arc.
    let axis = from.cross(to.as_ref());
    UnitQuaternion::new_normalize(Quaternion::new(1.0 + cos, axis.x, axis.y, axis.z))
}

/// A unit axis orthogonal to `v`, chosen from the basis axis least aligned with it.
#[must_use]
pub fn orthogonal_axis(v: &Unit<Vector3<f64>>) -> Unit<Vector3<f64>> {
    let abs = v.abs();
    let basis = if abs.x <= abs.y && abs.x <= abs.z {
        Vector3::x()
    } else if abs.y <= abs.z {
        Vector3::y()
    } else {
        Vector3::z()
    };
    Unit::new_normalize(v.cross(&basis))
}
