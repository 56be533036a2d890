//! Anatomical joint limits.
//!
//! Two limit models act on a bone's local rotation in place:
//!
//! - [`HingeLimit`]: locks the rotation to the bone's +X axis, optionally
//!   clamping the angle about it
//! - [`SwingTwistLimit`]: clamps the twist about the forward (-Z) axis and
//!   confines the forward axis to an asymmetric rectangular cone
//!
//! Limits do not refresh forward kinematics; the caller does.

use std::f64::consts::{FRAC_PI_2, TAU};

use nalgebra::{UnitQuaternion, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{KinematicsError, KinematicsResult};
use crate::math::rotation_between;

/// A swung forward axis whose `z` is above `-HEMISPHERE_EPSILON` is pinned to it.
pub const HEMISPHERE_EPSILON: f64 = 1e-6;

/// Forward axis of every bone frame.
#[must_use]
pub fn forward() -> Vector3<f64> {
    -Vector3::z()
}

/// A constraint applied to a bone's local rotation after each estimate.
pub trait JointLimit {
    /// Replaces `rotation` with the nearest rotation the joint allows.
    fn apply(&self, rotation: &mut UnitQuaternion<f64>);
}

/// Signed angle about +X, measured from the image of +Y.
///
/// Meaningful for rotations already locked to the X axis.
#[must_use]
pub fn hinge_angle(rotation: &UnitQuaternion<f64>) -> f64 {
    let v = rotation * Vector3::y();
    v.z.atan2(v.y)
}

/// Splits a rotation into swing (moving the forward axis) and twist (about the swung axis).
///
/// `rotation == twist * swing`.
#[must_use]
pub fn swing_twist(rotation: &UnitQuaternion<f64>) -> (UnitQuaternion<f64>, UnitQuaternion<f64>) {
    let swing = rotation_between(&forward(), &(rotation * forward()));
    let twist = rotation * swing.inverse();
    (swing, twist)
}

/// Magnitude of the twist component of a rotation, in `[0, π]`.
#[must_use]
pub fn twist_angle(rotation: &UnitQuaternion<f64>) -> f64 {
    swing_twist(rotation).1.angle()
}

/// Hinge joint about the bone's +X axis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HingeLimit {
    /// `(min, max)` angle in radians, or `None` to only lock the axis.
    range: Option<(f64, f64)>,
}

impl HingeLimit {
    /// Hinge with an angle range in radians. Bounds are reordered if reversed.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self { range: Some((min, max)) }
    }

    /// Hinge with an angle range in degrees.
    #[must_use]
    pub fn from_degrees(min: f64, max: f64) -> Self {
        Self::new(min.to_radians(), max.to_radians())
    }

    /// Axis lock with no angle range.
    #[must_use]
    pub fn free() -> Self {
        Self { range: None }
    }

    /// The `(min, max)` range in radians, if any.
    #[must_use]
    pub fn range(&self) -> Option<(f64, f64)> {
        self.range
    }

    /// Whether `angle` lies inside the range (always true without one).
    #[must_use]
    pub fn contains(&self, angle: f64) -> bool {
        self.range.is_none_or(|(min, max)| angle >= min && angle <= max)
    }

    /// Checks the range bounds are usable.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::InvalidLimit`] if a bound is not finite.
    pub fn validate(&self, name: &'static str) -> KinematicsResult<()> {
        if let Some((min, max)) = self.range {
            for value in [min, max] {
                if !value.is_finite() {
                    return Err(KinematicsError::InvalidLimit {
                        name,
                        value,
                        reason: "hinge bound must be finite",
                    });
                }
            }
            if min > max {
                return Err(KinematicsError::InvalidLimit {
                    name,
                    value: min,
                    reason: "hinge minimum exceeds maximum",
                });
            }
        }
        Ok(())
    }
}

impl JointLimit for HingeLimit {
    fn apply(&self, rotation: &mut UnitQuaternion<f64>) {
        let image = *rotation * Vector3::x();
        let correction = rotation_between(&image, &Vector3::x());
        *rotation = UnitQuaternion::new_normalize((correction * *rotation).into_inner());

        let Some((min, max)) = self.range else {
            return;
        };

        let angle = hinge_angle(rotation);
        if angle > min && angle < max {
            return;
        }

        *rotation = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), nearest_bound(angle, min, max));
    }
}

/// Picks the bound an out-of-range angle snaps to, comparing the distance
/// past `max` going one way round the circle with the distance short of
/// `min` going the other way.
fn nearest_bound(angle: f64, min: f64, max: f64) -> f64 {
    let (positive, negative) = if angle < 0.0 {
        (TAU - angle, angle)
    } else {
        (angle, angle - TAU)
    };

    if positive - max > min - negative { min } else { max }
}

/// Twist clamp plus a rectangular cone on the forward axis.
///
/// The cone is expressed as angle bounds in tangent space: the swung forward
/// axis is projected onto the plane `z = -1` and its `x` (left/right) and `y`
/// (curled/uncurled) coordinates are clamped to the tangents of the bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SwingTwistLimit {
    max_twist: f64,
    left: f64,
    right: f64,
    curled: f64,
    uncurled: f64,
}

impl SwingTwistLimit {
    /// Limit from radians. Reversed bound pairs are reordered.
    ///
    /// # Arguments
    ///
    /// * `max_twist` - Largest twist magnitude about the swung forward axis
    /// * `left`, `right` - Lateral bounds (rotation toward -X and +X)
    /// * `curled`, `uncurled` - Flexion bounds (toward the palm and away from it)
    #[must_use]
    pub fn new(max_twist: f64, left: f64, right: f64, curled: f64, uncurled: f64) -> Self {
        let (left, right) = if left <= right { (left, right) } else { (right, left) };
        let (curled, uncurled) = if curled <= uncurled {
            (curled, uncurled)
        } else {
            (uncurled, curled)
        };
        Self {
            max_twist: max_twist.abs(),
            left,
            right,
            curled,
            uncurled,
        }
    }

    /// Limit from degrees.
    #[must_use]
    pub fn from_degrees(max_twist: f64, left: f64, right: f64, curled: f64, uncurled: f64) -> Self {
        Self::new(
            max_twist.to_radians(),
            left.to_radians(),
            right.to_radians(),
            curled.to_radians(),
            uncurled.to_radians(),
        )
    }

    /// Largest allowed twist in radians.
    #[must_use]
    pub fn max_twist(&self) -> f64 {
        self.max_twist
    }

    /// Lateral `(left, right)` bounds in radians.
    #[must_use]
    pub fn lateral(&self) -> (f64, f64) {
        (self.left, self.right)
    }

    /// Flexion `(curled, uncurled)` bounds in radians.
    #[must_use]
    pub fn flexion(&self) -> (f64, f64) {
        (self.curled, self.uncurled)
    }

    /// Checks every angle is finite and each cone bound has a tangent.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::InvalidLimit`] naming the first bad parameter.
    pub fn validate(&self, name: &'static str) -> KinematicsResult<()> {
        if !self.max_twist.is_finite() || self.max_twist < 0.0 {
            return Err(KinematicsError::InvalidLimit {
                name,
                value: self.max_twist,
                reason: "twist must be finite and non-negative",
            });
        }

        for value in [self.left, self.right, self.curled, self.uncurled] {
            if !(value.is_finite() && value.abs() < FRAC_PI_2) {
                return Err(KinematicsError::InvalidLimit {
                    name,
                    value,
                    reason: "cone bound must lie strictly between -90 and 90 degrees",
                });
            }
        }

        if self.left > self.right || self.curled > self.uncurled {
            return Err(KinematicsError::InvalidLimit {
                name,
                value: self.left.max(self.curled),
                reason: "lower cone bound exceeds upper bound",
            });
        }

        Ok(())
    }
}

impl JointLimit for SwingTwistLimit {
    fn apply(&self, rotation: &mut UnitQuaternion<f64>) {
        let (_, twist) = swing_twist(rotation);
        let twist = match twist.axis_angle() {
            Some((axis, angle)) if angle > self.max_twist => UnitQuaternion::from_axis_angle(&axis, self.max_twist),
            _ => twist,
        };

        let mut swung = *rotation * forward();
        if swung.z > -HEMISPHERE_EPSILON {
            swung.z = -HEMISPHERE_EPSILON;
        }
        swung /= -swung.z;

        swung.x = swung.x.max(self.left.tan()).min(self.right.tan());
        swung.y = swung.y.max(self.curled.tan()).min(self.uncurled.tan());

        let swing = rotation_between(&forward(), &swung);
        *rotation = UnitQuaternion::new_normalize((twist * swing).into_inner());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn about_x(degrees: f64) -> UnitQuaternion<f64> {
        UnitQuaternion::from_axis_angle(&Vector3::x_axis(), degrees.to_radians())
    }

    fn finger_hinge() -> HingeLimit {
        HingeLimit::from_degrees(-90.0, 10.0)
    }

    #[test]
    fn test_hinge_angle() {
        assert_relative_eq!(hinge_angle(&about_x(-35.0)), (-35.0_f64).to_radians(), epsilon = 1e-12);
        assert_relative_eq!(hinge_angle(&UnitQuaternion::identity()), 0.0);
    }

    #[test]
    fn test_hinge_in_range_is_unchanged() {
        let mut rotation = about_x(-45.0);
        finger_hinge().apply(&mut rotation);
        assert!(rotation.angle_to(&about_x(-45.0)) < 1e-7);
    }

    #[test]
    fn test_hinge_clamps_to_nearest_bound() {
        let mut rotation = about_x(30.0);
        finger_hinge().apply(&mut rotation);
        assert_relative_eq!(hinge_angle(&rotation), 10.0_f64.to_radians(), epsilon = 1e-12);

        let mut rotation = about_x(-120.0);
        finger_hinge().apply(&mut rotation);
        assert_relative_eq!(hinge_angle(&rotation), (-90.0_f64).to_radians(), epsilon = 1e-12);
    }

    #[test]
    fn test_hinge_wrap_tie_break() {
        // 170°: 160° past max one way, 100° short of min the other way.
        let mut rotation = about_x(170.0);
        finger_hinge().apply(&mut rotation);
        assert_relative_eq!(hinge_angle(&rotation), (-90.0_f64).to_radians(), epsilon = 1e-12);

        // -100°: the negative branch measures 450° past max against 10° short of min.
        let mut rotation = about_x(-100.0);
        finger_hinge().apply(&mut rotation);
        assert_relative_eq!(hinge_angle(&rotation), (-90.0_f64).to_radians(), epsilon = 1e-12);
    }

    #[test]
    fn test_hinge_bound_is_snapped() {
        // Exactly on a bound is not strictly inside and gets rewritten to it.
        let mut rotation = about_x(10.0);
        finger_hinge().apply(&mut rotation);
        assert_relative_eq!(hinge_angle(&rotation), 10.0_f64.to_radians(), epsilon = 1e-12);
    }

    #[test]
    fn test_hinge_locks_axis() {
        let off_axis = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 0.3) * about_x(-40.0);
        let mut rotation = off_axis;
        HingeLimit::free().apply(&mut rotation);

        assert_relative_eq!(rotation * Vector3::x(), Vector3::x(), epsilon = 1e-12);
        assert!(hinge_angle(&rotation) < 0.0);
    }

    #[test]
    fn test_hinge_contains() {
        let hinge = finger_hinge();
        assert!(hinge.contains(0.0));
        assert!(!hinge.contains(0.5));
        assert!(HingeLimit::free().contains(100.0));
        assert_eq!(HingeLimit::new(1.0, -1.0).range(), Some((-1.0, 1.0)));
    }

    #[test]
    fn test_swing_twist_decomposition() {
        let twist_only = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 0.4);
        assert_relative_eq!(twist_angle(&twist_only), 0.4, epsilon = 1e-12);

        let swing_only = about_x(-30.0);
        assert!(twist_angle(&swing_only) < 1e-7);

        let rotation = twist_only * swing_only;
        let (swing, twist) = swing_twist(&rotation);
        assert!((twist * swing).angle_to(&rotation) < 1e-7);
    }

    #[test]
    fn test_swing_twist_clamps_twist() {
        let limit = SwingTwistLimit::from_degrees(4.0, -20.0, 20.0, -89.0, 30.0);
        let mut rotation = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 0.5);
        limit.apply(&mut rotation);

        assert_relative_eq!(twist_angle(&rotation), 4.0_f64.to_radians(), epsilon = 1e-12);
        assert_relative_eq!(rotation * forward(), forward(), epsilon = 1e-12);
    }

    #[test]
    fn test_swing_twist_clamps_cone() {
        let limit = SwingTwistLimit::from_degrees(4.0, -30.0, 30.0, -10.0, 10.0);

        // Curling 40° toward the palm stops at the 10° curled bound.
        let mut rotation = about_x(-40.0);
        limit.apply(&mut rotation);
        let swung = rotation * forward();
        assert_relative_eq!((swung.y / -swung.z).atan(), (-10.0_f64).to_radians(), epsilon = 1e-12);
        assert!(rotation.angle_to(&about_x(-10.0)) < 1e-7);
    }

    #[test]
    fn test_swing_inside_cone_is_unchanged() {
        let limit = SwingTwistLimit::from_degrees(70.0, -40.0, 40.0, -40.0, 40.0);
        let rotation = UnitQuaternion::from_euler_angles(0.2, -0.3, 0.5);
        let mut clamped = rotation;
        limit.apply(&mut clamped);

        assert!(clamped.angle_to(&rotation) < 1e-7);
    }

    #[test]
    fn test_swing_behind_hemisphere_stays_finite() {
        let limit = SwingTwistLimit::from_degrees(4.0, -30.0, 30.0, -10.0, 10.0);
        let mut rotation = about_x(180.0);
        limit.apply(&mut rotation);

        assert!(rotation.coords.iter().all(|c| c.is_finite()));
        assert_relative_eq!(rotation * forward(), forward(), epsilon = 1e-9);
        assert_relative_eq!(rotation.angle(), 4.0_f64.to_radians(), epsilon = 1e-9);
    }

    #[test]
    fn test_swing_twist_validate() {
        assert!(SwingTwistLimit::from_degrees(4.0, -20.0, 20.0, -89.0, 30.0).validate("ok").is_ok());

        let limit = SwingTwistLimit::from_degrees(4.0, -20.0, 20.0, -90.0, 30.0);
        assert!(matches!(
            limit.validate("proximal"),
            Err(KinematicsError::InvalidLimit { name: "proximal", .. })
        ));

        let limit = SwingTwistLimit::new(f64::NAN, 0.0, 0.0, 0.0, 0.0);
        assert!(limit.validate("twist").is_err());

        assert!(HingeLimit::new(f64::NEG_INFINITY, 0.0).validate("hinge").is_err());
        assert!(HingeLimit::new(-PI, PI).validate("hinge").is_ok());
    }
}
