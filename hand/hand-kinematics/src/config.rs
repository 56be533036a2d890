//! Solver configuration: iteration count and per-joint limits.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{KinematicsError, KinematicsResult};
use crate::limits::{HingeLimit, SwingTwistLimit};

/// Outer iterations per solve when not configured otherwise.
pub const DEFAULT_ITERATIONS: usize = 15;

/// Limits for the thumb's solved bones.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ThumbLimits {
    /// Bone 1 (CMC joint).
    pub metacarpal: SwingTwistLimit,
    /// Bones 2 and 3 (MCP and IP joints).
    pub hinge: HingeLimit,
}

impl Default for ThumbLimits {
    fn default() -> Self {
        Self {
            metacarpal: SwingTwistLimit::from_degrees(70.0, -40.0, 40.0, -40.0, 40.0),
            hinge: HingeLimit::from_degrees(-90.0, 40.0),
        }
    }
}

/// Limits shared by the index, middle, ring and little fingers.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FingerLimits {
    /// Bone 0, the metacarpal's narrow cone.
    pub metacarpal: SwingTwistLimit,
    /// Bone 1 (MCP joint).
    pub proximal: SwingTwistLimit,
    /// Bones 2 and 3 (PIP and DIP joints).
    pub hinge: HingeLimit,
}

impl Default for FingerLimits {
    fn default() -> Self {
        Self {
            metacarpal: SwingTwistLimit::from_degrees(4.0, -30.0, 30.0, -10.0, 10.0),
            proximal: SwingTwistLimit::from_degrees(4.0, -20.0, 20.0, -89.0, 30.0),
            hinge: HingeLimit::from_degrees(-90.0, 10.0),
        }
    }
}

/// Configuration for a [`crate::HandSolver`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolverConfig {
    /// Outer optimizer iterations per solve. Always run in full.
    pub iterations: usize,
    /// Thumb joint limits.
    pub thumb: ThumbLimits,
    /// Non-thumb joint limits.
    pub fingers: FingerLimits,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            thumb: ThumbLimits::default(),
            fingers: FingerLimits::default(),
        }
    }
}

impl SolverConfig {
    /// Fewer iterations for tight frame budgets.
    #[must_use]
    pub fn fast() -> Self {
        Self {
            iterations: 5,
            ..Default::default()
        }
    }

    /// More iterations when latency matters less than fit.
    #[must_use]
    pub fn precise() -> Self {
        Self {
            iterations: 40,
            ..Default::default()
        }
    }

    /// Set the iteration count.
    #[must_use]
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the thumb limits.
    #[must_use]
    pub fn with_thumb(mut self, thumb: ThumbLimits) -> Self {
        self.thumb = thumb;
        self
    }

    /// Set the finger limits.
    #[must_use]
    pub fn with_fingers(mut self, fingers: FingerLimits) -> Self {
        self.fingers = fingers;
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the iteration count is zero or any limit is unusable.
    pub fn validate(&self) -> KinematicsResult<()> {
        if self.iterations == 0 {
            return Err(KinematicsError::ZeroIterations);
        }

        self.thumb.metacarpal.validate("thumb.metacarpal")?;
        self.thumb.hinge.validate("thumb.hinge")?;
        self.fingers.metacarpal.validate("fingers.metacarpal")?;
        self.fingers.proximal.validate("fingers.proximal")?;
        self.fingers.hinge.validate("fingers.hinge")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_is_valid() {
        let config = SolverConfig::default();
        assert_eq!(config.iterations, 15);
        assert!(config.validate().is_ok());
        assert!(SolverConfig::fast().validate().is_ok());
        assert!(SolverConfig::precise().validate().is_ok());
    }

    #[test]
    fn test_default_limits() {
        let fingers = FingerLimits::default();
        assert_relative_eq!(fingers.proximal.flexion().0, (-89.0_f64).to_radians());
        assert_relative_eq!(fingers.metacarpal.max_twist(), 4.0_f64.to_radians());

        let (min, max) = ThumbLimits::default().hinge.range().unwrap_or_default();
        assert_relative_eq!(min, (-90.0_f64).to_radians());
        assert_relative_eq!(max, 40.0_f64.to_radians());
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let config = SolverConfig::default().with_iterations(0);
        assert_eq!(config.validate(), Err(KinematicsError::ZeroIterations));
    }

    #[test]
    fn test_bad_limit_is_named() {
        let fingers = FingerLimits {
            metacarpal: SwingTwistLimit::from_degrees(4.0, -30.0, 95.0, -10.0, 10.0),
            ..Default::default()
        };
        let err = SolverConfig::default().with_fingers(fingers).validate().unwrap_err();
        assert!(matches!(
            err,
            KinematicsError::InvalidLimit {
                name: "fingers.metacarpal",
                ..
            }
        ));
        assert!(err.to_string().contains("fingers.metacarpal"));
    }

    #[test]
    fn test_builders() {
        let thumb = ThumbLimits {
            hinge: HingeLimit::free(),
            ..Default::default()
        };
        let config = SolverConfig::fast().with_iterations(3).with_thumb(thumb);
        assert_eq!(config.iterations, 3);
        assert_eq!(config.thumb.hinge.range(), None);
    }
}
