//! Error types for solver construction.
//!
//! Solving a frame never fails; only configuration is validated.

use thiserror::Error;

/// Errors that can occur when building a solver.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum KinematicsError {
    /// A bone offset is non-finite or has zero length.
    #[error("bone offset for finger {finger} bone {bone} is invalid (length {length})")]
    InvalidBoneOffset {
        /// Finger index (0 = thumb).
        finger: usize,
        /// Bone index within the finger.
        bone: usize,
        /// Offending offset length.
        length: f64,
    },

    /// The hidden thumb bone index does not name a bone.
    #[error("hidden thumb bone {index} out of range (thumb has {bones} bones)")]
    HiddenThumbBoneOutOfRange {
        /// The configured index.
        index: usize,
        /// Number of bones in the thumb.
        bones: usize,
    },

    /// A joint limit angle cannot be used.
    #[error("invalid joint limit {name}: {value} rad ({reason})")]
    InvalidLimit {
        /// Which limit parameter.
        name: &'static str,
        /// Offending value in radians.
        value: f64,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// The optimizer was configured to run zero iterations.
    #[error("solver iteration count must be at least 1")]
    ZeroIterations,
}

/// Result type for solver construction.
pub type KinematicsResult<T> = Result<T, KinematicsError>;
