//! Error types for hand tracking data.

use thiserror::Error;

/// Errors produced when converting raw tracking data into typed values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HandTypesError {
    /// Handedness selector other than 0 (left) or 1 (right).
    #[error("invalid handedness selector {0} (expected 0 = left or 1 = right)")]
    InvalidHandedness(u8),

    /// Keypoint index outside the 21-point schema.
    #[error("keypoint index {index} out of range (schema has {count} keypoints)")]
    KeypointOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of keypoints in the schema.
        count: usize,
    },
}

/// Result type for hand type conversions.
pub type HandTypesResult<T> = Result<T, HandTypesError>;
