//! Which physical hand a frame belongs to.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{HandTypesError, HandTypesResult};

/// Handedness of a tracked hand.
///
/// The kinematic model is built for a left hand. Right-hand frames are
/// mirrored across the YZ plane on the way in and back on the way out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Handedness {
    /// Left hand, selector 0. Solved without mirroring.
    #[default]
    Left,
    /// Right hand, selector 1. Mirrored on X.
    Right,
}

impl Handedness {
    /// Both hands, in selector order.
    pub const ALL: [Self; 2] = [Self::Left, Self::Right];

    /// Raw selector value (0 = left, 1 = right).
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }

    /// Whether this hand is solved in X-mirrored space.
    #[must_use]
    pub const fn is_mirrored(self) -> bool {
        matches!(self, Self::Right)
    }

    /// The opposite hand.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

impl TryFrom<u8> for Handedness {
    type Error = HandTypesError;

    fn try_from(value: u8) -> HandTypesResult<Self> {
        match value {
            0 => Ok(Self::Left),
            1 => Ok(Self::Right),
            other => Err(HandTypesError::InvalidHandedness(other)),
        }
    }
}

impl std::fmt::Display for Handedness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}
