//! Finger identifiers.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of fingers on a hand, thumb included.
pub const FINGER_COUNT: usize = 5;

/// One of the five fingers, in anatomical order starting at the thumb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Finger {
    /// Thumb (finger 0).
    Thumb,
    /// Index finger (finger 1).
    Index,
    /// Middle finger (finger 2).
    Middle,
    /// Ring finger (finger 3).
    Ring,
    /// Little finger (finger 4).
    Little,
}

impl Finger {
    /// All fingers, thumb first.
    pub const ALL: [Self; FINGER_COUNT] = [
        Self::Thumb,
        Self::Index,
        Self::Middle,
        Self::Ring,
        Self::Little,
    ];

    /// The four fingers that are not the thumb.
    pub const NON_THUMB: [Self; 4] = [Self::Index, Self::Middle, Self::Ring, Self::Little];

    /// Position of this finger in [`Finger::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Finger at the given position, if any.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < FINGER_COUNT {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// Whether this is the thumb.
    #[must_use]
    pub const fn is_thumb(self) -> bool {
        matches!(self, Self::Thumb)
    }
}

impl std::fmt::Display for Finger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Thumb => "thumb",
            Self::Index => "index",
            Self::Middle => "middle",
            Self::Ring => "ring",
            Self::Little => "little",
        };
        f.write_str(name)
    }
}
