//! The 21-point hand keypoint schema.
//!
//! Keypoints are ordered wrist first, then each finger from the joint nearest
//! the wrist out to the tip:
//!
//! ```text
//!  0  wrist
//!  1- 4  thumb   CMC, MCP, IP,  tip
//!  5- 8  index   MCP, PIP, DIP, tip
//!  9-12  middle  MCP, PIP, DIP, tip
//! 13-16  ring    MCP, PIP, DIP, tip
//! 17-20  little  MCP, PIP, DIP, tip
//! ```

use std::ops::{Index, IndexMut};

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Finger, HandJoint, HandTypesError, HandTypesResult};

/// Number of keypoints in the schema.
pub const KEYPOINT_COUNT: usize = 21;

/// Number of keypoints per finger.
pub const KEYPOINTS_PER_FINGER: usize = 4;

/// One anatomical landmark of the 21-point schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[allow(missing_docs)]
pub enum Keypoint {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    LittleMcp,
    LittlePip,
    LittleDip,
    LittleTip,
}

impl Keypoint {
    /// All keypoints in schema order.
    pub const ALL: [Self; KEYPOINT_COUNT] = [
        Self::Wrist,
        Self::ThumbCmc,
        Self::ThumbMcp,
        Self::ThumbIp,
        Self::ThumbTip,
        Self::IndexMcp,
        Self::IndexPip,
        Self::IndexDip,
        Self::IndexTip,
        Self::MiddleMcp,
        Self::MiddlePip,
        Self::MiddleDip,
        Self::MiddleTip,
        Self::RingMcp,
        Self::RingPip,
        Self::RingDip,
        Self::RingTip,
        Self::LittleMcp,
        Self::LittlePip,
        Self::LittleDip,
        Self::LittleTip,
    ];

    /// Position of this keypoint in the schema.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Keypoint at the given schema position.
    ///
    /// # Errors
    ///
    /// Returns [`HandTypesError::KeypointOutOfRange`] for indices past 20.
    pub const fn from_index(index: usize) -> HandTypesResult<Self> {
        if index < KEYPOINT_COUNT {
            Ok(Self::ALL[index])
        } else {
            Err(HandTypesError::KeypointOutOfRange {
                index,
                count: KEYPOINT_COUNT,
            })
        }
    }

    /// The `joint`-th keypoint of `finger`, counted from the wrist end (0..4).
    #[must_use]
    pub const fn of_finger(finger: Finger, joint: usize) -> Option<Self> {
        if joint < KEYPOINTS_PER_FINGER {
            Some(Self::ALL[1 + finger.index() * KEYPOINTS_PER_FINGER + joint])
        } else {
            None
        }
    }

    /// Finger this keypoint belongs to, `None` for the wrist.
    #[must_use]
    pub const fn finger(self) -> Option<Finger> {
        match self {
            Self::Wrist => None,
            other => Finger::from_index((other.index() - 1) / KEYPOINTS_PER_FINGER),
        }
    }

    /// The output joint located at this keypoint.
    #[must_use]
    pub const fn joint(self) -> HandJoint {
        match self {
            Self::Wrist => HandJoint::Wrist,
            Self::ThumbCmc => HandJoint::ThumbMetacarpal,
            Self::ThumbMcp => HandJoint::ThumbProximal,
            Self::ThumbIp => HandJoint::ThumbDistal,
            Self::ThumbTip => HandJoint::ThumbTip,
            Self::IndexMcp => HandJoint::IndexProximal,
            Self::IndexPip => HandJoint::IndexIntermediate,
            Self::IndexDip => HandJoint::IndexDistal,
            Self::IndexTip => HandJoint::IndexTip,
            Self::MiddleMcp => HandJoint::MiddleProximal,
            Self::MiddlePip => HandJoint::MiddleIntermediate,
            Self::MiddleDip => HandJoint::MiddleDistal,
            Self::MiddleTip => HandJoint::MiddleTip,
            Self::RingMcp => HandJoint::RingProximal,
            Self::RingPip => HandJoint::RingIntermediate,
            Self::RingDip => HandJoint::RingDistal,
            Self::RingTip => HandJoint::RingTip,
            Self::LittleMcp => HandJoint::LittleProximal,
            Self::LittlePip => HandJoint::LittleIntermediate,
            Self::LittleDip => HandJoint::LittleDistal,
            Self::LittleTip => HandJoint::LittleTip,
        }
    }
}

/// One frame of keypoint estimates for a single hand.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HandKeypoints {
    /// Points in schema order.
    pub points: [Point3<f64>; KEYPOINT_COUNT],
}

impl Default for HandKeypoints {
    fn default() -> Self {
        Self {
            points: [Point3::origin(); KEYPOINT_COUNT],
        }
    }
}

impl HandKeypoints {
    /// Wrap an array of points in schema order.
    #[must_use]
    pub const fn new(points: [Point3<f64>; KEYPOINT_COUNT]) -> Self {
        Self { points }
    }

    /// Build from raw `[x, y, z]` triples in schema order.
    #[must_use]
    pub fn from_arrays(raw: &[[f64; 3]; KEYPOINT_COUNT]) -> Self {
        let mut keypoints = Self::default();
        for (point, [x, y, z]) in keypoints.points.iter_mut().zip(raw) {
            *point = Point3::new(*x, *y, *z);
        }
        keypoints
    }

    /// Copy with every X coordinate negated.
    #[must_use]
    pub fn mirrored_x(&self) -> Self {
        let mut mirrored = *self;
        for point in &mut mirrored.points {
            point.x = -point.x;
        }
        mirrored
    }

    /// Iterate over `(keypoint, position)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (Keypoint, &Point3<f64>)> {
        Keypoint::ALL.into_iter().zip(self.points.iter())
    }

    /// Whether every coordinate is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.points
            .iter()
            .all(|p| p.coords.iter().all(|c| c.is_finite()))
    }
}

impl Index<Keypoint> for HandKeypoints {
    type Output = Point3<f64>;

    fn index(&self, keypoint: Keypoint) -> &Self::Output {
        &self.points[keypoint.index()]
    }
}

impl IndexMut<Keypoint> for HandKeypoints {
    fn index_mut(&mut self, keypoint: Keypoint) -> &mut Self::Output {
        &mut self.points[keypoint.index()]
    }
}
