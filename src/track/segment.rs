use serde::{Deserialize, Serialize};

use super::error::{SegmentFault, TrackError};

/// Which way a curve bends, seen along the direction of travel.
///
/// `Left` bends toward `+binormal`, `Right` toward `-binormal`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Turn {
    Left,
    Right,
}

impl Turn {
    /// `+1` for left, `-1` for right; multiplies the radius magnitude.
    pub fn sign(self) -> f32 {
        match self {
            Turn::Left => 1.0,
            Turn::Right => -1.0,
        }
    }

    pub fn mirrored(self) -> Self {
        match self {
            Turn::Left => Turn::Right,
            Turn::Right => Turn::Left,
        }
    }
}

/// One track-layout command.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum Segment {
    /// Advance `length` unit steps along the current tangent.
    Straight { length: u32 },
    /// Constant-curvature arc of `length` unit steps.
    Curve {
        turn: Turn,
        /// Only the magnitude is used; the sign of the bend comes from `turn`.
        radius: i32,
        length: u32,
        /// Superelevation in radians.
        cant: f32,
        /// Reserved step-size multiplier; carried through but not applied.
        scale: f32,
    },
}

impl Segment {
    pub const fn straight(length: u32) -> Self {
        Segment::Straight { length }
    }

    pub const fn curve(turn: Turn, radius: i32, length: u32) -> Self {
        Segment::Curve {
            turn,
            radius,
            length,
            cant: 0.0,
            scale: 1.0,
        }
    }

    pub fn with_cant(self, cant: f32) -> Self {
        match self {
            Segment::Curve {
                turn,
                radius,
                length,
                scale,
                ..
            } => Segment::Curve {
                turn,
                radius,
                length,
                cant,
                scale,
            },
            other => other,
        }
    }

    pub fn length(&self) -> u32 {
        match *self {
            Segment::Straight { length } | Segment::Curve { length, .. } => length,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Segment::Straight { .. } => "Straight",
            Segment::Curve { .. } => "Curve",
        }
    }

    pub fn check(&self) -> Result<(), SegmentFault> {
        match *self {
            Segment::Straight { .. } => Ok(()),
            Segment::Curve {
                radius,
                cant,
                scale,
                ..
            } => {
                if radius == 0 {
                    return Err(SegmentFault::ZeroRadius);
                }
                if !cant.is_finite() {
                    return Err(SegmentFault::NonFiniteCant(cant));
                }
                if !scale.is_finite() {
                    return Err(SegmentFault::NonFiniteScale(scale));
                }
                Ok(())
            }
        }
    }
}

/// Ordered list of segments; each starts where the previous one ended.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of placements a propagation pass will emit.
    pub fn total_length(&self) -> usize {
        self.segments.iter().map(|s| s.length() as usize).sum()
    }

    /// Rejects the first out-of-domain segment.
    pub fn validate(&self) -> Result<(), TrackError> {
        for (index, segment) in self.segments.iter().enumerate() {
            segment
                .check()
                .map_err(|reason| TrackError::InvalidSegment {
                    path: None,
                    index,
                    reason,
                })?;
        }
        Ok(())
    }
}

impl From<Vec<Segment>> for Path {
    fn from(segments: Vec<Segment>) -> Self {
        Self::new(segments)
    }
}

impl FromIterator<Segment> for Path {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}
