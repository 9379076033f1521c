use std::ops::Range;

use serde::Serialize;

use crate::sim::{Float3, Frame};

use super::config::SweepConfig;
use super::error::TrackError;
use super::placement::Placement;
use super::propagate::propagate_with;
use super::segment::{Path, Segment};

/// Span of placements produced by one segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackSection {
    pub segment_index: usize,
    pub kind: &'static str,
    /// Indices into `Track::placements`.
    pub placements: Range<usize>,
    /// Heading change across the section in radians, positive toward `+binormal`.
    pub turn_angle: f32,
}

impl TrackSection {
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}

/// Result of one propagation pass: placements, their positions, and the
/// frames at either end.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    placements: Vec<Placement>,
    positions: Vec<Float3>,
    sections: Vec<TrackSection>,
    start: Frame,
    end: Frame,
}

impl Track {
    /// Propagates `path` from `start` and packages the output.
    pub fn build(path: &Path, start: Frame, config: &SweepConfig) -> Result<Self, TrackError> {
        let (placements, end) = propagate_with(path, start, config)?;
        let positions = placements.iter().map(|p| p.position).collect();
        Ok(Self {
            placements,
            positions,
            sections: sections_of(path),
            start: start.reorthonormalize(),
            end,
        })
    }

    /// Builds from the canonical frame, as a fresh load does.
    pub fn from_canonical(path: &Path, config: &SweepConfig) -> Result<Self, TrackError> {
        Self::build(path, Frame::CANONICAL, config)
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Position-only projection of the placements, in the same order.
    pub fn positions(&self) -> &[Float3] {
        &self.positions
    }

    pub fn sections(&self) -> &[TrackSection] {
        &self.sections
    }

    pub fn start_frame(&self) -> Frame {
        self.start
    }

    pub fn end_frame(&self) -> Frame {
        self.end
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Arc length covered, one unit per placement.
    pub fn arc_length(&self) -> f32 {
        self.placements.len() as f32
    }
}

fn sections_of(path: &Path) -> Vec<TrackSection> {
    let mut offset = 0usize;
    path.iter()
        .enumerate()
        .map(|(segment_index, segment)| {
            let len = segment.length() as usize;
            let turn_angle = match *segment {
                Segment::Straight { .. } => 0.0,
                Segment::Curve {
                    turn,
                    radius,
                    length,
                    ..
                } => turn.sign() * length as f32 / radius.unsigned_abs() as f32,
            };
            let section = TrackSection {
                segment_index,
                kind: segment.kind(),
                placements: offset..offset + len,
                turn_angle,
            };
            offset += len;
            section
        })
        .collect()
}
