//! Railway layout: path description, frame propagation, and the built track.
//!
//! This module provides the pipeline from a parsed layout document to an
//! ordered list of placements for instancing track-section geometry.

mod config;
mod document;
mod error;
mod placement;
mod propagate;
mod result;
mod sample;
mod segment;

pub use config::SweepConfig;
pub use document::LayoutDocument;
pub use error::{SegmentFault, TrackError};
pub use placement::{Placement, RawPlacement};
pub use propagate::{propagate, propagate_with};
pub use result::{Track, TrackSection};
pub use sample::MAX_SAMPLES;
pub use segment::{Path, Segment, Turn};
