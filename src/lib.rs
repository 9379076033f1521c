//! railsweep - procedural railway layout by unit-step frame propagation.
//!
//! # Architecture
//!
//! Layered modules with strict inward-only dependencies:
//!
//! - **sim**: Math primitives (Float3, Quaternion, Transform, Frame, cant)
//! - **track**: Path description, layout document, propagation, built tracks
//! - **scene**: Published tracks with transactional reload
//! - **ffi**: C FFI bindings
//!
//! # Usage
//!
//! ```
//! use railsweep::{propagate, Frame, Path, Segment, Turn};
//!
//! let path = Path::new(vec![Segment::straight(3), Segment::curve(Turn::Left, 20, 5)]);
//! let (placements, end) = propagate(&path, Frame::CANONICAL).unwrap();
//! assert_eq!(placements.len(), 8);
//! assert!(end.position.x > 0.0);
//! ```
//!
//! For a native renderer, link the cdylib and use the `rail_*` FFI functions.

pub mod scene;
pub mod sim;
pub mod track;

#[cfg(feature = "ffi")]
pub mod ffi;

// Re-export commonly used types at crate root
pub use scene::{RailwayScene, SceneSnapshot};
pub use sim::{CantModel, Float3, Frame, Transform};
pub use track::{
    propagate, propagate_with, LayoutDocument, Path, Placement, Segment, SweepConfig, Track,
    TrackError, Turn,
};
