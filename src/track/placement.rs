use serde::Serialize;

use crate::sim::{Float3, Frame, Transform};

/// One instance of track-section geometry.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub transform: Transform,
    pub position: Float3,
}

impl Placement {
    pub fn from_frame(frame: &Frame) -> Self {
        Self {
            transform: frame.transform(),
            position: frame.position,
        }
    }

    /// Orientation axes as a frame: `(B, N, T)` are the rotation columns.
    pub fn frame(&self) -> Frame {
        let r = &self.transform.rotation;
        Frame::new(self.position, r.c2, r.c1, r.c0)
    }
}

/// C-compatible placement: column-major 4x4 matrix plus position.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RawPlacement {
    pub matrix: [f32; 16],
    pub position: Float3,
}

impl From<&Placement> for RawPlacement {
    fn from(p: &Placement) -> Self {
        Self {
            matrix: p.transform.to_cols_array(),
            position: p.position,
        }
    }
}
