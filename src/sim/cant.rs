//! Superelevation (cant): banking the track bed through a curve.
//!
//! Applied as a separate step on a copy of the swept frame, so the sweep
//! itself never sees the tilt and cant does not accumulate from one unit to
//! the next.

use serde::{Deserialize, Serialize};

use super::frame::Frame;
use super::math::Quaternion;

/// How a cant value (radians) maps to the bank rotation about the tangent.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CantModel {
    /// Bank by `sin(cant)` radians.
    #[default]
    Sine,
    /// Bank by exactly `cant` radians.
    Linear,
}

impl CantModel {
    pub fn bank_angle(self, cant: f32) -> f32 {
        match self {
            CantModel::Sine => cant.sin(),
            CantModel::Linear => cant,
        }
    }
}

/// Tilts the frame's normal about its tangent and re-derives the binormal.
///
/// `inward` is the side of the curve centre: `+1.0` when the centre lies
/// along `+binormal`, `-1.0` when it lies along `-binormal`. A positive cant
/// leans the normal toward the centre.
pub fn bank(frame: Frame, cant: f32, inward: f32, model: CantModel) -> Frame {
    let angle = model.bank_angle(cant);
    if angle == 0.0 {
        return frame;
    }

    let q = Quaternion::from_axis_angle(frame.tangent, -inward.signum() * angle);
    let normal = q.mul_vec(frame.normal).normalize();
    let binormal = normal.cross(frame.tangent).normalize();
    Frame::new(frame.position, frame.tangent, normal, binormal)
}
