use serde::{Deserialize, Serialize};

use super::consts::ORTHONORMAL_TOLERANCE;
use super::math::{Float3, Quaternion, Transform};

/// Moving reference frame along the railway.
///
/// Right-handed triad of unit vectors at `position`:
/// - `tangent` (T): forward along the track
/// - `normal` (N): up, perpendicular to the track bed
/// - `binormal` (B): `N x T`, pointing to the left of travel
///
/// Emitted placements use `(B, N, T)` as the model's `(X, Y, Z)` axes, so
/// the canonical frame maps to the identity rotation.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub position: Float3,
    pub tangent: Float3,
    pub normal: Float3,
    pub binormal: Float3,
}

impl Frame {
    pub const fn new(position: Float3, tangent: Float3, normal: Float3, binormal: Float3) -> Self {
        Self {
            position,
            tangent,
            normal,
            binormal,
        }
    }

    /// Origin, tangent +Z, normal +Y, binormal +X.
    pub const CANONICAL: Self = Self::new(Float3::ZERO, Float3::FORWARD, Float3::UP, Float3::RIGHT);

    /// Re-orthonormalizes the frame using the Gram-Schmidt process.
    ///
    /// Preserves the tangent direction exactly, orthogonalizes the normal
    /// against it, then recomputes the binormal as `normal x tangent`.
    /// This corrects accumulated floating-point drift in frame vectors.
    pub fn reorthonormalize(self) -> Self {
        let tangent = self.tangent.normalize();
        let normal = (self.normal - tangent * tangent.dot(self.normal)).normalize();
        let binormal = normal.cross(tangent).normalize();
        Self::new(self.position, tangent, normal, binormal)
    }

    /// Rotates the triad around an arbitrary axis; the position is untouched.
    ///
    /// # Arguments
    /// * `axis` - Rotation axis (will be normalized)
    /// * `angle` - Rotation angle in radians
    pub fn rotate_around(self, axis: Float3, angle: f32) -> Self {
        let q = Quaternion::from_axis_angle(axis, angle);
        Self {
            position: self.position,
            tangent: q.mul_vec(self.tangent).normalize(),
            normal: q.mul_vec(self.normal).normalize(),
            binormal: q.mul_vec(self.binormal).normalize(),
        }
    }

    pub fn with_position(self, position: Float3) -> Self {
        Self { position, ..self }
    }

    /// True when every axis is unit length and all pairs are orthogonal within `tolerance`.
    pub fn is_orthonormal(&self, tolerance: f32) -> bool {
        let unit = |v: Float3| (v.magnitude() - 1.0).abs() <= tolerance;
        unit(self.tangent)
            && unit(self.normal)
            && unit(self.binormal)
            && self.tangent.dot(self.normal).abs() <= tolerance
            && self.tangent.dot(self.binormal).abs() <= tolerance
            && self.normal.dot(self.binormal).abs() <= tolerance
    }

    pub fn is_valid(&self) -> bool {
        self.position.is_finite()
            && self.tangent.is_finite()
            && self.normal.is_finite()
            && self.binormal.is_finite()
            && self.is_orthonormal(ORTHONORMAL_TOLERANCE)
    }

    /// Rigid transform placing a model at this frame: `(B, N, T)` plus position.
    pub fn transform(&self) -> Transform {
        Transform::from_basis(self.binormal, self.normal, self.tangent, self.position)
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::CANONICAL
    }
}
