use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// 3D vector with f32 components.
/// C-compatible layout for FFI.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Float3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Float3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const UP: Self = Self::new(0.0, 1.0, 0.0);
    pub const RIGHT: Self = Self::new(1.0, 0.0, 0.0);
    pub const FORWARD: Self = Self::new(0.0, 0.0, 1.0);

    pub fn magnitude(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn normalize(self) -> Self {
        let mag = self.magnitude();
        if mag < f32::EPSILON {
            return Self::ZERO;
        }
        self * (1.0 / mag)
    }

    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Float3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Float3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Mul<f32> for Float3 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl Neg for Float3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Default for Float3 {
    fn default() -> Self {
        Self::ZERO
    }
}

/// Unit quaternion for 3D rotations.
/// C-compatible layout for FFI.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quaternion {
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub fn from_axis_angle(axis: Float3, angle: f32) -> Self {
        let half_angle = angle * 0.5;
        let s = half_angle.sin();
        let c = half_angle.cos();
        let normalized = axis.normalize();

        Self::new(normalized.x * s, normalized.y * s, normalized.z * s, c)
    }

    pub fn mul_vec(self, v: Float3) -> Float3 {
        let qv = Float3::new(self.x, self.y, self.z);
        let uv = qv.cross(v);
        let uuv = qv.cross(uv);
        v + (uv * (2.0 * self.w)) + (uuv * 2.0)
    }
}

/// 3x3 matrix stored as three column vectors.
/// Used for rotation transformations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Matrix3 {
    pub c0: Float3,
    pub c1: Float3,
    pub c2: Float3,
}

impl Matrix3 {
    pub const IDENTITY: Self = Self {
        c0: Float3::RIGHT,
        c1: Float3::UP,
        c2: Float3::FORWARD,
    };

    pub fn from_columns(c0: Float3, c1: Float3, c2: Float3) -> Self {
        Self { c0, c1, c2 }
    }

    pub fn multiply_vector(&self, v: Float3) -> Float3 {
        Float3::new(
            self.c0.x * v.x + self.c1.x * v.y + self.c2.x * v.z,
            self.c0.y * v.x + self.c1.y * v.y + self.c2.y * v.z,
            self.c0.z * v.x + self.c1.z * v.y + self.c2.z * v.z,
        )
    }
}

impl Default for Matrix3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Rigid transform: rotation followed by translation.
///
/// Expands to a 4x4 affine matrix whose upper-left 3x3 block is `rotation`
/// and whose last column is `translation`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transform {
    pub rotation: Matrix3,
    pub translation: Float3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        rotation: Matrix3::IDENTITY,
        translation: Float3::ZERO,
    };

    /// Builds a transform from a basis (columns map model X, Y, Z).
    pub fn from_basis(x_axis: Float3, y_axis: Float3, z_axis: Float3, translation: Float3) -> Self {
        Self {
            rotation: Matrix3::from_columns(x_axis, y_axis, z_axis),
            translation,
        }
    }

    /// Column-major 4x4 matrix, the layout GPU instance buffers expect.
    pub fn to_cols_array(&self) -> [f32; 16] {
        let r = &self.rotation;
        let t = self.translation;
        [
            r.c0.x, r.c0.y, r.c0.z, 0.0, //
            r.c1.x, r.c1.y, r.c1.z, 0.0, //
            r.c2.x, r.c2.y, r.c2.z, 0.0, //
            t.x, t.y, t.z, 1.0,
        ]
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
