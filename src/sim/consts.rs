use super::math::Float3;

/// Maximum deviation from unit length / orthogonality allowed for an emitted basis.
pub const ORTHONORMAL_TOLERANCE: f32 = 1e-5;

/// Signed angle from `from` to `to`, positive by the right-hand rule about `axis`.
///
/// Both vectors are projected onto the plane perpendicular to `axis` first,
/// so the result is the sweep a rotation about `axis` would need.
pub fn signed_angle_about(from: Float3, to: Float3, axis: Float3) -> f32 {
    let axis = axis.normalize();
    let a = from - axis * axis.dot(from);
    let b = to - axis * axis.dot(to);
    let sin = axis.dot(a.cross(b));
    let cos = a.dot(b);
    sin.atan2(cos)
}
