//! Math primitives for railway frame propagation.
//!
//! This module contains the vector/rotation types, the moving `Frame`, and
//! the isolated cant (banking) step.

mod cant;
mod consts;
mod frame;
mod math;

pub use cant::{bank, CantModel};
pub use consts::{signed_angle_about, ORTHONORMAL_TOLERANCE};
pub use frame::Frame;
pub use math::{Float3, Matrix3, Quaternion, Transform};
