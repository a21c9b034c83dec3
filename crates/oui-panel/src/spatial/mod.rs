//! Spatial primitives for panel placement
//!
//! Uses the same axis convention as the AR host:
//! - X: Right (+) / Left (-)
//! - Y: Up (+) / Down (-)
//! - Z: Forward (+) / Backward (-)
//!
//! "Horizontal" always means the XZ plane; yaw is rotation about +Y.

mod point3d;
mod quaternion;
mod transform;
mod vector3d;

pub use point3d::Point3D;
pub use quaternion::Quaternion;
pub use transform::Transform;
pub use vector3d::Vector3D;

/// Squared length below which a direction is treated as degenerate.
pub const DEGENERATE_EPSILON: f32 = 1e-6;

/// Rotate `point` about the vertical axis passing through `pivot`.
pub fn rotate_around_vertical(point: Point3D, pivot: Point3D, yaw_degrees: f32) -> Point3D {
    let rotation = Quaternion::from_yaw(yaw_degrees.to_radians());
    pivot + rotation.rotate_vector(point - pivot)
}
