//! Quaternion rotations, restricted to what panel placement needs

use serde::{Deserialize, Serialize};

use super::Vector3D;

/// A unit quaternion representing a 3D rotation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quaternion {
    /// Identity quaternion (no rotation)
    pub const IDENTITY: Self = Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    /// Create a new quaternion
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `angle_radians` about `axis`
    pub fn from_axis_angle(axis: Vector3D, angle_radians: f32) -> Self {
        let half_angle = angle_radians / 2.0;
        let sin_half = half_angle.sin();
        let axis = axis.normalize();

        Self {
            x: axis.x * sin_half,
            y: axis.y * sin_half,
            z: axis.z * sin_half,
            w: half_angle.cos(),
        }
    }

    /// Yaw about +Y; positive yaw turns +Z toward +X.
    pub fn from_yaw(yaw_radians: f32) -> Self {
        Self::from_axis_angle(Vector3D::UP, yaw_radians)
    }

    /// Yaw-only rotation whose forward (+Z) axis points along the horizontal
    /// projection of `direction`. `None` if that projection is degenerate.
    pub fn yaw_look_rotation(direction: Vector3D) -> Option<Self> {
        let flat = direction.horizontal_direction()?;
        Some(Self::from_yaw(flat.x.atan2(flat.z)))
    }

    /// Calculate the magnitude of the quaternion
    pub fn magnitude(&self) -> f32 {
        self.dot(self).sqrt()
    }

    fn dot(&self, other: &Quaternion) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Normalize to a unit quaternion
    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag > 0.0 {
            Self::new(self.x / mag, self.y / mag, self.z / mag, self.w / mag)
        } else {
            Self::IDENTITY
        }
    }

    /// Rotate a vector by this quaternion
    pub fn rotate_vector(&self, v: Vector3D) -> Vector3D {
        let q_vec = Vector3D::new(self.x, self.y, self.z);
        let uv = q_vec.cross(&v);
        let uuv = q_vec.cross(&uv);
        v + (uv * self.w + uuv) * 2.0
    }

    /// Direction of the local +Z axis after rotation
    pub fn forward(&self) -> Vector3D {
        self.rotate_vector(Vector3D::FORWARD)
    }

    /// Spherical linear interpolation along the shorter arc
    pub fn slerp(&self, other: &Quaternion, t: f32) -> Self {
        let dot = self.dot(other);
        let (other, dot) = if dot < 0.0 {
            (Quaternion::new(-other.x, -other.y, -other.z, -other.w), -dot)
        } else {
            (*other, dot)
        };

        // Nearly parallel: nlerp avoids dividing by sin(~0)
        if dot > 0.9995 {
            return Quaternion::new(
                self.x + t * (other.x - self.x),
                self.y + t * (other.y - self.y),
                self.z + t * (other.z - self.z),
                self.w + t * (other.w - self.w),
            )
            .normalize();
        }

        let theta_0 = dot.acos();
        let theta = theta_0 * t;
        let sin_theta_0 = theta_0.sin();
        let s0 = (theta_0 - theta).sin() / sin_theta_0;
        let s1 = theta.sin() / sin_theta_0;

        Quaternion::new(
            s0 * self.x + s1 * other.x,
            s0 * self.y + s1 * other.y,
            s0 * self.z + s1 * other.z,
            s0 * self.w + s1 * other.w,
        )
    }

    /// Heading of the forward axis in degrees, `(-180, 180]`.
    pub fn yaw_degrees(&self) -> f32 {
        let f = self.forward();
        f.x.atan2(f.z).to_degrees()
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}
