//! 3D vector for directions and offsets

use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

use super::DEGENERATE_EPSILON;

/// A vector in 3D space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3D {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };
    /// Unit vector pointing up (+Y)
    pub const UP: Self = Self { x: 0.0, y: 1.0, z: 0.0 };
    /// Unit vector pointing forward (+Z)
    pub const FORWARD: Self = Self { x: 0.0, y: 0.0, z: 1.0 };

    /// Create a new 3D vector
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Calculate the magnitude (length) of the vector
    pub fn magnitude(&self) -> f32 {
        self.magnitude_squared().sqrt()
    }

    /// Calculate the squared magnitude (avoids the sqrt)
    pub fn magnitude_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Unit-length copy, or `None` when the vector is (nearly) zero.
    pub fn try_normalize(&self) -> Option<Self> {
        let mag_sq = self.magnitude_squared();
        if mag_sq > DEGENERATE_EPSILON && mag_sq.is_finite() {
            let mag = mag_sq.sqrt();
            Some(Self::new(self.x / mag, self.y / mag, self.z / mag))
        } else {
            None
        }
    }

    /// Unit-length copy; degenerate vectors collapse to zero.
    pub fn normalize(&self) -> Self {
        self.try_normalize().unwrap_or(Self::ZERO)
    }

    /// Projection onto the horizontal (XZ) plane.
    pub fn horizontal(&self) -> Self {
        Self::new(self.x, 0.0, self.z)
    }

    /// Horizontal projection normalized, `None` when it has no length
    /// (the vector points straight up or down).
    pub fn horizontal_direction(&self) -> Option<Self> {
        self.horizontal().try_normalize()
    }

    /// Calculate the dot product with another vector
    pub fn dot(&self, other: &Vector3D) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Calculate the cross product with another vector
    pub fn cross(&self, other: &Vector3D) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Angle to `other` in degrees, in `[0, 180]`.
    ///
    /// Returns 0 when either vector is degenerate.
    pub fn angle_degrees(&self, other: &Vector3D) -> f32 {
        match (self.try_normalize(), other.try_normalize()) {
            (Some(a), Some(b)) => a.dot(&b).clamp(-1.0, 1.0).acos().to_degrees(),
            _ => 0.0,
        }
    }
}

impl Add for Vector3D {
    type Output = Vector3D;

    fn add(self, rhs: Self) -> Self::Output {
        Vector3D::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3D {
    type Output = Vector3D;

    fn sub(self, rhs: Self) -> Self::Output {
        Vector3D::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vector3D {
    type Output = Vector3D;

    fn mul(self, rhs: f32) -> Self::Output {
        Vector3D::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vector3D {
    type Output = Vector3D;

    fn neg(self) -> Self::Output {
        Vector3D::new(-self.x, -self.y, -self.z)
    }
}
