//! 3D point representation

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use super::Vector3D;

/// A point in world space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3D {
    /// Origin point (0, 0, 0)
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    /// Create a new point
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point3D) -> f32 {
        (*self - *other).magnitude()
    }

    /// Linear interpolation: `self + (other - self) * t`.
    ///
    /// `t` is not clamped; values above 1 extrapolate past `other`.
    pub fn lerp(&self, other: &Point3D, t: f32) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }

    /// Copy of this point at a different height.
    pub fn with_y(&self, y: f32) -> Self {
        Self { y, ..*self }
    }

    /// Mean of a set of points, `None` for an empty set.
    pub fn centroid<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3D>,
    {
        let mut count = 0usize;
        let mut sum = Vector3D::ZERO;
        for p in points {
            sum = sum + Vector3D::new(p.x, p.y, p.z);
            count += 1;
        }
        if count == 0 {
            return None;
        }
        let mean = sum * (1.0 / count as f32);
        Some(Self::new(mean.x, mean.y, mean.z))
    }

    /// True when every coordinate is finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add<Vector3D> for Point3D {
    type Output = Point3D;

    fn add(self, rhs: Vector3D) -> Self::Output {
        Point3D::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3D {
    type Output = Vector3D;

    fn sub(self, rhs: Self) -> Self::Output {
        Vector3D::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}
