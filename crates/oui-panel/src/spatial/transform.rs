//! Rigid transform (position + rotation)

use serde::{Deserialize, Serialize};

use super::{Point3D, Quaternion, Vector3D};

/// Position and orientation of an object in world space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Transform {
    pub position: Point3D,
    pub rotation: Quaternion,
}

impl Transform {
    /// Create a transform from a position and rotation
    pub fn new(position: Point3D, rotation: Quaternion) -> Self {
        Self { position, rotation }
    }

    /// Forward (+Z) direction of this transform
    pub fn forward(&self) -> Vector3D {
        self.rotation.forward()
    }
}
