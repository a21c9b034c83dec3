//! Viewer (camera/head) pose snapshot

use serde::{Deserialize, Serialize};

use crate::spatial::{Point3D, Transform, Vector3D};

/// Position and look direction of the viewer for one tick
///
/// Missing fields deserialize to the default pose's values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerPose {
    pub position: Point3D,
    /// Unit look direction. Zero when constructed from a zero vector.
    pub forward: Vector3D,
}

impl Default for ViewerPose {
    fn default() -> Self {
        Self {
            position: Point3D::ORIGIN,
            forward: Vector3D::FORWARD,
        }
    }
}

impl ViewerPose {
    /// Create a pose; `forward` is normalized.
    pub fn new(position: Point3D, forward: Vector3D) -> Self {
        Self {
            position,
            forward: forward.normalize(),
        }
    }

    /// Pose of a tracked head/camera transform
    pub fn from_transform(transform: &Transform) -> Self {
        Self::new(transform.position, transform.forward())
    }

    /// Point `distance` units ahead along the look direction
    pub fn gaze_point(&self, distance: f32) -> Point3D {
        self.position + self.forward * distance
    }

    /// Horizontal look direction, `None` when looking straight up or down.
    pub fn horizontal_forward(&self) -> Option<Vector3D> {
        self.forward.horizontal_direction()
    }

    /// Horizontal angle in degrees between the look direction and the
    /// direction to `target`.
    ///
    /// `None` when the look direction has no horizontal component. A target
    /// on the viewer's vertical axis yields 0.
    pub fn horizontal_angle_to(&self, target: Point3D) -> Option<f32> {
        let forward = self.horizontal_forward()?;
        Some(match (target - self.position).horizontal_direction() {
            Some(to_target) => forward.angle_degrees(&to_target),
            None => 0.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::Quaternion;
    use std::f32::consts::PI;

    #[test]
    fn test_gaze_point() {
        let pose = ViewerPose::new(Point3D::new(0.0, 1.5, 0.0), Vector3D::new(0.0, 0.0, 3.0));
        let point = pose.gaze_point(2.0);
        assert_eq!(point, Point3D::new(0.0, 1.5, 2.0));
    }

    #[test]
    fn test_from_transform() {
        let t = Transform::new(Point3D::ORIGIN, Quaternion::from_yaw(PI / 2.0));
        let pose = ViewerPose::from_transform(&t);
        assert!((pose.forward.x - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_horizontal_angle_ignores_height() {
        let pose = ViewerPose::new(Point3D::ORIGIN, Vector3D::new(0.0, -0.5, 1.0));
        let angle = pose.horizontal_angle_to(Point3D::new(2.0, 7.0, 2.0)).unwrap();
        assert!((angle - 45.0).abs() < 0.001);
    }

    #[test]
    fn test_horizontal_angle_looking_down() {
        let pose = ViewerPose::new(Point3D::ORIGIN, Vector3D::new(0.0, -1.0, 0.0));
        assert!(pose.horizontal_angle_to(Point3D::new(0.0, 0.0, 2.0)).is_none());
    }

    #[test]
    fn test_horizontal_angle_target_overhead() {
        let pose = ViewerPose::default();
        assert_eq!(pose.horizontal_angle_to(Point3D::new(0.0, 3.0, 0.0)), Some(0.0));
    }

    #[test]
    fn test_partial_pose_fills_defaults() {
        let pose: ViewerPose =
            serde_json::from_str(r#"{"position": {"x": 1.0, "y": 1.6, "z": 0.0}}"#).unwrap();
        assert_eq!(pose.position, Point3D::new(1.0, 1.6, 0.0));
        assert_eq!(pose.forward, Vector3D::FORWARD);

        let pose: ViewerPose =
            serde_json::from_str(r#"{"forward": {"x": 1.0, "y": 0.0, "z": 0.0}}"#).unwrap();
        assert_eq!(pose.position, Point3D::ORIGIN);
    }
}
