//! Yaw-locked panel orientation

use std::time::Duration;

use crate::spatial::{Point3D, Quaternion};

/// Below this squared horizontal distance the panel keeps its rotation
const MIN_FACING_DISTANCE_SQ: f32 = 0.001;

/// Turn the panel about the vertical axis so its face points at the viewer.
///
/// The target rotation looks from the panel toward the viewer with the
/// height difference ignored. The panel turns a fraction
/// `clamp(speed * dt, 0, 1)` of the way per tick. If the viewer stands
/// (almost) directly above or below the panel the rotation is unchanged.
pub fn face_viewer(
    current: Quaternion,
    panel_position: Point3D,
    viewer_position: Point3D,
    speed: f32,
    dt: Duration,
) -> Quaternion {
    let to_viewer = (viewer_position - panel_position).horizontal();
    if to_viewer.magnitude_squared() <= MIN_FACING_DISTANCE_SQ {
        return current;
    }
    let Some(target) = Quaternion::yaw_look_rotation(to_viewer) else {
        return current;
    };

    let t = (speed * dt.as_secs_f32()).clamp(0.0, 1.0);
    current.slerp(&target, t)
}
