//! Transition table and pose controller

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{GuiMovementState, MovementConfig};
use crate::spatial::{rotate_around_vertical, Point3D};
use crate::viewer::ViewerPose;

/// Which way HorizontalSway orbits the panel around the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwayDirection {
    /// Negative yaw (counter-clockwise seen from above)
    Left,
    /// Positive yaw; also used when no anchor centroid is available
    #[default]
    Right,
}

impl SwayDirection {
    /// Yaw multiplier: -1 for left, +1 for right
    pub fn sign(&self) -> f32 {
        match self {
            SwayDirection::Left => -1.0,
            SwayDirection::Right => 1.0,
        }
    }
}

/// Direction that moves the panel away from the anchor centroid.
///
/// Both the viewer→panel and viewer→centroid directions are flattened to the
/// horizontal plane; a positive vertical cross product means the anchors sit
/// to the right of the panel, so the panel swings left.
pub fn sway_direction(
    viewer_position: Point3D,
    panel_position: Point3D,
    anchor_centroid: Option<Point3D>,
) -> SwayDirection {
    let Some(centroid) = anchor_centroid else {
        return SwayDirection::default();
    };
    let to_panel = (panel_position - viewer_position).horizontal_direction();
    let to_anchors = (centroid - viewer_position).horizontal_direction();

    match (to_panel, to_anchors) {
        (Some(panel), Some(anchors)) if panel.cross(&anchors).y > 0.0 => SwayDirection::Left,
        _ => SwayDirection::Right,
    }
}

/// Per-tick snapshot handed to [`GuiMovementMachine::advance`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementInput {
    /// Time since the previous tick
    pub dt: Duration,
    pub viewer: ViewerPose,
    /// Current panel position
    pub panel_position: Point3D,
    /// Size of the main obstruction set
    pub main_count: usize,
    /// Size of the side obstruction set
    pub side_count: usize,
    /// Mean position of all registered anchors
    pub anchor_centroid: Option<Point3D>,
    pub follow_speed: f32,
}

/// Panel movement state machine
#[derive(Debug, Clone)]
pub struct GuiMovementMachine {
    config: MovementConfig,
    state: GuiMovementState,
    /// Consecutive Stable ticks without side obstruction
    quiet_ticks: u32,
    last_angle: Option<f32>,
}

impl Default for GuiMovementMachine {
    fn default() -> Self {
        Self::new(MovementConfig::default())
    }
}

impl GuiMovementMachine {
    /// Create a machine in the Centered state
    pub fn new(config: MovementConfig) -> Self {
        Self {
            config,
            state: GuiMovementState::Centered,
            quiet_ticks: 0,
            last_angle: None,
        }
    }

    /// Start from an arbitrary state
    pub fn with_state(mut self, state: GuiMovementState) -> Self {
        self.state = state;
        self
    }

    /// Current movement state
    pub fn state(&self) -> GuiMovementState {
        self.state
    }

    /// Thresholds in use
    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    /// Angle computed by the most recent non-degenerate [`advance`](Self::advance)
    pub fn last_angle(&self) -> Option<f32> {
        self.last_angle
    }

    /// Consecutive quiet ticks counted toward the Stable debounce
    pub fn quiet_ticks(&self) -> u32 {
        self.quiet_ticks
    }

    /// Back to Centered with no debounce progress
    pub fn reset(&mut self) {
        self.state = GuiMovementState::Centered;
        self.quiet_ticks = 0;
        self.last_angle = None;
    }

    /// Evaluate one transition. Conditions are checked in table order and
    /// the first match wins.
    pub fn transition(
        &mut self,
        angle: f32,
        main_count: usize,
        side_count: usize,
    ) -> GuiMovementState {
        use GuiMovementState::*;

        let MovementConfig {
            max_sway_angle,
            max_angle,
            recover_angle,
            centered_main_trigger,
            ..
        } = self.config;

        let next = match self.state {
            Centered if main_count > centered_main_trigger => HorizontalSway,
            Centered => Centered,

            HorizontalSway if main_count == 0 => Stable,
            HorizontalSway if angle > max_sway_angle => VerticalSway,
            HorizontalSway => HorizontalSway,

            VerticalSway if main_count == 0 => Stable,
            VerticalSway if angle > max_angle => AdjustToView,
            VerticalSway => VerticalSway,

            Stable if angle > max_angle => AdjustToView,
            Stable if main_count > 0 => HorizontalSway,
            Stable => self.settle_stable(side_count),

            AdjustToView if angle < recover_angle => Centered,
            AdjustToView => AdjustToView,
        };

        if next != self.state {
            debug!(
                from = %self.state,
                to = %next,
                angle,
                main_count,
                side_count,
                "panel movement transition"
            );
            self.state = next;
            self.quiet_ticks = 0;
        }
        next
    }

    fn settle_stable(&mut self, side_count: usize) -> GuiMovementState {
        let Some(limit) = self.config.stable_debounce_ticks else {
            return GuiMovementState::Stable;
        };
        if side_count > 0 {
            self.quiet_ticks = 0;
            return GuiMovementState::Stable;
        }
        self.quiet_ticks = self.quiet_ticks.saturating_add(1);
        if self.quiet_ticks >= limit {
            GuiMovementState::Centered
        } else {
            GuiMovementState::Stable
        }
    }

    /// Target position for the current state, before interpolation
    pub fn desired_position(
        &self,
        viewer: &ViewerPose,
        panel_position: Point3D,
        anchor_centroid: Option<Point3D>,
    ) -> Point3D {
        let cfg = &self.config;
        match self.state {
            GuiMovementState::Centered | GuiMovementState::AdjustToView => {
                viewer.gaze_point(cfg.standoff_distance)
            }
            GuiMovementState::HorizontalSway => {
                let direction = sway_direction(viewer.position, panel_position, anchor_centroid);
                rotate_around_vertical(
                    panel_position,
                    viewer.position,
                    cfg.sway_step_degrees * direction.sign(),
                )
            }
            GuiMovementState::VerticalSway => {
                panel_position.with_y(viewer.position.y + cfg.vertical_offset)
            }
            GuiMovementState::Stable => panel_position,
        }
    }

    /// Interpolation factor for one tick
    pub fn follow_factor(&self, follow_speed: f32, dt: Duration) -> f32 {
        let factor = follow_speed * dt.as_secs_f32();
        if self.config.clamp_follow_factor {
            factor.clamp(0.0, 1.0)
        } else {
            factor
        }
    }

    /// Run one tick: transition, then move the panel toward the desired
    /// position. Returns the new panel position.
    ///
    /// When the viewer looks straight up or down the angle is undefined; the
    /// state is left alone and the panel holds its position.
    pub fn advance(&mut self, input: &MovementInput) -> Point3D {
        let Some(angle) = input.viewer.horizontal_angle_to(input.panel_position) else {
            trace!(state = %self.state, "degenerate view direction, holding panel");
            return input.panel_position;
        };
        self.last_angle = Some(angle);

        self.transition(angle, input.main_count, input.side_count);

        let desired =
            self.desired_position(&input.viewer, input.panel_position, input.anchor_centroid);
        let factor = self.follow_factor(input.follow_speed, input.dt);
        let next = input.panel_position.lerp(&desired, factor);

        trace!(state = %self.state, angle, factor, ?next, "panel advanced");
        next
    }
}
