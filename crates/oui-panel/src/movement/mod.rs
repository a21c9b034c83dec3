//! Obstruction-aware panel movement
//!
//! A five-state controller decides each tick whether the floating panel
//! stays centered, sways sideways or upward to dodge anchors that block the
//! view, holds still, or snaps back in front of the viewer. The only inputs
//! are the horizontal angle between the look direction and the panel and the
//! sizes of the main/side obstruction sets.

mod machine;
mod state;

pub use machine::{sway_direction, GuiMovementMachine, MovementInput, SwayDirection};
pub use state::GuiMovementState;

/// Tuning for [`GuiMovementMachine`]
#[derive(Debug, Clone, PartialEq)]
pub struct MovementConfig {
    /// Distance ahead of the viewer for the centered panel
    pub standoff_distance: f32,
    /// HorizontalSway escalates to VerticalSway above this angle (degrees)
    pub max_sway_angle: f32,
    /// VerticalSway and Stable escalate to AdjustToView above this angle
    pub max_angle: f32,
    /// AdjustToView settles back to Centered below this angle
    pub recover_angle: f32,
    /// Yaw applied per tick while in HorizontalSway (degrees)
    pub sway_step_degrees: f32,
    /// Height above the viewer for VerticalSway
    pub vertical_offset: f32,
    /// Default interpolation rate, per second
    pub follow_speed: f32,
    /// Clamp `follow_speed * dt` to `[0, 1]`; when false, large ticks overshoot
    pub clamp_follow_factor: bool,
    /// Centered starts swaying once main obstructions exceed this count
    pub centered_main_trigger: usize,
    /// Debounce for leaving Stable. With `Some(n)`, Stable returns to
    /// Centered on the n-th consecutive Stable tick that sees no side
    /// obstruction, so `Some(1)` leaves on the first such tick. A tick with
    /// a side obstruction resets the count to zero, as does any state
    /// change. Ticks skipped for a degenerate view are not counted. `None`
    /// keeps Stable indefinitely.
    pub stable_debounce_ticks: Option<u32>,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            standoff_distance: 2.0,
            max_sway_angle: 45.0,
            max_angle: 60.0,
            recover_angle: 5.0,
            sway_step_degrees: 10.0,
            vertical_offset: 1.0,
            follow_speed: 2.0,
            clamp_follow_factor: true,
            centered_main_trigger: 1,
            stable_debounce_ticks: None,
        }
    }
}
