//! Discrete panel movement modes

use std::fmt;

use serde::{Deserialize, Serialize};

/// Placement mode of the floating panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuiMovementState {
    /// Held at the standoff distance straight ahead of the viewer
    #[default]
    Centered,
    /// Orbiting the viewer sideways, away from the anchor cluster
    HorizontalSway,
    /// Lifted above the viewer's eye line
    VerticalSway,
    /// Holding its current position
    Stable,
    /// Returning to the viewer's forward view after drifting too far
    AdjustToView,
}

impl GuiMovementState {
    pub const ALL: [GuiMovementState; 5] = [
        GuiMovementState::Centered,
        GuiMovementState::HorizontalSway,
        GuiMovementState::VerticalSway,
        GuiMovementState::Stable,
        GuiMovementState::AdjustToView,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            GuiMovementState::Centered => "centered",
            GuiMovementState::HorizontalSway => "horizontal_sway",
            GuiMovementState::VerticalSway => "vertical_sway",
            GuiMovementState::Stable => "stable",
            GuiMovementState::AdjustToView => "adjust_to_view",
        }
    }

    /// Whether the panel is actively dodging a main obstruction
    pub fn is_swaying(&self) -> bool {
        matches!(
            self,
            GuiMovementState::HorizontalSway | GuiMovementState::VerticalSway
        )
    }

    /// Whether the desired position is the viewer's gaze point
    pub fn follows_gaze(&self) -> bool {
        matches!(
            self,
            GuiMovementState::Centered | GuiMovementState::AdjustToView
        )
    }
}

impl fmt::Display for GuiMovementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
