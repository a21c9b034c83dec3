use std::time::Duration;

use oui_panel::{MovementConfig, SessionConfig};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Top-level configuration file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PanelConfig {
    pub movement: MovementSection,
    pub anchors: AnchorSection,
    pub facing: FacingSection,
}

/// `[movement]`: the panel movement controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MovementSection {
    pub standoff_distance: f32,
    pub max_sway_angle: f32,
    pub max_angle: f32,
    pub recover_angle: f32,
    pub sway_step_degrees: f32,
    pub vertical_offset: f32,
    pub follow_speed: f32,
    pub clamp_follow_factor: bool,
    pub centered_main_trigger: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stable_debounce_ticks: Option<u32>,
}

impl Default for MovementSection {
    fn default() -> Self {
        MovementConfig::default().into()
    }
}

impl From<MovementConfig> for MovementSection {
    fn from(c: MovementConfig) -> Self {
        Self {
            standoff_distance: c.standoff_distance,
            max_sway_angle: c.max_sway_angle,
            max_angle: c.max_angle,
            recover_angle: c.recover_angle,
            sway_step_degrees: c.sway_step_degrees,
            vertical_offset: c.vertical_offset,
            follow_speed: c.follow_speed,
            clamp_follow_factor: c.clamp_follow_factor,
            centered_main_trigger: c.centered_main_trigger,
            stable_debounce_ticks: c.stable_debounce_ticks,
        }
    }
}

impl From<&MovementSection> for MovementConfig {
    fn from(s: &MovementSection) -> Self {
        Self {
            standoff_distance: s.standoff_distance,
            max_sway_angle: s.max_sway_angle,
            max_angle: s.max_angle,
            recover_angle: s.recover_angle,
            sway_step_degrees: s.sway_step_degrees,
            vertical_offset: s.vertical_offset,
            follow_speed: s.follow_speed,
            clamp_follow_factor: s.clamp_follow_factor,
            centered_main_trigger: s.centered_main_trigger,
            stable_debounce_ticks: s.stable_debounce_ticks,
        }
    }
}

/// `[anchors]`: anchor bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnchorSection {
    /// Seconds an anchor survives after it is first spawned
    pub lifetime_secs: f32,
}

impl Default for AnchorSection {
    fn default() -> Self {
        Self {
            lifetime_secs: oui_panel::anchor::DEFAULT_ANCHOR_LIFETIME.as_secs_f32(),
        }
    }
}

/// `[facing]`: yaw-locked panel rotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FacingSection {
    pub speed: f32,
}

impl Default for FacingSection {
    fn default() -> Self {
        Self {
            speed: SessionConfig::default().facing_speed,
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn require_positive(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be a positive number, got {value}")))
    }
}

fn require_angle(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && (0.0..=180.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, format!("must be between 0 and 180 degrees, got {value}")))
    }
}

impl PanelConfig {
    /// Reject values the controller cannot work with.
    pub fn validate(&self) -> Result<()> {
        let m = &self.movement;
        require_positive("movement.standoff_distance", m.standoff_distance)?;
        require_angle("movement.max_sway_angle", m.max_sway_angle)?;
        require_angle("movement.max_angle", m.max_angle)?;
        require_angle("movement.recover_angle", m.recover_angle)?;
        if m.recover_angle >= m.max_angle {
            return Err(invalid(
                "movement.recover_angle",
                format!(
                    "must be below movement.max_angle ({} >= {})",
                    m.recover_angle, m.max_angle
                ),
            ));
        }
        require_positive("movement.sway_step_degrees", m.sway_step_degrees)?;
        if m.sway_step_degrees > 90.0 {
            return Err(invalid(
                "movement.sway_step_degrees",
                format!("must be at most 90 degrees per tick, got {}", m.sway_step_degrees),
            ));
        }
        if !m.vertical_offset.is_finite() {
            return Err(invalid("movement.vertical_offset", "must be finite"));
        }
        require_positive("movement.follow_speed", m.follow_speed)?;
        if m.stable_debounce_ticks == Some(0) {
            return Err(invalid(
                "movement.stable_debounce_ticks",
                "must be at least 1; omit it to disable the debounce",
            ));
        }

        require_positive("anchors.lifetime_secs", self.anchors.lifetime_secs)?;
        require_positive("facing.speed", self.facing.speed)?;
        Ok(())
    }

    /// Settings in the form the session expects
    pub fn to_session_config(&self) -> SessionConfig {
        SessionConfig {
            movement: MovementConfig::from(&self.movement),
            anchor_lifetime: Duration::from_secs_f32(self.anchors.lifetime_secs),
            facing_speed: self.facing.speed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_core() {
        let config = PanelConfig::default();
        config.validate().unwrap();
        assert_eq!(config.to_session_config(), SessionConfig::default());
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config: PanelConfig = toml::from_str(
            r#"
            [movement]
            max_angle = 70.0
            stable_debounce_ticks = 50
            "#,
        )
        .unwrap();
        assert_eq!(config.movement.max_angle, 70.0);
        assert_eq!(config.movement.max_sway_angle, 45.0);
        assert_eq!(config.movement.stable_debounce_ticks, Some(50));
        assert_eq!(config.anchors, AnchorSection::default());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let result: std::result::Result<PanelConfig, _> = toml::from_str(
            r#"
            [movement]
            max_angel = 70.0
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = PanelConfig::default();
        config.movement.recover_angle = 60.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "movement.recover_angle", .. })
        ));

        let mut config = PanelConfig::default();
        config.movement.follow_speed = 0.0;
        assert!(config.validate().is_err());

        let mut config = PanelConfig::default();
        config.movement.stable_debounce_ticks = Some(0);
        assert!(config.validate().is_err());

        let mut config = PanelConfig::default();
        config.anchors.lifetime_secs = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = PanelConfig::default();
        config.movement.max_angle = 200.0;
        assert!(config.validate().is_err());
    }
}
