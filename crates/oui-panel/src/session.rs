//! Per-frame driver tying anchors, obstructions and panel movement together

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::anchor::{AnchorRegistry, Obstruction, ObstructionSets, RayHit, DEFAULT_ANCHOR_LIFETIME};
use crate::error::Result;
use crate::facing::face_viewer;
use crate::movement::{GuiMovementMachine, GuiMovementState, MovementConfig, MovementInput};
use crate::protocol::{DangerNotice, GuiColors, ServerMessage};
use crate::spatial::{Point3D, Quaternion, Transform};
use crate::viewer::ViewerPose;

/// Everything a session needs to know up front
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub movement: MovementConfig,
    /// How long an anchor lives after it is first spawned
    pub anchor_lifetime: Duration,
    /// Turn rate of the yaw-facing rotation, per second
    pub facing_speed: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            movement: MovementConfig::default(),
            anchor_lifetime: DEFAULT_ANCHOR_LIFETIME,
            facing_speed: 2.0,
        }
    }
}

/// Session time bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickClock {
    /// Time since session start
    pub time: Duration,
    /// Length of the most recent tick
    pub delta_time: Duration,
    /// Ticks elapsed
    pub tick: u64,
}

impl TickClock {
    /// Advance the clock by one tick
    pub fn update(&mut self, dt: Duration) {
        self.delta_time = dt;
        self.time += dt;
        self.tick = self.tick.wrapping_add(1);
    }
}

/// Outcome of one [`PanelSession::tick`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickReport {
    pub tick: u64,
    pub time_secs: f32,
    pub state: GuiMovementState,
    pub position: Point3D,
    pub yaw_degrees: f32,
    /// Horizontal view angle to the panel; absent for a degenerate view
    pub angle: Option<f32>,
    pub main_count: usize,
    pub side_count: usize,
    pub anchor_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub expired: Vec<String>,
}

/// One AR session: a single floating panel plus the anchors around it
#[derive(Debug, Clone)]
pub struct PanelSession {
    config: SessionConfig,
    machine: GuiMovementMachine,
    anchors: AnchorRegistry,
    obstructions: ObstructionSets,
    panel: Transform,
    clock: TickClock,
    gui_colors: Option<GuiColors>,
    danger: Option<DangerNotice>,
}

impl PanelSession {
    /// Start a session with the panel spawned in front of the viewer.
    pub fn new(config: SessionConfig, viewer: &ViewerPose) -> Self {
        let position = viewer.gaze_point(config.movement.standoff_distance);
        let rotation =
            Quaternion::yaw_look_rotation(viewer.position - position).unwrap_or_default();
        info!(
            "Panel spawned at {:?}, anchor lifetime {:?}",
            position, config.anchor_lifetime
        );

        Self {
            machine: GuiMovementMachine::new(config.movement.clone()),
            anchors: AnchorRegistry::new(config.anchor_lifetime),
            obstructions: ObstructionSets::new(),
            panel: Transform::new(position, rotation),
            clock: TickClock::default(),
            gui_colors: None,
            danger: None,
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn panel(&self) -> &Transform {
        &self.panel
    }

    /// Current movement state
    pub fn state(&self) -> GuiMovementState {
        self.machine.state()
    }

    pub fn anchors(&self) -> &AnchorRegistry {
        &self.anchors
    }

    pub fn obstructions(&self) -> &ObstructionSets {
        &self.obstructions
    }

    pub fn clock(&self) -> &TickClock {
        &self.clock
    }

    /// Latest panel colors requested by the server
    pub fn gui_colors(&self) -> Option<&GuiColors> {
        self.gui_colors.as_ref()
    }

    /// Latest danger analysis
    pub fn danger(&self) -> Option<&DangerNotice> {
        self.danger.as_ref()
    }

    /// Decode and apply a raw server text frame.
    pub fn receive(&mut self, text: &str) -> Result<usize> {
        let message = ServerMessage::parse(text)?;
        Ok(self.apply_message(&message))
    }

    /// Apply a decoded server message. Returns the number of anchors that
    /// were newly spawned.
    ///
    /// Each detected object is handled on its own: one with an unusable
    /// position is logged and skipped while the rest of the frame applies.
    pub fn apply_message(&mut self, message: &ServerMessage) -> usize {
        match message {
            ServerMessage::FrameData(frame) => {
                if let Some(colors) = frame.gui_colors {
                    self.gui_colors = Some(colors);
                }
                let now = self.clock.time;
                let mut spawned = 0;
                for update in frame.anchor_updates() {
                    match update {
                        Ok(update) => {
                            if self.anchors.upsert(update, now) {
                                spawned += 1;
                            }
                        }
                        Err(e) => warn!("Skipping detected object: {}", e),
                    }
                }
                spawned
            }
            ServerMessage::Danger(notice) => {
                if notice.is_alert() {
                    warn!(
                        "Danger reported: {} ({})",
                        notice.danger_level, notice.danger_source
                    );
                }
                self.danger = Some(notice.clone());
                0
            }
        }
    }

    /// Record the rays cast by anchor `id` this tick. Unknown anchors are
    /// ignored; returns whether the obstruction sets changed.
    pub fn report_hits(&mut self, id: &str, hits: &[RayHit]) -> bool {
        if !self.anchors.contains(id) {
            debug!("Ignoring ray hits for unknown anchor {}", id);
            return false;
        }
        self.obstructions.report(id, Obstruction::classify(hits))
    }

    /// Advance the session by one frame.
    ///
    /// Order: clock, anchor expiry, panel position, panel rotation.
    pub fn tick(&mut self, dt: Duration, viewer: &ViewerPose) -> TickReport {
        self.clock.update(dt);

        let expired = self.anchors.expire(self.clock.time);
        for id in &expired {
            self.obstructions.forget(id);
        }

        let input = MovementInput {
            dt,
            viewer: *viewer,
            panel_position: self.panel.position,
            main_count: self.obstructions.main_count(),
            side_count: self.obstructions.side_count(),
            anchor_centroid: self.anchors.centroid(),
            follow_speed: self.config.movement.follow_speed,
        };
        let degenerate = viewer.horizontal_forward().is_none();
        self.panel.position = self.machine.advance(&input);
        self.panel.rotation = face_viewer(
            self.panel.rotation,
            self.panel.position,
            viewer.position,
            self.config.facing_speed,
            dt,
        );

        TickReport {
            tick: self.clock.tick,
            time_secs: self.clock.time.as_secs_f32(),
            state: self.machine.state(),
            position: self.panel.position,
            yaw_degrees: self.panel.rotation.yaw_degrees(),
            angle: if degenerate { None } else { self.machine.last_angle() },
            main_count: input.main_count,
            side_count: input.side_count,
            anchor_count: self.anchors.len(),
            expired,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::Vector3D;

    fn viewer() -> ViewerPose {
        ViewerPose::new(Point3D::new(0.0, 1.6, 0.0), Vector3D::FORWARD)
    }

    const FRAME: &str = r#"{
        "type": "frame_data",
        "gui_colors": {
            "background_color": {"r": 10, "g": 20, "b": 30},
            "text_color": {"r": 250, "g": 250, "b": 250}
        },
        "objects": [
            {"x": 0.3, "y": 1.6, "z": 3.0, "id": 1, "width": 0.5, "height": 1.0},
            {"x": 0.6, "y": 1.6, "z": 3.0, "id": 2, "width": 0.5, "height": 1.0}
        ]
    }"#;

    #[test]
    fn test_session_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<PanelSession>();
    }

    #[test]
    fn test_spawns_panel_in_front_of_viewer() {
        let session = PanelSession::new(SessionConfig::default(), &viewer());
        assert_eq!(session.panel().position, Point3D::new(0.0, 1.6, 2.0));
        assert_eq!(session.state(), GuiMovementState::Centered);
        // faces back toward the viewer
        assert!((session.panel().forward().z + 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_receive_frame_spawns_anchors_and_colors() {
        let mut session = PanelSession::new(SessionConfig::default(), &viewer());
        assert_eq!(session.receive(FRAME).unwrap(), 2);
        assert_eq!(session.receive(FRAME).unwrap(), 0);
        assert_eq!(session.anchors().len(), 2);
        assert_eq!(session.gui_colors().unwrap().text_color.r, 250.0);
    }

    #[test]
    fn test_bad_object_does_not_drop_the_frame() {
        let mut session = PanelSession::new(SessionConfig::default(), &viewer());
        let frame = r#"{
            "type": "frame_data",
            "gui_colors": {
                "background_color": {"r": 0, "g": 0, "b": 0},
                "text_color": {"r": 255, "g": 255, "b": 255}
            },
            "objects": [
                {"x": 0.3, "y": 1.6, "z": 3.0, "id": 1, "width": 0.5, "height": 1.0},
                {"x": 1e39, "y": 1.6, "z": 3.0, "id": 2, "width": 0.5, "height": 1.0}
            ]
        }"#;

        assert_eq!(session.receive(frame).unwrap(), 1);
        assert!(session.anchors().contains("1"));
        assert!(!session.anchors().contains("2"));
        assert_eq!(session.gui_colors().unwrap().text_color.r, 255.0);
    }

    #[test]
    fn test_receive_danger() {
        let mut session = PanelSession::new(SessionConfig::default(), &viewer());
        session
            .receive(r#"{"danger_level": "HIGH DANGER", "danger_source": "car"}"#)
            .unwrap();
        assert!(session.danger().unwrap().is_alert());
        assert!(session.receive("[]").is_err());
    }

    #[test]
    fn test_hits_for_unknown_anchor_are_ignored() {
        let mut session = PanelSession::new(SessionConfig::default(), &viewer());
        assert!(!session.report_hits("ghost", &[RayHit::Main]));
        assert_eq!(session.obstructions().main_count(), 0);
    }

    #[test]
    fn test_obstruction_drives_sway_then_expiry_clears_it() {
        let mut session = PanelSession::new(SessionConfig::default(), &viewer());
        session.receive(FRAME).unwrap();
        session.report_hits("1", &[RayHit::Main]);
        session.report_hits("2", &[RayHit::Side, RayHit::Main]);

        let dt = Duration::from_millis(100);
        let report = session.tick(dt, &viewer());
        assert_eq!(report.state, GuiMovementState::HorizontalSway);
        assert_eq!(report.main_count, 2);
        // anchors are to the right, so the panel starts moving left
        assert!(report.position.x < 0.0);

        // run past the anchor lifetime
        let mut expired = Vec::new();
        for _ in 0..30 {
            let report = session.tick(dt, &viewer());
            expired.extend(report.expired);
        }
        assert_eq!(expired, vec!["1".to_string(), "2".to_string()]);
        assert!(session.anchors().is_empty());
        assert_eq!(session.obstructions().main_count(), 0);
        assert_ne!(session.state(), GuiMovementState::HorizontalSway);
    }

    #[test]
    fn test_tick_reports_no_angle_when_looking_down() {
        let mut session = PanelSession::new(SessionConfig::default(), &viewer());
        let before = session.panel().position;
        let down = ViewerPose::new(Point3D::new(0.0, 1.6, 0.0), Vector3D::new(0.0, -1.0, 0.0));
        let report = session.tick(Duration::from_millis(16), &down);
        assert_eq!(report.angle, None);
        assert_eq!(report.position, before);
    }
}
