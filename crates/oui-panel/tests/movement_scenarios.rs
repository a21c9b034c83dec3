//! Multi-tick behavior of the panel movement controller

use std::time::Duration;

use oui_panel::movement::sway_direction;
use oui_panel::{
    GuiMovementMachine, GuiMovementState, MovementConfig, MovementInput, Point3D, SwayDirection,
    Vector3D, ViewerPose,
};

const DT: Duration = Duration::from_millis(50);

/// Panel two units from the origin at `degrees` to the right of +Z.
fn panel_at_angle(degrees: f32) -> Point3D {
    let r = degrees.to_radians();
    Point3D::new(2.0 * r.sin(), 0.0, 2.0 * r.cos())
}

fn tick(panel: Point3D, main: usize, side: usize) -> MovementInput {
    MovementInput {
        dt: DT,
        viewer: ViewerPose::default(),
        panel_position: panel,
        main_count: main,
        side_count: side,
        anchor_centroid: None,
        follow_speed: 2.0,
    }
}

#[test]
fn test_stable_escalates_past_max_angle() {
    let mut machine = GuiMovementMachine::default().with_state(GuiMovementState::Stable);
    machine.advance(&tick(panel_at_angle(61.0), 0, 0));
    assert_eq!(machine.state(), GuiMovementState::AdjustToView);

    let mut machine = GuiMovementMachine::default().with_state(GuiMovementState::Stable);
    machine.advance(&tick(panel_at_angle(59.0), 0, 0));
    assert_eq!(machine.state(), GuiMovementState::Stable);
}

#[test]
fn test_sways_settle_when_main_obstruction_clears() {
    for state in [GuiMovementState::HorizontalSway, GuiMovementState::VerticalSway] {
        for degrees in (0..=180).step_by(15) {
            let mut machine = GuiMovementMachine::default().with_state(state);
            assert_eq!(
                machine.transition(degrees as f32, 0, 4),
                GuiMovementState::Stable,
                "{state} at {degrees} degrees"
            );
        }
    }
}

#[test]
fn test_adjust_to_view_waits_for_recovery_angle() {
    let mut machine = GuiMovementMachine::default().with_state(GuiMovementState::AdjustToView);
    machine.advance(&tick(panel_at_angle(10.0), 0, 0));
    assert_eq!(machine.state(), GuiMovementState::AdjustToView);

    machine.advance(&tick(panel_at_angle(4.0), 0, 0));
    assert_eq!(machine.state(), GuiMovementState::Centered);
}

#[test]
fn test_stable_is_idempotent() {
    let mut machine = GuiMovementMachine::default().with_state(GuiMovementState::Stable);
    let start = Point3D::new(0.0, 0.0, 2.0);
    let mut panel = start;
    for _ in 0..1_000 {
        panel = machine.advance(&tick(panel, 0, 0));
        assert_eq!(machine.state(), GuiMovementState::Stable);
    }
    assert_eq!(panel, start);
}

#[test]
fn test_interpolation_law_and_convergence() {
    let mut machine = GuiMovementMachine::default();
    let desired = Point3D::new(0.0, 0.0, 2.0);
    let mut panel = Point3D::new(1.0, 0.5, 1.0);
    let mut last_distance = panel.distance(&desired);
    let f = machine.follow_factor(2.0, DT);

    for _ in 0..50 {
        let next = machine.advance(&tick(panel, 0, 0));
        assert_eq!(machine.state(), GuiMovementState::Centered);

        let expected = Point3D::new(
            panel.x + f * (desired.x - panel.x),
            panel.y + f * (desired.y - panel.y),
            panel.z + f * (desired.z - panel.z),
        );
        assert_eq!(next, expected);

        let distance = next.distance(&desired);
        assert!(distance <= last_distance);
        last_distance = distance;
        panel = next;
    }
    assert!(last_distance < 0.01);
}

#[test]
fn test_unclamped_factor_overshoots() {
    let config = MovementConfig {
        clamp_follow_factor: false,
        ..MovementConfig::default()
    };
    let mut machine = GuiMovementMachine::new(config);
    let mut input = tick(Point3D::new(0.0, 0.0, 1.0), 0, 0);
    input.dt = Duration::from_millis(750);

    // factor 1.5 carries the panel past the 2.0 standoff
    let next = machine.advance(&input);
    assert!((next.z - 2.5).abs() < 1e-5);

    let mut clamped = GuiMovementMachine::default();
    assert_eq!(clamped.advance(&input), Point3D::new(0.0, 0.0, 2.0));
}

#[test]
fn test_obstruction_then_release() {
    let mut machine = GuiMovementMachine::default();
    let panel = Point3D::new(0.0, 0.0, 2.0);

    machine.advance(&tick(panel, 0, 0));
    assert_eq!(machine.state(), GuiMovementState::Centered);

    machine.advance(&tick(panel, 2, 0));
    assert_eq!(machine.state(), GuiMovementState::HorizontalSway);

    machine.advance(&tick(panel, 0, 0));
    assert_eq!(machine.state(), GuiMovementState::Stable);
}

#[test]
fn test_sway_steers_away_from_anchors_on_the_right() {
    let viewer = ViewerPose::default();
    let panel = Point3D::new(0.0, 0.0, 2.0);
    let centroid = Point3D::new(1.5, 0.3, 2.5);

    assert_eq!(
        sway_direction(viewer.position, panel, Some(centroid)),
        SwayDirection::Left
    );

    let mut machine = GuiMovementMachine::default().with_state(GuiMovementState::HorizontalSway);
    let mut input = tick(panel, 1, 0);
    input.anchor_centroid = Some(centroid);

    let mut position = panel;
    for _ in 0..5 {
        input.panel_position = position;
        position = machine.advance(&input);
    }
    assert_eq!(machine.state(), GuiMovementState::HorizontalSway);
    assert!(position.x < 0.0);
}

#[test]
fn test_vertical_sway_lifts_above_viewer() {
    let viewer = ViewerPose::new(Point3D::new(0.0, 1.5, 0.0), Vector3D::FORWARD);
    let mut machine = GuiMovementMachine::default().with_state(GuiMovementState::VerticalSway);
    let mut input = tick(Point3D::new(0.2, 1.5, 2.0), 1, 0);
    input.viewer = viewer;
    input.dt = Duration::from_secs(1);

    let next = machine.advance(&input);
    assert_eq!(machine.state(), GuiMovementState::VerticalSway);
    assert_eq!(next, Point3D::new(0.2, 2.5, 2.0));
}

#[test]
fn test_debounced_stable_returns_to_center() {
    let config = MovementConfig {
        stable_debounce_ticks: Some(50),
        ..MovementConfig::default()
    };
    let mut machine = GuiMovementMachine::new(config).with_state(GuiMovementState::Stable);
    let panel = Point3D::new(0.0, 0.0, 2.0);

    for _ in 0..49 {
        machine.advance(&tick(panel, 0, 0));
        assert_eq!(machine.state(), GuiMovementState::Stable);
    }
    machine.advance(&tick(panel, 0, 0));
    assert_eq!(machine.state(), GuiMovementState::Centered);
}
