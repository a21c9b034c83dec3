//! Scripted tick traces

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use oui_panel::{Point3D, RayHit, Vector3D, ViewerPose};
use serde::{Deserialize, Serialize};

/// Ticks generated for the built-in demo when no count is given
pub const DEMO_TICKS: usize = 200;

/// A sequence of frames to replay
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub steps: Vec<Step>,
}

/// One rendered frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Step {
    /// Frame length in seconds; the run's default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dt: Option<f32>,
    #[serde(default)]
    pub viewer: ViewerPose,
    /// Raw server text frames received before this tick
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<String>,
    /// Ray results per anchor id, reported before this tick
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub hits: BTreeMap<String, Vec<RayHit>>,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse scenario {}", path.display()))
    }

    /// Keep at most `ticks` steps.
    pub fn truncate(&mut self, ticks: usize) {
        self.steps.truncate(ticks);
    }

    /// Viewer pose at the first step, used to spawn the panel.
    pub fn initial_viewer(&self) -> ViewerPose {
        self.steps
            .first()
            .map(Step::viewer_pose)
            .unwrap_or_default()
    }
}

impl Step {
    /// Viewer pose with the forward vector normalized
    pub fn viewer_pose(&self) -> ViewerPose {
        ViewerPose::new(self.viewer.position, self.viewer.forward)
    }
}

const EYE_HEIGHT: f32 = 1.6;

const DEMO_FRAME: &str = r#"{"type":"frame_data","gui_colors":{"background_color":{"r":20,"g":20,"b":28},"text_color":{"r":235,"g":235,"b":235}},"objects":[{"id":1,"x":0.4,"y":1.6,"z":3.0,"width":0.6,"height":1.7},{"id":2,"x":0.9,"y":1.5,"z":3.2,"width":0.8,"height":1.2}]}"#;

const DEMO_DANGER: &str =
    r#"{"type":"danger","danger_level":"HIGH DANGER","danger_source":"cyclist"}"#;

/// Head yaw in degrees for a given tick of the 200-tick demo cycle.
fn demo_yaw(phase: usize) -> f32 {
    match phase {
        15..=44 => (phase - 14) as f32,
        45..=59 => 30.0,
        60..=89 => 30.0 - (phase - 59) as f32,
        100..=139 => (phase - 100) as f32 * 2.0,
        140..=159 => 80.0,
        160..=199 => 80.0 - (phase - 159) as f32 * 2.0,
        _ => 0.0,
    }
}

/// Scripted session exercising every movement state.
///
/// Two people walk in front of the panel and block it while the viewer turns
/// toward them, then step away. Later the viewer looks far to the right and
/// back again. The cycle repeats every 200 ticks.
pub fn demo(ticks: usize) -> Scenario {
    let steps = (0..ticks)
        .map(|tick| {
            let phase = tick % 200;
            let yaw = demo_yaw(phase).to_radians();
            let viewer = ViewerPose::new(
                Point3D::new(0.0, EYE_HEIGHT, 0.0),
                Vector3D::new(yaw.sin(), 0.0, yaw.cos()),
            );

            let mut step = Step {
                viewer,
                ..Step::default()
            };
            match phase {
                10 => step.messages.push(DEMO_FRAME.to_string()),
                20 => step.messages.push(DEMO_DANGER.to_string()),
                _ => {}
            }
            match phase {
                12 => {
                    step.hits.insert("1".into(), vec![RayHit::Main, RayHit::Side]);
                    step.hits.insert("2".into(), vec![RayHit::Side]);
                }
                15 => {
                    step.hits.insert("2".into(), vec![RayHit::Main]);
                }
                50 => {
                    step.hits.insert("1".into(), vec![RayHit::None]);
                    step.hits.insert("2".into(), vec![RayHit::Viewer]);
                }
                _ => {}
            }
            step
        })
        .collect();
    Scenario { steps }
}
