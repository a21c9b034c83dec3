//! Messages pushed by the detection server
//!
//! Two shapes arrive on the channel: per-frame detection results tagged
//! `"type": "frame_data"`, and free-standing danger analyses carrying
//! `danger_level` / `danger_source`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::anchor::AnchorUpdate;
use crate::error::{MessageError, Result};
use crate::spatial::{Point3D, Vector3D};

/// Danger level that does not raise the notification block
pub const LOW_DANGER: &str = "LOW DANGER";

/// A decoded server message
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    FrameData(FrameData),
    Danger(DangerNotice),
}

impl ServerMessage {
    /// Decode one text frame from the server.
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .map(str::to_owned);

        match kind.as_deref() {
            Some("frame_data") => Ok(ServerMessage::FrameData(serde_json::from_value(value)?)),
            _ if value.get("danger_level").is_some() => {
                Ok(ServerMessage::Danger(serde_json::from_value(value)?))
            }
            Some(other) => Err(MessageError::Unrecognized(other.to_string())),
            None => Err(MessageError::Unrecognized("<untyped>".to_string())),
        }
    }
}

/// Detection results for one camera frame
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameData {
    #[serde(default)]
    pub gui_colors: Option<GuiColors>,
    /// The server sends `null` instead of an empty list
    #[serde(default, deserialize_with = "null_as_empty")]
    pub objects: Vec<ObjectData>,
}

impl FrameData {
    /// One anchor update per detected object. Objects with non-finite
    /// coordinates yield an error without affecting the others.
    pub fn anchor_updates(&self) -> impl Iterator<Item = Result<AnchorUpdate>> + '_ {
        self.objects.iter().map(ObjectData::to_anchor_update)
    }
}

/// One detected object in world coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectData {
    /// Tracker id; the server sends either a number or a string
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub width: f32,
    pub height: f32,
}

impl ObjectData {
    pub fn to_anchor_update(&self) -> Result<AnchorUpdate> {
        let position = Point3D::new(self.x, self.y, self.z);
        if !position.is_finite() {
            return Err(MessageError::InvalidAnchor {
                id: self.id.clone(),
                reason: "non-finite position".to_string(),
            });
        }
        Ok(AnchorUpdate::new(self.id.clone(), position)
            .with_extent(Vector3D::new(self.width, self.height, self.width)))
    }
}

/// 0-255 color channels as computed by the server
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Channels scaled to `[0, 1]`
    pub fn to_unit(&self) -> [f32; 3] {
        [self.r, self.g, self.b].map(|c| (c / 255.0).clamp(0.0, 1.0))
    }
}

/// Panel colors chosen to contrast with the scene behind it
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GuiColors {
    pub background_color: Rgb,
    pub text_color: Rgb,
}

/// Result of the server's danger analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DangerNotice {
    pub danger_level: String,
    #[serde(default)]
    pub danger_source: String,
}

impl DangerNotice {
    /// Whether the notification block should be shown
    pub fn is_alert(&self) -> bool {
        self.danger_level != LOW_DANGER
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Int(n) => n.to_string(),
        Id::Float(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frame_data() {
        let text = r#"{
            "type": "frame_data",
            "gui_colors": {
                "background_color": {"r": 255, "g": 0, "b": 51},
                "text_color": {"r": 0, "g": 0, "b": 0}
            },
            "objects": [
                {"x": 1.0, "y": 0.5, "z": 3.0, "id": 7, "width": 0.4, "height": 1.2},
                {"x": -1.0, "y": 0.0, "z": 2.0, "id": "-1", "width": 1.0, "height": 1.0}
            ]
        }"#;

        let ServerMessage::FrameData(frame) = ServerMessage::parse(text).unwrap() else {
            panic!("expected frame data");
        };
        assert_eq!(frame.objects.len(), 2);
        assert_eq!(frame.objects[0].id, "7");
        assert_eq!(frame.objects[1].id, "-1");

        let colors = frame.gui_colors.unwrap();
        assert_eq!(colors.background_color.to_unit(), [1.0, 0.0, 0.2]);

        let updates: Vec<AnchorUpdate> = frame.anchor_updates().collect::<Result<_>>().unwrap();
        assert_eq!(updates[0].position, Point3D::new(1.0, 0.5, 3.0));
        assert_eq!(updates[0].extent, Vector3D::new(0.4, 1.2, 0.4));
    }

    #[test]
    fn test_non_finite_object_fails_alone() {
        let text = r#"{"type": "frame_data", "objects": [
            {"x": 1e39, "y": 0.0, "z": 1.0, "id": 1, "width": 1.0, "height": 1.0},
            {"x": 0.5, "y": 0.0, "z": 1.0, "id": 2, "width": 1.0, "height": 1.0}
        ]}"#;
        let ServerMessage::FrameData(frame) = ServerMessage::parse(text).unwrap() else {
            panic!("expected frame data");
        };
        let results: Vec<_> = frame.anchor_updates().collect();
        assert!(matches!(
            &results[0],
            Err(MessageError::InvalidAnchor { id, .. }) if id == "1"
        ));
        assert_eq!(results[1].as_ref().unwrap().id, "2");
    }

    #[test]
    fn test_null_objects() {
        let text = r#"{"type": "frame_data", "gui_colors": null, "objects": null}"#;
        let msg = ServerMessage::parse(text).unwrap();
        assert_eq!(msg, ServerMessage::FrameData(FrameData::default()));
    }

    #[test]
    fn test_parse_danger() {
        let text = r#"{"type": "danger", "danger_level": "HIGH DANGER", "danger_source": "stairs"}"#;
        let ServerMessage::Danger(notice) = ServerMessage::parse(text).unwrap() else {
            panic!("expected danger notice");
        };
        assert!(notice.is_alert());
        assert_eq!(notice.danger_source, "stairs");

        let low = DangerNotice {
            danger_level: LOW_DANGER.to_string(),
            danger_source: String::new(),
        };
        assert!(!low.is_alert());
    }

    #[test]
    fn test_rejects_unknown_and_malformed() {
        assert!(matches!(
            ServerMessage::parse(r#"{"type": "image_data"}"#),
            Err(MessageError::Unrecognized(t)) if t == "image_data"
        ));
        assert!(matches!(
            ServerMessage::parse("{not json"),
            Err(MessageError::Json(_))
        ));
        assert!(matches!(
            ServerMessage::parse(r#"{"type": "frame_data", "objects": [{"id": 1}]}"#),
            Err(MessageError::Json(_))
        ));
    }
}
