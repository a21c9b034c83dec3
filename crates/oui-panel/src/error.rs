//! Error types for decoding server traffic

/// Errors raised while decoding a server message
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("Malformed message JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unrecognized message type: {0}")]
    Unrecognized(String),

    #[error("Invalid anchor {id}: {reason}")]
    InvalidAnchor { id: String, reason: String },
}

pub type Result<T> = std::result::Result<T, MessageError>;
