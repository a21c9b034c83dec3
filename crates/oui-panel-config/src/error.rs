use std::path::PathBuf;

/// Errors raised while locating, reading or validating configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {0:?}")]
    NotFound(PathBuf),

    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write config file {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
