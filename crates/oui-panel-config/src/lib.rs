//! Configuration for oui-panel
//!
//! Settings live in a TOML file with `[movement]`, `[anchors]` and
//! `[facing]` sections; every key is optional. [`discover`] looks for the
//! file in this order:
//!
//! 1. an explicitly given path
//! 2. the path in `OUI_PANEL_CONFIG`
//! 3. `oui-panel.toml` in the working directory
//! 4. `config.toml` in the platform config directory
//!
//! and falls back to built-in defaults when none exists.

mod error;
mod types;

pub use error::{ConfigError, Result};
pub use types::*;

use std::fmt;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::{debug, info};

/// Environment variable naming a config file
pub const CONFIG_ENV_VAR: &str = "OUI_PANEL_CONFIG";

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "oui-panel.toml";

/// Where the active configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    Environment(PathBuf),
    WorkingDir(PathBuf),
    UserDir(PathBuf),
    Defaults,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Explicit(p)
            | ConfigSource::Environment(p)
            | ConfigSource::WorkingDir(p)
            | ConfigSource::UserDir(p) => Some(p),
            ConfigSource::Defaults => None,
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.path() {
            Some(path) => write!(f, "{}", path.display()),
            None => f.write_str("built-in defaults"),
        }
    }
}

/// Platform config file, e.g. `~/.config/oui-panel/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("dev", "oui", "oui-panel").map(|dirs| dirs.config_dir().join("config.toml"))
}

impl PanelConfig {
    /// Parse and validate TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: PanelConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        info!(?path, "Loaded config");
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write the config, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(path, self.to_toml_string()?).map_err(write_err)?;
        info!(?path, "Saved config");
        Ok(())
    }
}

/// Locate and load the active configuration.
///
/// A path given explicitly or through the environment must exist; the other
/// locations are optional.
pub fn discover(explicit: Option<&Path>) -> Result<(PanelConfig, ConfigSource)> {
    let env_path = std::env::var_os(CONFIG_ENV_VAR)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);
    let working_dir = std::env::current_dir().ok();
    discover_from(
        explicit,
        env_path,
        working_dir.as_deref(),
        user_config_path(),
    )
}

fn discover_from(
    explicit: Option<&Path>,
    env_path: Option<PathBuf>,
    working_dir: Option<&Path>,
    user_path: Option<PathBuf>,
) -> Result<(PanelConfig, ConfigSource)> {
    if let Some(path) = explicit {
        return Ok((PanelConfig::load(path)?, ConfigSource::Explicit(path.to_path_buf())));
    }
    if let Some(path) = env_path {
        debug!("Using {} from {}", path.display(), CONFIG_ENV_VAR);
        return Ok((PanelConfig::load(&path)?, ConfigSource::Environment(path)));
    }
    if let Some(path) = working_dir.map(|dir| dir.join(LOCAL_CONFIG_FILE)) {
        if path.is_file() {
            return Ok((PanelConfig::load(&path)?, ConfigSource::WorkingDir(path)));
        }
    }
    if let Some(path) = user_path {
        if path.is_file() {
            return Ok((PanelConfig::load(&path)?, ConfigSource::UserDir(path)));
        }
    }

    info!("No config found, using defaults");
    Ok((PanelConfig::default(), ConfigSource::Defaults))
}
