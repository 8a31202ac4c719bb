//! Host configuration, stored as TOML
//!
//! ```toml
//! session_minutes = 45
//! quality_policy = "clamp"
//! state_file = "/home/me/revision/flow.json"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::revision_flow::DEFAULT_SESSION_MINUTES;
use crate::scheduling::QualityPolicy;

const APP_DIR: &str = "revision";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Could not determine a default directory")]
    NoDefaultDir,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevisionConfig {
    /// Length of a review session
    pub session_minutes: u32,
    /// What to do with ratings outside 0-5
    pub quality_policy: QualityPolicy,
    /// Flow snapshot location; defaults to the user data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_file: Option<PathBuf>,
}

impl Default for RevisionConfig {
    fn default() -> Self {
        Self {
            session_minutes: DEFAULT_SESSION_MINUTES as u32,
            quality_policy: QualityPolicy::default(),
            state_file: None,
        }
    }
}

impl RevisionConfig {
    /// `<config_dir>/revision/config.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join("config.toml"))
            .ok_or(ConfigError::NoDefaultDir)
    }

    /// Load from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn session_duration(&self) -> Duration {
        Duration::minutes(i64::from(self.session_minutes))
    }

    /// Configured snapshot path, or `<data_dir>/revision/flow.json`
    pub fn state_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.state_file {
            return Ok(path.clone());
        }
        dirs::data_dir()
            .map(|d| d.join(APP_DIR).join("flow.json"))
            .ok_or(ConfigError::NoDefaultDir)
    }
}
