use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use revision_lib::config::RevisionConfig;
use revision_lib::revision_flow::RevisionFlow;
use revision_lib::scheduling::{Difficulty, Quality};

/// Shared application state for CLI commands
pub struct App {
    pub config: RevisionConfig,
    pub state_path: PathBuf,
    pub flow: RevisionFlow,
}

impl App {
    /// Load config and, if the snapshot exists, the flow
    pub fn new(config_path: Option<&Path>, state_path: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_path {
            Some(path) => path.to_path_buf(),
            None => RevisionConfig::default_path().context("Failed to locate config directory")?,
        };
        let config = RevisionConfig::load(&config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

        let state_path = match state_path {
            Some(path) => path,
            None => config.state_path().context("Failed to locate data directory")?,
        };

        let mut flow = RevisionFlow::new();
        if state_path.exists() {
            flow.load_from_path(&state_path)
                .with_context(|| format!("Failed to load flow from {}", state_path.display()))?;
        } else {
            log::debug!("No flow at {:?}, starting empty", state_path);
        }

        Ok(Self {
            config,
            state_path,
            flow,
        })
    }

    /// Write the flow back to its snapshot file
    pub fn save(&self) -> Result<()> {
        self.flow
            .save_to_path(&self.state_path)
            .with_context(|| format!("Failed to save flow to {}", self.state_path.display()))
    }

    /// Accept either a difficulty name or a numeric quality
    pub fn parse_rating(&self, raw: &str) -> Result<Quality> {
        if let Ok(difficulty) = raw.parse::<Difficulty>() {
            return Ok(difficulty.quality());
        }
        let value: i32 = raw
            .trim()
            .parse()
            .with_context(|| format!("'{}' is neither a quality (0-5) nor a difficulty", raw))?;
        Ok(self.config.quality_policy.apply(value)?)
    }
}
