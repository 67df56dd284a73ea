//! Persisted user configuration.
//!
//! Two presentation-level settings survive between runs: the directory file
//! prompts start from and the primary plot colour. The processing pipeline
//! never reads or writes this store — every analysis knob travels through
//! [`AnalyzeOptions`](crate::analysis::report::AnalyzeOptions) explicitly.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};

/// Colours the plotting collaborator accepts.
pub const VALID_COLORS: [&str; 7] = [
    "red", "yellow", "green", "cyan", "blue", "magenta", "black",
];

pub const DEFAULT_PRIMARY_COLOR: &str = "cyan";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Directory file prompts start from; `None` = current directory.
    pub root_directory: Option<PathBuf>,
    pub primary_color: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            root_directory: None,
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
        }
    }
}

impl UserConfig {
    /// Load the config from `path`. A missing file yields the defaults;
    /// invalid stored values are individually reset to theirs.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).context("reading config file")?;
        let mut config: UserConfig = serde_json::from_str(&text).context("parsing config file")?;
        config.sanitize();
        Ok(config)
    }

    /// Write the config to `path` as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self).context("serializing config")?;
        std::fs::write(path, text)
            .with_context(|| format!("writing config file {}", path.display()))?;
        Ok(())
    }

    /// Reset any invalid setting to its default.
    fn sanitize(&mut self) {
        if let Some(dir) = &self.root_directory {
            if !dir.exists() {
                warn!(
                    "config root directory {} does not exist, clearing",
                    dir.display()
                );
                self.root_directory = None;
            }
        }
        if !VALID_COLORS.contains(&self.primary_color.to_lowercase().as_str()) {
            warn!(
                "config primary colour {:?} is invalid, resetting to {DEFAULT_PRIMARY_COLOR}",
                self.primary_color
            );
            self.primary_color = DEFAULT_PRIMARY_COLOR.to_string();
        }
    }
}
