//! Runtime Configuration

use crate::error::{BlendError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Runtime configuration options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuntimeConfig {
    /// Base directory for file fetches
    pub root_dir: PathBuf,

    /// Action-tree definition file, relative to `root_dir`
    pub action_list_path: String,

    /// Declarative behavior attribute
    pub behavior_attribute: String,

    /// Virtual milliseconds between animation frames
    pub frame_interval_ms: u64,

    /// Keep diagnostics in memory as well as logging them
    pub capture_diagnostics: bool,

    /// Honour `on<event>="Tree(event)"` attributes during dispatch
    pub inline_handlers: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            action_list_path: "js/actionList.json".to_string(),
            behavior_attribute: "data-blend-behavior".to_string(),
            frame_interval_ms: 16,
            capture_diagnostics: false,
            inline_handlers: true,
        }
    }
}

impl RuntimeConfig {
    /// Parse from a JSON object; missing keys keep their defaults
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| BlendError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| BlendError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Self::from_json_str(&text)
    }

    fn validate(&self) -> Result<()> {
        if self.behavior_attribute.trim().is_empty() {
            return Err(BlendError::Config("behaviorAttribute must not be empty".into()));
        }
        if self.frame_interval_ms == 0 {
            return Err(BlendError::Config("frameIntervalMs must be at least 1".into()));
        }
        Ok(())
    }
}
