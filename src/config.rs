use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::DEFAULT_MAX_NAME_CHARS;

/// What to do before the first write of an apply pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackupPolicy {
    /// Snapshot the whole store and abort if that fails.
    #[default]
    Snapshot,
    /// Write without a recovery copy.
    Skip,
}

/// Configuration for [`LoadedStore::load`](crate::session::LoadedStore::load).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Largest name (in UTF-16 code units) trusted when reading a record.
    ///
    /// A sanity bound against misparsed buffers, not a known limit of the
    /// format. Revisions of the save tooling have used both 100 and 200.
    ///
    /// Default: 100.
    pub max_name_chars: u64,
    pub backup: BackupPolicy,
    /// Strip surrounding whitespace from requested names. Default: true.
    pub trim_names: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_name_chars: DEFAULT_MAX_NAME_CHARS,
            backup: BackupPolicy::Snapshot,
            trim_names: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

impl EditorConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}
