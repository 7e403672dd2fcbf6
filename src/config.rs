// src/config.rs

use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "config.toml";
const STORAGE_DIR_NAME: &str = ".commit-ledger";

/// Ledger settings, read from `config.toml` in the storage directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum number of reports kept in history
    pub history_limit: usize,

    /// Commits shown by the recent-commit listing
    pub recent_commits: usize,

    /// Characters of the commit id used as the report reference
    pub short_id_len: usize,

    /// Overrides where filters and history are stored
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,

    /// Where hand-offs would be sent; nothing is sent over the network
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handoff_endpoint: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_limit: 10,
            recent_commits: 20,
            short_id_len: 10,
            storage_dir: None,
            handoff_endpoint: None,
        }
    }
}

impl Config {
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| LedgerError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Reads a config file that must exist.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            LedgerError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml(&contents)
    }

    /// Loads `path`, or defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.short_id_len == 0 {
            return Err(LedgerError::Config("short_id_len must be greater than 0".to_string()));
        }
        if self.recent_commits == 0 {
            return Err(LedgerError::Config("recent_commits must be greater than 0".to_string()));
        }
        Ok(())
    }

    /// Storage directory: the override, else `<workdir>/.commit-ledger`,
    /// else `~/.commit-ledger`.
    pub fn storage_dir(&self, workdir: Option<&Path>) -> Result<PathBuf> {
        if let Some(dir) = &self.storage_dir {
            return Ok(dir.clone());
        }
        if let Some(workdir) = workdir {
            return Ok(workdir.join(STORAGE_DIR_NAME));
        }
        let home = dirs::home_dir()
            .ok_or_else(|| LedgerError::Config("Could not find home directory".into()))?;
        Ok(home.join(STORAGE_DIR_NAME))
    }
}
