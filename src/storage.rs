// src/storage.rs

use crate::error::{LedgerError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A JSON document under the storage directory, rewritten wholesale on save.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(dir: &Path, name: &str) -> Self {
        Self { path: dir.join(name) }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the document; `Ok(None)` when the file does not exist.
    pub fn read<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|e| LedgerError::MalformedPersistedState {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            })
    }

    /// Reads the document, falling back to `T::default()` when it is
    /// missing, unreadable or malformed.
    pub fn load_or_default<T: DeserializeOwned + Default>(&self) -> T {
        match self.read() {
            Ok(Some(value)) => value,
            Ok(None) => {
                debug!(path = %self.path.display(), "no persisted state, using defaults");
                T::default()
            }
            Err(e) => {
                warn!("Resetting persisted state: {}", e);
                T::default()
            }
        }
    }

    pub fn write<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(value)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}
