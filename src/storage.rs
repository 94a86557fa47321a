//! Durable local storage for client state.
//!
//! State that must survive the process (the session, the offline user
//! registry, queued repairs) lives here as pretty-printed JSON files, one
//! key per file, under the configured data directory. Writes go through a
//! temp file and rename so a crash mid-write never leaves a half-written
//! record behind.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{AppError, AppResult};

/// Key -> JSON file store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Load the value stored under `key`, or `None` if nothing was ever
    /// stored there. A file that exists but cannot be read or parsed is an
    /// error; callers decide whether that is fatal or recoverable.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)
            .map_err(|e| storage_error(&path, "read", &e.to_string()))?;
        let value = serde_json::from_str(&raw)
            .map_err(|e| storage_error(&path, "parse", &e.to_string()))?;
        Ok(Some(value))
    }

    /// Persist `value` under `key`, creating the data directory on first use.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> AppResult<()> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| storage_error(&self.dir, "create", &e.to_string()))?;
        let path = self.path_for(key);
        let raw = serde_json::to_string_pretty(value)
            .map_err(|e| storage_error(&path, "serialize", &e.to_string()))?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, raw).map_err(|e| storage_error(&tmp, "write", &e.to_string()))?;
        fs::rename(&tmp, &path).map_err(|e| storage_error(&path, "commit", &e.to_string()))?;
        Ok(())
    }

    /// Delete the value stored under `key`. Removing an absent key is a no-op.
    pub fn remove(&self, key: &str) -> AppResult<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error(&path, "remove", &e.to_string())),
        }
    }
}

fn storage_error(path: &Path, op: &str, detail: &str) -> AppError {
    AppError::Storage(format!("{} {}: {}", op, path.display(), detail))
}
