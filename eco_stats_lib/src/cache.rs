//! Disk cache for API responses.
//!
//! Each entry is one pretty-printed JSON file `{dir}/{key}.json`. There is
//! no expiry and no locking: the last writer wins and reads load whatever
//! file is on disk.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;

use crate::error::EcoStatsError;

/// Longest accepted key, leaving room for the `.json` suffix within common
/// filename limits.
pub const MAX_KEY_LENGTH: usize = 200;

/// JSON response cache rooted at one directory.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: PathBuf,
}

impl ResponseCache {
    /// Cache rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File an entry for `key` is stored in.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, EcoStatsError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }

    /// Writes `value` under `key`, replacing any existing entry.
    pub fn store<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<PathBuf, EcoStatsError> {
        let path = self.path_for(key)?;
        let json = serde_json::to_string_pretty(value)?;

        fs::create_dir_all(&self.dir)?;
        // Dropping the temp file on any error path deletes it.
        let mut file = NamedTempFile::new_in(&self.dir)?;
        file.write_all(json.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&path).map_err(|e| e.error)?;

        tracing::debug!("Cached response under key {}", key);
        Ok(path)
    }

    /// Reads the entry for `key`. `Ok(None)` means there is no entry.
    pub fn load(&self, key: &str) -> Result<Option<Value>, EcoStatsError> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)?;
        let value = serde_json::from_str(&contents)?;
        Ok(Some(value))
    }

    /// Writes `value` under a key derived from its content and returns the key.
    pub fn store_auto<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, EcoStatsError> {
        let key = content_key(value)?;
        self.store(&key, value)?;
        Ok(key)
    }

    /// Removes the entry for `key`. Returns whether one existed.
    pub fn remove(&self, key: &str) -> Result<bool, EcoStatsError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// SHA-256 hex digest of the compact JSON serialization of `value`, with
/// object keys sorted so equal values hash equally.
pub fn content_key<T: Serialize + ?Sized>(value: &T) -> Result<String, EcoStatsError> {
    let canonical = canonicalize(serde_json::to_value(value)?).to_string();
    Ok(hex::encode(Sha256::digest(canonical.as_bytes())))
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, canonicalize(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

/// Keys become file names: non-empty, at most [`MAX_KEY_LENGTH`] bytes,
/// only `[A-Za-z0-9._-]`, and not starting with `.`.
pub fn validate_key(key: &str) -> Result<(), EcoStatsError> {
    if key.is_empty() {
        return Err(EcoStatsError::InvalidArgument(
            "cache key must not be empty".to_string(),
        ));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(EcoStatsError::InvalidArgument(format!(
            "cache key exceeds {} characters",
            MAX_KEY_LENGTH
        )));
    }
    if key.starts_with('.') {
        return Err(EcoStatsError::InvalidArgument(format!(
            "cache key '{}' must not start with '.'",
            key
        )));
    }
    if let Some(bad) = key
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
    {
        return Err(EcoStatsError::InvalidArgument(format!(
            "cache key '{}' contains invalid character '{}'",
            key, bad
        )));
    }
    Ok(())
}
