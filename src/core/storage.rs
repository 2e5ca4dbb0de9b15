//! # Durable Key-Value Storage
//!
//! The client keeps a handful of string values (today only the session id)
//! across runs. `FileStore` keeps them in one JSON object on disk
//! (`~/.faqchat/storage.json` by default); `MemoryStore` keeps them in
//! process and is used by tests and as the fallback when the disk is
//! unavailable.
//!
//! Writes use atomic rename (write `.tmp`, then `rename()`).

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::{debug, warn};

#[derive(Debug)]
pub enum StorageError {
    Io(io::Error),
    /// The storage file exists but is not a JSON object of strings.
    Corrupt(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "storage I/O error: {e}"),
            StorageError::Corrupt(msg) => write!(f, "storage file is corrupt: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<io::Error> for StorageError {
    fn from(e: io::Error) -> Self {
        StorageError::Io(e)
    }
}

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Returns `~/.faqchat/storage.json`.
pub fn default_storage_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".faqchat").join("storage.json"))
}

/// A JSON object of string values persisted to a single file.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let json = fs::read_to_string(&self.path)?;
        if json.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&json).map_err(|e| StorageError::Corrupt(e.to_string()))
    }
}

/// Atomically write `data` as JSON to `path` (via `.tmp` + rename).
fn atomic_write_json(path: &Path, data: &BTreeMap<String, String>) -> Result<(), StorageError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| StorageError::Corrupt(e.to_string()))?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut data = match self.load() {
            Ok(data) => data,
            Err(StorageError::Corrupt(e)) => {
                warn!("Overwriting corrupt storage file {}: {}", self.path.display(), e);
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        data.insert(key.to_string(), value.to_string());
        atomic_write_json(&self.path, &data)?;
        debug!("Stored key '{}' in {}", key, self.path.display());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self
            .values
            .lock()
            .map_err(|e| StorageError::Corrupt(e.to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| StorageError::Corrupt(e.to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
