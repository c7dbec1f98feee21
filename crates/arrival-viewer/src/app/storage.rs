//! Key/value storage used by the access gate.
//!
//! - `FileStorage`: a single JSON file holding a map of string keys to string
//!   values, located in a per-user configuration directory and written
//!   synchronously on every change.
//! - `MemoryStorage`: process-lifetime storage, used when no file can be
//!   opened.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("Platform storage error: {0}")]
    Platform(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Keys and values are UTF-8 strings.
pub trait StorageBackend: Send + Sync {
    /// Store a string value for a key.
    fn set_string(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Read a string value for a key. Returns Ok(None) when key is missing.
    fn get_string(&self, key: &str) -> StorageResult<Option<String>>;
}

fn lock<'a>(
    inner: &'a Mutex<HashMap<String, String>>,
) -> StorageResult<std::sync::MutexGuard<'a, HashMap<String, String>>> {
    inner
        .lock()
        .map_err(|e| StorageError::Platform(format!("mutex poisoned: {:?}", e)))
}

pub struct FileStorage {
    /// Path to the backing JSON file.
    path: PathBuf,
    /// In-memory copy of key -> value
    inner: Mutex<HashMap<String, String>>,
}

impl FileStorage {
    /// Default storage file for the current user:
    /// - On Windows: %APPDATA%/Arrival/storage.json
    /// - Else: $HOME/.config/arrival/storage.json
    pub fn default_storage_path() -> PathBuf {
        if cfg!(windows)
            && let Ok(appdata) = std::env::var("APPDATA")
        {
            return Path::new(&appdata).join("Arrival").join("storage.json");
        }

        if let Ok(home) = std::env::var("HOME") {
            return Path::new(&home)
                .join(".config")
                .join("arrival")
                .join("storage.json");
        }

        Path::new(".").join("arrival-storage.json")
    }

    pub fn open(path: Option<PathBuf>) -> StorageResult<Self> {
        let path = path.unwrap_or_else(Self::default_storage_path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                StorageError::Io(format!("Failed to create storage parent directory: {}", e))
            })?;
        }

        let mut map = HashMap::new();
        if path.exists() {
            let s = fs::read_to_string(&path)
                .map_err(|e| StorageError::Io(format!("Failed to read storage file: {}", e)))?;
            if !s.trim().is_empty() {
                map = serde_json::from_str::<HashMap<String, String>>(&s).map_err(|e| {
                    StorageError::Json(format!("Failed to parse storage JSON: {}", e))
                })?;
            }
        }

        Ok(FileStorage {
            path,
            inner: Mutex::new(map),
        })
    }

    fn flush_locked(&self, locked: &HashMap<String, String>) -> StorageResult<()> {
        let s =
            serde_json::to_string_pretty(locked).map_err(|e| StorageError::Json(e.to_string()))?;
        fs::write(&self.path, s).map_err(|e| StorageError::Io(format!("write failed: {}", e)))
    }
}

impl StorageBackend for FileStorage {
    fn set_string(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut guard = lock(&self.inner)?;
        guard.insert(key.to_string(), value.to_string());
        self.flush_locked(&guard)
    }

    fn get_string(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(lock(&self.inner)?.get(key).cloned())
    }
}

#[derive(Default)]
pub struct MemoryStorage {
    inner: Mutex<HashMap<String, String>>,
}

impl StorageBackend for MemoryStorage {
    fn set_string(&self, key: &str, value: &str) -> StorageResult<()> {
        lock(&self.inner)?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get_string(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(lock(&self.inner)?.get(key).cloned())
    }
}

/// File storage at `path` (or the default location), falling back to memory
pub fn open_storage(path: Option<PathBuf>) -> Box<dyn StorageBackend> {
    match FileStorage::open(path) {
        Ok(storage) => {
            tracing::debug!("Using storage file {}", storage.path.display());
            Box::new(storage)
        }
        Err(e) => {
            tracing::warn!("Storage unavailable ({e}); access will not be remembered");
            Box::new(MemoryStorage::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let storage = FileStorage::open(Some(path.clone())).unwrap();
        storage.set_string("arrival_auth_token", "valid").unwrap();

        let reopened = FileStorage::open(Some(path)).unwrap();
        assert_eq!(
            reopened.get_string("arrival_auth_token").unwrap().as_deref(),
            Some("valid")
        );
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            FileStorage::open(Some(path)),
            Err(StorageError::Json(_))
        ));
    }

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::default();
        assert_eq!(storage.get_string("k").unwrap(), None);
        storage.set_string("k", "v").unwrap();
        assert_eq!(storage.get_string("k").unwrap().as_deref(), Some("v"));
    }
}
