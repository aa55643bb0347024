//! Key-value persistence backends

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::StorageError;

/// String key-value store the viewer persists its state into
pub trait KeyValueStore: Send {
    /// Read a value
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value (absent keys are not an error)
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory store
///
/// Clones share the same map, so a handle kept outside the coordinator sees
/// every write.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// Store backed by a single JSON object on disk
///
/// Every write rewrites the file atomically (temp file, then rename).
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open a store, starting empty if the file is missing or unreadable as JSON
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Ignoring malformed store file");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self { path, entries })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(&self.entries)?;
        let temp_path = self.path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_clones_share_entries() {
        let mut store = MemoryStore::new();
        let observer = store.clone();

        store.set("nvr.page", "2").unwrap();
        assert_eq!(observer.get("nvr.page").as_deref(), Some("2"));

        store.remove("nvr.page").unwrap();
        store.remove("nvr.page").unwrap();
        assert!(observer.is_empty());
    }

    #[test]
    fn test_file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("viewer.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        assert!(store.get("nvr.layout").is_none());
        store.set("nvr.layout", "grid3").unwrap();
        store.set("nvr.page", "1").unwrap();
        store.remove("nvr.page").unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("nvr.layout").as_deref(), Some("grid3"));
        assert!(reopened.get("nvr.page").is_none());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_file_store_malformed_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.json");
        fs::write(&path, "{not json").unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        assert!(store.get("anything").is_none());
    }
}
