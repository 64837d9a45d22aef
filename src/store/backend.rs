//! Persistence backends for ledger snapshots.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use super::snapshot::Snapshot;
use crate::error::{LedgerError, LedgerResult};

/// Somewhere a snapshot can be loaded from and saved to.
pub trait SnapshotStore: fmt::Debug + Send + Sync {
    /// Loads the stored snapshot, or `None` if nothing has been saved yet.
    fn load(&self) -> LedgerResult<Option<Snapshot>>;

    /// Replaces the stored snapshot.
    fn save(&self, snapshot: &Snapshot) -> LedgerResult<()>;

    /// A short description for logs, such as the file path.
    fn location(&self) -> String;
}

/// Keeps the last saved snapshot in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    saved: Mutex<Option<Snapshot>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> LedgerResult<Option<Snapshot>> {
        let saved = self.saved.lock().map_err(|_| LedgerError::Storage {
            path: self.location(),
            message: "memory store lock poisoned".to_string(),
        })?;
        Ok(saved.clone())
    }

    fn save(&self, snapshot: &Snapshot) -> LedgerResult<()> {
        let mut saved = self.saved.lock().map_err(|_| LedgerError::Storage {
            path: self.location(),
            message: "memory store lock poisoned".to_string(),
        })?;
        *saved = Some(snapshot.clone());
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

/// Stores the snapshot as a pretty-printed JSON file.
///
/// Saves write a sibling `.tmp` file and rename it over the target, so a
/// crash mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store backed by the file at `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The file this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn storage_error(&self, message: impl fmt::Display) -> LedgerError {
        LedgerError::Storage {
            path: self.location(),
            message: message.to_string(),
        }
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> LedgerResult<Option<Snapshot>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No snapshot file yet");
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).map_err(|e| self.storage_error(e))?;
        let snapshot = serde_json::from_str(&content).map_err(|e| self.storage_error(e))?;
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &Snapshot) -> LedgerResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.storage_error(e))?;
            }
        }

        let body = serde_json::to_vec_pretty(snapshot).map_err(|e| self.storage_error(e))?;
        let temp = self.temp_path();
        fs::write(&temp, body).map_err(|e| self.storage_error(e))?;
        fs::rename(&temp, &self.path).map_err(|e| self.storage_error(e))?;

        debug!(path = %self.path.display(), "Snapshot saved");
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Department;

    fn sample_snapshot() -> Snapshot {
        let mut snapshot = Snapshot::default();
        snapshot.departments.push(Department {
            id: "dep_001".to_string(),
            name: "Binding".to_string(),
            description: "Finishing and binding".to_string(),
        });
        snapshot
    }

    #[test]
    fn test_memory_store_starts_empty() {
        let store = MemoryStore::new();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_memory_store_keeps_last_save() {
        let store = MemoryStore::new();
        store.save(&sample_snapshot()).unwrap();
        assert_eq!(store.load().unwrap(), Some(sample_snapshot()));
    }

    #[test]
    fn test_json_file_missing_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("ledger.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_json_file_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("data").join("ledger.json"));

        store.save(&sample_snapshot()).unwrap();

        assert!(store.path().exists());
        assert!(!store.temp_path().exists());
        assert_eq!(store.load().unwrap(), Some(sample_snapshot()));
    }

    #[test]
    fn test_json_file_corrupt_content_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        fs::write(&path, "{ not json").unwrap();

        let result = JsonFileStore::new(&path).load();
        match result {
            Err(LedgerError::Storage { path: p, .. }) => assert!(p.ends_with("ledger.json")),
            other => panic!("Expected Storage error, got {:?}", other),
        }
    }
}
