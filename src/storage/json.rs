//! JSON file-based storage backend.
//!
//! Entries are kept in memory and flushed with an atomic write (write-to-temp +
//! rename) after every modification, so a crash never leaves a half-written
//! credentials file behind.

use crate::domain::error::{LibraryError, Result};
use crate::storage::backend::Storage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// On-disk container format.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageData {
    /// Version of the storage format for future migrations.
    version: u32,

    #[serde(default)]
    entries: BTreeMap<String, String>,
}

impl Default for StorageData {
    fn default() -> Self {
        Self {
            version: 1,
            entries: BTreeMap::new(),
        }
    }
}

/// JSON file storage backend.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "entries": {
///     "authToken": "eyJhbGciOi...",
///     "user": "{\"id\":\"u1\",\"email\":\"ada@example.com\",...}"
///   }
/// }
/// ```
pub struct JsonStorage {
    file_path: PathBuf,
    data: StorageData,
    /// Tracks if data has been modified since last save.
    dirty: bool,
}

impl JsonStorage {
    /// Creates or opens a JSON storage file.
    ///
    /// Parent directories are created automatically. A file that exists but does
    /// not parse is treated as empty and overwritten on the next write.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the file
    /// exists but cannot be read.
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "initializing JSON storage");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("initializing new empty storage");
            StorageData::default()
        };

        tracing::debug!(entry_count = data.entries.len(), "storage initialized");

        Ok(Self {
            file_path,
            data,
            dirty: false,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_file(path: &Path) -> Result<StorageData> {
        let contents = std::fs::read_to_string(path)?;
        match serde_json::from_str::<StorageData>(&contents) {
            Ok(data) => {
                tracing::debug!(
                    version = data.version,
                    entries = data.entries.len(),
                    "loaded storage data"
                );
                Ok(data)
            }
            Err(e) => {
                tracing::warn!(error = %e, path = ?path, "discarding unreadable storage file");
                Ok(StorageData::default())
            }
        }
    }

    /// Saves storage data to disk using atomic write.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary file cannot be written or renamed.
    fn save_to_file(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }

        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| LibraryError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        tracing::debug!(path = ?self.file_path, "storage saved");
        Ok(())
    }

    // Rolls the in-memory copy back when a flush fails.
    fn commit(&mut self, previous: StorageData) -> Result<()> {
        if let Err(e) = self.save_to_file() {
            self.data = previous;
            self.dirty = false;
            return Err(e);
        }
        Ok(())
    }
}

impl Storage for JsonStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.entries.get(key).cloned())
    }

    fn put_all(&mut self, entries: &[(&str, &str)]) -> Result<()> {
        let _span = tracing::debug_span!("json_put_all", count = entries.len()).entered();

        let previous = self.data.clone();
        for (key, value) in entries {
            self.data.entries.insert((*key).to_string(), (*value).to_string());
        }
        self.dirty = true;
        self.commit(previous)
    }

    fn remove_all(&mut self, keys: &[&str]) -> Result<()> {
        let _span = tracing::debug_span!("json_remove_all", count = keys.len()).entered();

        let previous = self.data.clone();
        let mut removed = 0usize;
        for key in keys {
            if self.data.entries.remove(*key).is_some() {
                removed += 1;
            }
        }
        if removed == 0 {
            return Ok(());
        }
        self.dirty = true;
        tracing::debug!(removed, "entries removed");
        self.commit(previous)
    }
}

impl Drop for JsonStorage {
    fn drop(&mut self) {
        if self.dirty {
            tracing::debug!("saving dirty data on drop");
            if let Err(e) = self.save_to_file() {
                tracing::error!(error = %e, "failed to save on drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let mut storage = JsonStorage::new(path.clone()).unwrap();
        storage.put_all(&[("authToken", "t1"), ("user", "{}")]).unwrap();
        drop(storage);

        let reopened = JsonStorage::new(path).unwrap();
        assert_eq!(reopened.get("authToken").unwrap().as_deref(), Some("t1"));
        assert_eq!(reopened.get("user").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn remove_all_clears_both_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut storage = JsonStorage::new(path.clone()).unwrap();
        storage.put_all(&[("authToken", "t1"), ("user", "{}")]).unwrap();
        storage.remove_all(&["authToken", "user"]).unwrap();
        drop(storage);

        let reopened = JsonStorage::new(path).unwrap();
        assert_eq!(reopened.get("authToken").unwrap(), None);
        assert_eq!(reopened.get("user").unwrap(), None);
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let storage = JsonStorage::new(path).unwrap();
        assert_eq!(storage.get("authToken").unwrap(), None);
    }

    #[test]
    fn no_temp_file_left_after_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut storage = JsonStorage::new(path.clone()).unwrap();
        storage.put_all(&[("authToken", "t1")]).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }
}
