//! In-memory storage backend.

use std::collections::HashMap;

use crate::domain::error::Result;
use crate::storage::backend::Storage;

/// Storage that forgets everything when dropped.
///
/// Used by tests and by `--ephemeral` runs of the shell.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with `entries`.
    #[must_use]
    pub fn with_entries(entries: &[(&str, &str)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put_all(&mut self, entries: &[(&str, &str)]) -> Result<()> {
        for (key, value) in entries {
            self.entries.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }

    fn remove_all(&mut self, keys: &[&str]) -> Result<()> {
        for key in keys {
            self.entries.remove(*key);
        }
        Ok(())
    }
}
