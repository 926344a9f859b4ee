//! Storage backend abstraction.
//!
//! This module defines the [`Storage`] trait, a small string key-value store. The
//! session layer writes its entries in groups so a token is never persisted
//! without the user it belongs to.

use crate::domain::error::Result;

/// Abstraction over persistent key-value backends.
///
/// # Implementations
///
/// - [`JsonStorage`](crate::storage::JsonStorage): JSON file with atomic writes (default)
/// - [`MemoryStorage`](crate::storage::MemoryStorage): process memory only
///
/// # Examples
///
/// ```no_run
/// use bookshelf::storage::{Storage, JsonStorage};
/// use std::path::PathBuf;
///
/// let mut storage = JsonStorage::new(PathBuf::from("/tmp/bookshelf/session.json"))?;
/// storage.put_all(&[("authToken", "abc"), ("user", "{}")])?;
/// assert_eq!(storage.get("authToken")?.as_deref(), Some("abc"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Storage: Send {
    /// Reads a single entry. Returns `Ok(None)` if the key was never written.
    ///
    /// # Errors
    ///
    /// Returns an error if the read operation fails.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes every pair in one operation.
    ///
    /// # Errors
    ///
    /// Returns an error if the entries cannot be persisted. Backends leave the
    /// previous contents in place when that happens.
    fn put_all(&mut self, entries: &[(&str, &str)]) -> Result<()>;

    /// Removes every listed key in one operation. Missing keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the removal cannot be persisted.
    fn remove_all(&mut self, keys: &[&str]) -> Result<()>;
}
