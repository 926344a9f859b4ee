//! Rotating log file with size-based rotation and backup retention.
//!
//! [`RotatingFile`] is a cheap, cloneable handle to one log file. It
//! implements [`std::io::Write`], so a closure returning a clone satisfies
//! `tracing_subscriber`'s `MakeWriter` and every formatted event lands in the
//! same file.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Maximum file size before rotation (10 MB).
pub const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Number of backup files to retain after rotation.
pub const MAX_BACKUP_FILES: usize = 3;

/// Shared handle to a size-rotated log file.
///
/// # Rotation Strategy
///
/// 1. Check file size before each write
/// 2. If size exceeds the limit, rotate:
///    - Rename current file to `<name>.<unix timestamp>`
///    - Reopen an empty file on the next write
///    - Remove the oldest backups beyond the retention count
#[derive(Clone)]
pub struct RotatingFile {
    inner: Arc<Inner>,
}

struct Inner {
    path: PathBuf,
    max_bytes: u64,
    max_backups: usize,
    /// Lazily opened on first write.
    file: Mutex<Option<File>>,
}

impl RotatingFile {
    /// Creates a writer for `path` with the default limits. The file is not
    /// opened until the first write.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self::with_limits(path, MAX_FILE_SIZE_BYTES, MAX_BACKUP_FILES)
    }

    #[must_use]
    pub fn with_limits(path: PathBuf, max_bytes: u64, max_backups: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                path,
                max_bytes,
                max_backups,
                file: Mutex::new(None),
            }),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Writes one line with automatic rotation, flushing immediately.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if rotation, opening, or writing fails.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut buf = Vec::with_capacity(line.len() + 1);
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');
        self.append(&buf)
    }

    fn append(&self, bytes: &[u8]) -> io::Result<()> {
        let inner = &self.inner;
        let mut guard = inner.file.lock().unwrap_or_else(PoisonError::into_inner);

        inner.check_and_rotate(&mut guard)?;

        if guard.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&inner.path)?;
            *guard = Some(file);
        }

        let file = guard
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "log file unavailable"))?;
        file.write_all(bytes)?;
        file.flush()
    }
}

impl Inner {
    fn check_and_rotate(&self, file: &mut Option<File>) -> io::Result<()> {
        if let Ok(metadata) = fs::metadata(&self.path) {
            if metadata.len() > self.max_bytes {
                *file = None;
                self.rotate()?;
            }
        }
        Ok(())
    }

    fn rotate(&self) -> io::Result<()> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_millis();

        let mut backup = self.path.clone().into_os_string();
        backup.push(format!(".{timestamp}"));

        if self.path.exists() {
            fs::rename(&self.path, PathBuf::from(backup))?;
        }

        self.cleanup_old_backups()
    }

    /// Keeps the newest `max_backups` files named `<name>.<suffix>`; removal
    /// errors are ignored so one stuck file does not stop the rest.
    fn cleanup_old_backups(&self) -> io::Result<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let Some(prefix) = self
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .map(|name| format!("{name}."))
        else {
            return Err(io::Error::new(io::ErrorKind::Other, "invalid log file name"));
        };

        let mut backups: Vec<PathBuf> = fs::read_dir(parent)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(&prefix))
            })
            .collect();

        // Newest first; the suffix is a millisecond timestamp so the name
        // breaks ties between files rotated within one mtime tick.
        backups.sort_by(|a, b| {
            let a_time = fs::metadata(a).and_then(|m| m.modified()).ok();
            let b_time = fs::metadata(b).and_then(|m| m.modified()).ok();
            b_time.cmp(&a_time).then_with(|| b.cmp(a))
        });

        for old in backups.iter().skip(self.max_backups) {
            let _ = fs::remove_file(old);
        }

        Ok(())
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl std::fmt::Debug for RotatingFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingFile")
            .field("path", &self.inner.path)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backups_of(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .filter_map(Result::ok)
            .filter_map(|e| e.file_name().into_string().ok())
            .filter(|n| n.starts_with("app.log."))
            .collect();
        names.sort();
        names
    }

    #[test]
    fn file_is_created_lazily() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let log = RotatingFile::new(path.clone());
        assert!(!path.exists());

        log.write_line(r#"{"level":"INFO"}"#).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"level\":\"INFO\"}\n");
    }

    #[test]
    fn clones_share_the_same_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let log = RotatingFile::new(path.clone());
        let mut other = log.clone();

        log.write_line("one").unwrap();
        other.write_all(b"two\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn oversized_file_is_rotated_and_backups_are_capped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let log = RotatingFile::with_limits(path.clone(), 8, 2);

        for i in 0..6 {
            log.write_line(&format!("line-{i}-padding")).unwrap();
            std::thread::sleep(Duration::from_millis(5));
        }

        assert_eq!(fs::read_to_string(&path).unwrap(), "line-5-padding\n");
        assert_eq!(backups_of(dir.path()).len(), 2);
    }
}
