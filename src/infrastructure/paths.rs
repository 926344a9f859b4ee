//! Platform directory lookup.
//!
//! Built on the `directories` crate, so the locations follow each platform's
//! conventions (XDG on Linux, `~/Library/Application Support` on macOS,
//! `%APPDATA%` on Windows).

use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

/// Directory name used under the platform config and data roots.
pub const APP_NAME: &str = "bookshelf";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APP_NAME)
}

/// Returns the data directory holding the session file and logs.
///
/// Typically `~/.local/share/bookshelf` on Linux. `None` when no home
/// directory can be determined.
#[must_use]
pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

/// Returns the directory searched for `config.toml`.
///
/// Typically `~/.config/bookshelf` on Linux.
#[must_use]
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a tilde, and tilde paths when no home directory is known,
/// are returned unchanged.
///
/// ```
/// use bookshelf::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/absolute/path").to_str(), Some("/absolute/path"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    let home = BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
    match (path, home) {
        ("~", Some(home)) => home,
        (p, Some(home)) if p.starts_with("~/") => home.join(&p[2..]),
        (p, _) => PathBuf::from(p),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_paths_pass_through() {
        assert_eq!(expand_tilde("/var/lib/books"), PathBuf::from("/var/lib/books"));
        assert_eq!(expand_tilde("relative/dir"), PathBuf::from("relative/dir"));
    }

    #[test]
    fn tilde_is_replaced_with_home() {
        let Some(home) = BaseDirs::new().map(|d| d.home_dir().to_path_buf()) else {
            return;
        };
        assert_eq!(expand_tilde("~"), home);
        assert_eq!(expand_tilde("~/books"), home.join("books"));
    }

    #[test]
    fn directories_end_with_app_name() {
        if let Some(dir) = data_dir() {
            assert!(dir.to_string_lossy().contains(APP_NAME));
        }
        if let Some(dir) = config_dir() {
            assert!(dir.to_string_lossy().contains(APP_NAME));
        }
    }
}
