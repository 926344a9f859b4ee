//! Infrastructure layer for filesystem and environment interactions.
//!
//! Resolves the per-user config and data directories and expands `~` in
//! user-supplied paths.

pub mod paths;

pub use paths::{config_dir, data_dir, expand_tilde, APP_NAME};
