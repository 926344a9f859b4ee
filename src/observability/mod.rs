//! Structured logging to a rotating JSON file.
//!
//! ```text
//! tracing macros → EnvFilter → fmt JSON layer → RotatingFile → bookshelf.log
//! ```
//!
//! # Features
//!
//! - **File-Based Output**: events written to `<data dir>/bookshelf.log`
//! - **Automatic Rotation**: files rotate at 10MB with 3-backup retention
//! - **Span Context**: each line carries the enclosing span and its fields
//!
//! # Configuration
//!
//! Level is controlled via:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` in the config file or `BOOKSHELF_TRACE_LEVEL`
//! 3. Default: `"info"`
//!
//! # Usage
//!
//! ```rust,no_run
//! use bookshelf::observability::init_tracing;
//! use bookshelf::Config;
//!
//! let config = Config::default();
//! init_tracing(&config);
//!
//! tracing::debug!("shell started");
//! ```

mod file_writer;
mod init;

pub use file_writer::{RotatingFile, MAX_BACKUP_FILES, MAX_FILE_SIZE_BYTES};
pub use init::{init_tracing, LOG_FILE_NAME};
