//! Tracing initialization and subscriber setup.
//!
//! Configures a `tracing-subscriber` registry that filters by level and
//! writes one JSON object per event to a rotating file in the data
//! directory. The terminal stays free for the shell's own output.

use super::file_writer::RotatingFile;
use crate::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// File name of the log inside the data directory.
pub const LOG_FILE_NAME: &str = "bookshelf.log";

/// Initializes the global tracing subscriber.
///
/// # Level Resolution
///
/// 1. `RUST_LOG` environment variable
/// 2. `config.trace_level`
/// 3. Default: `"info"`
///
/// # Initialization Behavior
///
/// - Creates the data directory if it doesn't exist
/// - Silently returns if no data directory is available (logging is optional)
/// - Idempotent: only the first call installs a subscriber
pub fn init_tracing(config: &Config) {
    let Ok(data_dir) = config.data_dir() else {
        return;
    };
    if std::fs::create_dir_all(&data_dir).is_err() {
        return;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = config.trace_level.as_deref().unwrap_or("info");
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
    });

    let log_file = RotatingFile::new(data_dir.join(LOG_FILE_NAME));
    let file_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(false)
        .with_target(true)
        .with_ansi(false)
        .with_writer(move || log_file.clone());

    let subscriber = tracing_subscriber::registry().with(filter).with(file_layer);

    if subscriber.try_init().is_ok() {
        tracing::debug!(path = %data_dir.join(LOG_FILE_NAME).display(), "tracing initialized");
    }
}
