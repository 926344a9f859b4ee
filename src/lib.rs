//! Bookshelf: a client for a personal library backend.
//!
//! Bookshelf talks to a REST backend that stores a user's books and provides:
//! - Session lifecycle with persisted bearer tokens and a single global 401 handler
//! - A paginated book list with server-side search
//! - Page-local genre filtering and sorting over the fetched page
//! - Create, update and confirmed delete of books
//! - A line-oriented terminal shell driving all of the above

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Terminal Shell (main.rs)                           │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← Shell state machine
//! │  - Command parsing                                  │
//! │  - Event handling                                   │
//! │  - Action dispatching                               │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Session       │   │ Book List     │
//! │ (ui/)         │   │ (session/)    │   │ (books/)      │
//! │ - Rendering   │   │ - Auth state  │   │ - Query/fetch │
//! │ - Components  │   │ - 401 handler │   │ - Derived view│
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                             │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  API Client (api/)        Storage (storage/)        │
//! │  - Typed endpoints        - Token + user slot       │
//! │  - reqwest transport      - JSON file / in-memory   │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain (domain/), Infrastructure, Observability    │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`api`]: Transport seam, `reqwest` transport and typed endpoint client
//! - [`app`]: Shell state machine with event/action model
//! - [`books`]: Book list controller and the derived view
//! - [`domain`]: Core types (users, books, queries, errors)
//! - [`infrastructure`]: Platform paths
//! - [`observability`]: JSON log file setup
//! - [`session`]: Session store and global 401 handling
//! - [`storage`]: Persistent key/value slot for credentials
//! - [`ui`]: Plain-text rendering
//!
//! # Configuration
//!
//! Read from `$BOOKSHELF_CONFIG` or `<config dir>/config.toml`:
//!
//! ```toml
//! api_base_url = "http://localhost:3000/api"
//! page_size = 10
//! request_timeout_secs = 30
//! data_dir = "~/.local/share/bookshelf"
//! trace_level = "debug"
//! ```
//!
//! `BOOKSHELF_API_URL`, `BOOKSHELF_PAGE_SIZE`, `BOOKSHELF_DATA_DIR` and
//! `BOOKSHELF_TRACE_LEVEL` override the file.
//!
//! # Examples
//!
//! ```rust,no_run
//! use bookshelf::{initialize, Config};
//! use bookshelf::domain::QueryPatch;
//!
//! # async fn run() -> bookshelf::Result<()> {
//! let library = initialize(&Config::load()?)?;
//! library.session.restore().await;
//! if !library.session.is_authenticated() {
//!     library.session.login("ada@example.com", "secret1").await?;
//! }
//! library.books.set_query(QueryPatch::search("dune")).await?;
//! for book in library.books.derived_view() {
//!     println!("{} by {}", book.title, book.author);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod app;
pub mod books;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod session;
pub mod storage;
pub mod ui;

pub use app::{handle_event, Action, Event, InputMode, Screen, ShellState};
pub use books::BookListController;
pub use domain::{LibraryError, Result};
pub use session::{SessionEvent, SessionState, SessionStore};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use api::{ReqwestTransport, Transport};
use storage::{JsonStorage, Storage};

/// Default backend location.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";

/// Default number of books requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Name of the persisted credentials file inside the data directory.
pub const SESSION_FILE_NAME: &str = "session.json";

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Backend base URL; endpoint paths are appended to it.
    pub api_base_url: String,

    /// Books per page. Must be at least 1. Default: 10
    pub page_size: u32,

    /// Per-request timeout in seconds. Default: 30
    pub request_timeout_secs: u64,

    /// Where the session file and logs live. Defaults to the platform data
    /// directory. A leading `~` is expanded.
    pub data_dir: Option<PathBuf>,

    /// Log filter when `RUST_LOG` is unset.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`, or any `EnvFilter`
    /// directive. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout_secs: 30,
            data_dir: None,
            trace_level: None,
        }
    }
}

impl Config {
    /// Loads the config file (if any) and applies environment overrides.
    ///
    /// The result is not validated, so callers can layer further overrides
    /// first and then call [`Config::validate`].
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Config`] if the file exists but cannot be
    /// parsed.
    pub fn load() -> Result<Self> {
        let path = std::env::var_os("BOOKSHELF_CONFIG")
            .map(PathBuf::from)
            .or_else(|| infrastructure::config_dir().map(|dir| dir.join("config.toml")));

        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parses a TOML config file. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Config`] on unreadable or malformed files.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| LibraryError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&text)
    }

    /// # Errors
    ///
    /// Returns [`LibraryError::Config`] on malformed TOML or unknown keys.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| LibraryError::Config(e.to_string()))
    }

    /// Builds a config from string pairs, e.g. parsed `--key=value` flags.
    ///
    /// Recognized keys: `api_url`, `page_size`, `timeout`, `data_dir`,
    /// `trace_level`. Unparseable numbers fall back to the defaults.
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use bookshelf::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("api_url".to_string(), "https://books.example.com/api".to_string());
    /// map.insert("page_size".to_string(), "25".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.api_base_url, "https://books.example.com/api");
    /// assert_eq!(config.page_size, 25);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let mut config = Self::default();
        config.merge_map(map);
        config
    }

    /// Overlays recognized keys from `map` onto this config.
    pub fn merge_map(&mut self, map: &BTreeMap<String, String>) {
        if let Some(url) = map.get("api_url").map(|s| s.trim()).filter(|s| !s.is_empty()) {
            self.api_base_url = url.to_string();
        }
        if let Some(size) = parse_number::<u32>(map, "page_size") {
            self.page_size = size;
        }
        if let Some(secs) = parse_number::<u64>(map, "timeout") {
            self.request_timeout_secs = secs;
        }
        if let Some(dir) = map.get("data_dir").map(|s| s.trim()).filter(|s| !s.is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(level) = map.get("trace_level").map(|s| s.trim()).filter(|s| !s.is_empty()) {
            self.trace_level = Some(level.to_string());
        }
    }

    /// Applies `BOOKSHELF_*` overrides looked up through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let map: BTreeMap<String, String> = [
            ("BOOKSHELF_API_URL", "api_url"),
            ("BOOKSHELF_PAGE_SIZE", "page_size"),
            ("BOOKSHELF_DATA_DIR", "data_dir"),
            ("BOOKSHELF_TRACE_LEVEL", "trace_level"),
        ]
        .into_iter()
        .filter_map(|(var, key)| lookup(var).map(|value| (key.to_string(), value)))
        .collect();
        self.merge_map(&map);
    }

    /// # Errors
    ///
    /// Returns [`LibraryError::Config`] for a zero page size or a base URL
    /// that is not an absolute http(s) URL.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(LibraryError::Config("page_size must be at least 1".into()));
        }
        let url = url::Url::parse(&self.api_base_url)
            .map_err(|e| LibraryError::Config(format!("api_base_url: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(LibraryError::Config(format!(
                "api_base_url must use http or https, got `{}`",
                url.scheme()
            )));
        }
        Ok(())
    }

    /// Resolved data directory.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Config`] when neither `data_dir` is set nor a
    /// platform data directory exists.
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(infrastructure::expand_tilde(&dir.to_string_lossy())),
            None => infrastructure::data_dir()
                .ok_or_else(|| LibraryError::Config("no data directory available".into())),
        }
    }

    /// Path of the persisted credentials file.
    ///
    /// # Errors
    ///
    /// See [`Config::data_dir`].
    pub fn session_file(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(SESSION_FILE_NAME))
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Parses `key` from `map`, warning about values that are not numbers.
fn parse_number<T: std::str::FromStr>(map: &BTreeMap<String, String>, key: &str) -> Option<T> {
    let raw = map.get(key)?.trim();
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring non-numeric config value");
            None
        }
    }
}

/// The session store and book list controller, sharing one API client.
#[derive(Clone)]
pub struct Library {
    pub session: SessionStore,
    pub books: Arc<BookListController>,
}

impl Library {
    /// Wires the stores over an arbitrary storage slot and transport.
    #[must_use]
    pub fn new(storage: Box<dyn Storage>, transport: Arc<dyn Transport>, page_size: u32) -> Self {
        let session = SessionStore::new(storage, transport);
        let books = Arc::new(BookListController::new(session.api(), page_size));
        Self { session, books }
    }

    /// Builds a `reqwest` transport from `config` over the given storage.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Config`] for an invalid base URL or HTTP
    /// client setup failure.
    pub fn connect(config: &Config, storage: Box<dyn Storage>) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(&config.api_base_url, config.request_timeout())?;
        Ok(Self::new(storage, Arc::new(transport), config.page_size))
    }
}

/// Builds a [`Library`] persisting credentials to the session file in the
/// data directory.
///
/// # Errors
///
/// Returns an error if the config is invalid or the session file cannot be
/// opened.
pub fn initialize(config: &Config) -> Result<Library> {
    let path = config.session_file()?;
    tracing::debug!(
        api = %config.api_base_url,
        session_file = %path.display(),
        page_size = config.page_size,
        "initializing bookshelf"
    );
    let storage = JsonStorage::new(path)?;
    Library::connect(config, Box::new(storage))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_backend() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://localhost:3000/api");
        assert_eq!(config.page_size, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn toml_keeps_defaults_for_missing_keys() {
        let config = Config::from_toml("page_size = 20\ntrace_level = \"debug\"").unwrap();
        assert_eq!(config.page_size, 20);
        assert_eq!(config.trace_level.as_deref(), Some("debug"));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn toml_rejects_unknown_keys() {
        assert!(matches!(
            Config::from_toml("pagesize = 20"),
            Err(LibraryError::Config(_))
        ));
    }

    #[test]
    fn environment_overrides_file_values() {
        let mut config = Config::from_toml("page_size = 20").unwrap();
        config.apply_overrides(|key| match key {
            "BOOKSHELF_PAGE_SIZE" => Some("5".into()),
            "BOOKSHELF_DATA_DIR" => Some("/tmp/books".into()),
            _ => None,
        });
        assert_eq!(config.page_size, 5);
        assert_eq!(config.session_file().unwrap(), PathBuf::from("/tmp/books/session.json"));
    }

    #[test]
    fn bad_numbers_in_map_keep_defaults() {
        let mut map = BTreeMap::new();
        map.insert("page_size".to_string(), "lots".to_string());
        assert_eq!(Config::from_map(&map).page_size, DEFAULT_PAGE_SIZE);
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn non_numeric_override_is_logged() {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let config = tracing::subscriber::with_default(subscriber, || {
            let mut config = Config::default();
            config.apply_overrides(|key| (key == "BOOKSHELF_PAGE_SIZE").then(|| "abc".to_string()));
            config
        });

        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        let output = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("ignoring non-numeric config value"), "log was {output:?}");
        assert!(output.contains("page_size"));
    }

    #[test]
    fn invalid_environment_url_can_be_replaced_before_validation() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == "BOOKSHELF_API_URL").then(|| "not a url".to_string()));
        assert!(config.validate().is_err());

        let mut flags = BTreeMap::new();
        flags.insert("api_url".to_string(), "https://books.example.com/api".to_string());
        config.merge_map(&flags);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_page_size_and_bad_urls() {
        let zero = Config {
            page_size: 0,
            ..Config::default()
        };
        assert!(zero.validate().is_err());

        let ftp = Config {
            api_base_url: "ftp://books.example.com".into(),
            ..Config::default()
        };
        assert!(ftp.validate().is_err());
    }
}
