//! Error types for the bookshelf client.
//!
//! This module defines the centralized error type [`LibraryError`] and a type alias
//! [`Result`] used throughout the crate. Variants line up with the scope an error is
//! reported at: field errors go back to the caller, auth failures land in the session
//! state, network and server failures land in the list or form scope of the controller.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Field-scoped validation messages keyed by field name.
///
/// Ordered by field name so the first message is stable regardless of how the
/// checks were run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Records a message for `field`, keeping the first one if the field already failed.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Converts into `Err(LibraryError::Validation)` when any field failed.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Validation`] if at least one message was recorded.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(LibraryError::Validation(self))
        }
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = Self::new();
        for (field, errs) in errors.field_errors() {
            let message = errs
                .iter()
                .find_map(|e| e.message.as_ref().map(ToString::to_string))
                .unwrap_or_else(|| format!("{field} is invalid"));
            fields.add(field.to_string(), message);
        }
        fields
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// The main error type for bookshelf operations.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// Client-side validation rejected the input before any backend call.
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// The backend rejected a login or registration attempt.
    #[error("{0}")]
    Auth(String),

    /// The backend answered 401. The session has already been cleared.
    #[error("Session expired")]
    SessionExpired,

    /// The request never produced an HTTP response.
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Reading or writing persisted credentials failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LibraryError {
    /// Message suitable for showing next to a list or form.
    ///
    /// Server messages are shown as the backend phrased them; everything else
    /// uses the error's display text.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Server { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Whether the error came from a 401 and was already handled by the session layer.
    #[must_use]
    pub const fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }
}

/// A specialized `Result` type for bookshelf operations.
pub type Result<T> = std::result::Result<T, LibraryError>;
