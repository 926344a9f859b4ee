//! Transport seam between the typed client and the wire.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        })
    }
}

/// A request relative to the configured base URL.
///
/// `path` holds unencoded segments; the transport is responsible for
/// percent-encoding them.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: Vec<String>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn new<I, S>(method: Method, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            path: path.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            body: None,
            bearer: None,
        }
    }

    #[must_use]
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Path joined with `/`, as used in log fields.
    #[must_use]
    pub fn route(&self) -> String {
        format!("/{}", self.path.join("/"))
    }

    /// Value of a query parameter, if present.
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Raw response: HTTP status plus the undecoded body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiReply {
    pub status: u16,
    pub body: String,
}

impl ApiReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Moves one request to the backend.
///
/// Implementations return `Err` only when no response was received at all. Any
/// HTTP status, including errors, comes back as `Ok(ApiReply)`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// # Errors
    ///
    /// Returns [`LibraryError::Network`](crate::domain::LibraryError::Network) when
    /// the request could not be delivered.
    async fn send(&self, request: ApiRequest) -> Result<ApiReply>;
}
