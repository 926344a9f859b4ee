//! Typed client for the bookshelf backend.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use crate::api::page::BookPage;
use crate::api::transport::{ApiReply, ApiRequest, Method, Transport};
use crate::domain::book::{Book, BookDraft};
use crate::domain::error::{LibraryError, Result};
use crate::domain::user::{AuthResponse, LoginRequest, RegisterRequest, User};

/// Session-side callbacks used by [`ApiClient`].
///
/// The client reads the token before every request and reports every 401 it
/// sees. The hook decides what clearing a session means.
pub trait AuthHook: Send + Sync {
    /// Token to send as `Authorization: Bearer`, if one is stored.
    fn bearer_token(&self) -> Option<String>;

    /// Called once per 401 response, before the error is returned.
    fn on_unauthorized(&self);
}

/// Backend client shared by the session store and the book list controller.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    transport: Arc<dyn Transport>,
    hook: Arc<dyn AuthHook>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorMessage {
    One(String),
    Many(Vec<String>),
}

#[derive(Deserialize)]
struct ErrorBody {
    message: ErrorMessage,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, hook: Arc<dyn AuthHook>) -> Self {
        Self {
            inner: Arc::new(ApiClientInner { transport, hook }),
        }
    }

    /// `POST /auth/login`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`] for the status mapping.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse> {
        let request = ApiRequest::new(Method::Post, ["auth", "login"]).json(to_body(credentials)?);
        self.execute_json(request).await
    }

    /// `POST /auth/register`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`] for the status mapping.
    pub async fn register(&self, details: &RegisterRequest) -> Result<AuthResponse> {
        let request = ApiRequest::new(Method::Post, ["auth", "register"]).json(to_body(details)?);
        self.execute_json(request).await
    }

    /// `GET /auth/profile`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`] for the status mapping.
    pub async fn profile(&self) -> Result<User> {
        self.execute_json(ApiRequest::new(Method::Get, ["auth", "profile"]))
            .await
    }

    /// `GET /books?page&limit&search`, normalized to a [`BookPage`].
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`] for the status mapping.
    pub async fn list_books(&self, page: u32, limit: u32, search: Option<&str>) -> Result<BookPage> {
        let mut request = ApiRequest::new(Method::Get, ["books"])
            .query("page", page)
            .query("limit", limit);
        if let Some(term) = search.filter(|s| !s.trim().is_empty()) {
            request = request.query("search", term.trim());
        }
        let reply = self.execute(request).await?;
        BookPage::from_body(&reply.body)
    }

    /// `GET /books/:id`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`] for the status mapping.
    pub async fn get_book(&self, id: &str) -> Result<Book> {
        self.execute_json(ApiRequest::new(Method::Get, ["books", id]))
            .await
    }

    /// `POST /books`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`] for the status mapping.
    pub async fn create_book(&self, draft: &BookDraft) -> Result<Book> {
        let request = ApiRequest::new(Method::Post, ["books"]).json(to_body(&draft.normalized())?);
        self.execute_json(request).await
    }

    /// `PATCH /books/:id`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`] for the status mapping.
    pub async fn update_book(&self, id: &str, draft: &BookDraft) -> Result<Book> {
        let request =
            ApiRequest::new(Method::Patch, ["books", id]).json(to_body(&draft.normalized())?);
        self.execute_json(request).await
    }

    /// `DELETE /books/:id`. The body of a successful reply is ignored.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`] for the status mapping.
    pub async fn delete_book(&self, id: &str) -> Result<()> {
        self.execute(ApiRequest::new(Method::Delete, ["books", id]))
            .await
            .map(|_| ())
    }

    /// Sends `request` with the current bearer token and checks the status.
    ///
    /// # Errors
    ///
    /// - [`LibraryError::SessionExpired`] on 401, after the hook has run
    /// - [`LibraryError::Server`] on any other non-2xx status
    /// - [`LibraryError::Network`] when no response arrived
    #[instrument(name = "api_request", skip_all, fields(method = %request.method, route = %request.route()))]
    pub async fn execute(&self, mut request: ApiRequest) -> Result<ApiReply> {
        request.bearer = self.inner.hook.bearer_token();
        let reply = match self.inner.transport.send(request).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, "request failed before a response");
                return Err(e);
            }
        };

        tracing::debug!(status = reply.status, "response received");

        if reply.is_success() {
            return Ok(reply);
        }
        if reply.status == 401 {
            tracing::info!("unauthorized response, expiring session");
            self.inner.hook.on_unauthorized();
            return Err(LibraryError::SessionExpired);
        }
        Err(server_error(&reply))
    }

    async fn execute_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let reply = self.execute(request).await?;
        serde_json::from_str(&reply.body)
            .map_err(|e| LibraryError::Decode(format!("Failed to parse response: {e}")))
    }
}

fn to_body<T: serde::Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value)
        .map_err(|e| LibraryError::Decode(format!("Failed to encode request: {e}")))
}

fn server_error(reply: &ApiReply) -> LibraryError {
    let message = match serde_json::from_str::<ErrorBody>(&reply.body) {
        Ok(ErrorBody {
            message: ErrorMessage::One(message),
        }) => message,
        Ok(ErrorBody {
            message: ErrorMessage::Many(messages),
        }) => messages.join(", "),
        Err(_) if reply.body.trim().is_empty() => format!("Request failed with status {}", reply.status),
        Err(_) => reply.body.clone(),
    };
    LibraryError::Server {
        status: reply.status,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_prefers_backend_message() {
        let err = server_error(&ApiReply::new(400, r#"{"message":"title should not be empty"}"#));
        assert_eq!(err.user_message(), "title should not be empty");
    }

    #[test]
    fn server_error_joins_message_lists() {
        let err = server_error(&ApiReply::new(
            400,
            r#"{"message":["title should not be empty","author must be a string"]}"#,
        ));
        assert_eq!(
            err.user_message(),
            "title should not be empty, author must be a string"
        );
    }

    #[test]
    fn server_error_falls_back_to_raw_body_or_status() {
        let err = server_error(&ApiReply::new(502, "Bad Gateway"));
        assert_eq!(err.user_message(), "Bad Gateway");
        let err = server_error(&ApiReply::new(500, ""));
        assert_eq!(err.user_message(), "Request failed with status 500");
    }
}
