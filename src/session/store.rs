//! The session store: restore, login, register and logout.
//!
//! Every transition goes through [`SessionContext`], which persists the
//! credentials and publishes the new [`SessionState`] to subscribers.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};

use crate::api::{ApiClient, Transport};
use crate::domain::error::{LibraryError, Result};
use crate::domain::user::{AuthResponse, LoginRequest, RegisterRequest, User};
use crate::session::context::SessionContext;
use crate::session::state::{SessionEvent, SessionState};
use crate::storage::Storage;

/// Owner of the current session.
///
/// Cloning is cheap; every clone shares the same credentials, state channel and
/// API client. Nothing outside this type changes the session, with the single
/// exception of a 401 seen by the [`ApiClient`], which is routed back here.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use bookshelf::api::ReqwestTransport;
/// use bookshelf::session::SessionStore;
/// use bookshelf::storage::MemoryStorage;
///
/// # async fn run() -> bookshelf::domain::Result<()> {
/// let transport = ReqwestTransport::new("http://localhost:3000/api", Duration::from_secs(30))?;
/// let session = SessionStore::new(Box::new(MemoryStorage::new()), Arc::new(transport));
/// session.restore().await;
/// let user = session.login("ada@example.com", "secret1").await?;
/// println!("signed in as {}", user.full_name());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SessionStore {
    context: Arc<SessionContext>,
    api: ApiClient,
}

impl SessionStore {
    pub fn new(storage: Box<dyn Storage>, transport: Arc<dyn Transport>) -> Self {
        let context = Arc::new(SessionContext::new(storage));
        let api = ApiClient::new(transport, context.clone());
        Self { context, api }
    }

    /// Client that authenticates as this session.
    #[must_use]
    pub fn api(&self) -> ApiClient {
        self.api.clone()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.context.state()
    }

    /// Receiver that observes every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.context.subscribe()
    }

    /// Receiver for discrete session events, including expiry.
    #[must_use]
    pub fn events(&self) -> broadcast::Receiver<SessionEvent> {
        self.context.events()
    }

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.context.state().user().cloned()
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.context.token()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.context.state().is_authenticated()
    }

    /// Rebuilds the session from storage, validating the token with the backend.
    ///
    /// Never fails: every problem ends in `Anonymous` with storage cleared.
    pub async fn restore(&self) -> SessionState {
        tracing::info!("restoring session");
        self.context.set_state(SessionState::Loading);

        let credentials = match self.context.credentials() {
            Ok(credentials) => credentials,
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored credentials");
                (None, None)
            }
        };

        match credentials {
            (Some(_), Some(stored)) => match self.api.profile().await {
                Ok(user) => {
                    if user != stored {
                        tracing::debug!(user_id = %user.id, "stored profile refreshed");
                    }
                    if let Err(e) = self.context.persist_user(&user) {
                        tracing::warn!(error = %e, "failed to refresh stored user");
                    }
                    tracing::info!(user_id = %user.id, "session restored");
                    self.context.set_state(SessionState::Authenticated(user));
                }
                Err(e) => {
                    tracing::info!(error = %e, "stored token rejected");
                    self.context.clear();
                    self.context.set_state(SessionState::Anonymous);
                }
            },
            (None, None) => {
                self.context.set_state(SessionState::Anonymous);
            }
            (token, user) => {
                tracing::warn!(
                    has_token = token.is_some(),
                    has_user = user.is_some(),
                    "incomplete stored session, clearing"
                );
                self.context.clear();
                self.context.set_state(SessionState::Anonymous);
            }
        }

        self.state()
    }

    /// Signs in with email and password.
    ///
    /// # Errors
    ///
    /// - [`LibraryError::Validation`] when the input fails the form checks; the
    ///   state is untouched and no request is made
    /// - [`LibraryError::Auth`] when the backend refuses; the state becomes
    ///   `Error` with the same message
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let request = LoginRequest::new(email.trim(), password);
        request.check()?;

        tracing::debug!(email = %request.email, "logging in");
        self.context.set_state(SessionState::Loading);
        match self.api.login(&request).await {
            Ok(response) => self.establish(response),
            Err(e) => Err(self.fail(&e, "Invalid email or password")),
        }
    }

    /// Creates an account and signs in with it.
    ///
    /// # Errors
    ///
    /// Same as [`SessionStore::login`].
    pub async fn register(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> Result<User> {
        let request = RegisterRequest::new(first_name.trim(), last_name.trim(), email.trim(), password);
        request.check()?;

        tracing::debug!(email = %request.email, "registering");
        self.context.set_state(SessionState::Loading);
        match self.api.register(&request).await {
            Ok(response) => self.establish(response),
            Err(e) => Err(self.fail(&e, "Registration failed. Please try again.")),
        }
    }

    /// Forgets the session locally. Safe to call repeatedly.
    pub fn logout(&self) {
        let had_token = self.context.clear();
        let previous = self.context.set_state(SessionState::Anonymous);
        if had_token || previous.is_authenticated() {
            tracing::info!("logged out");
            self.context.emit(SessionEvent::LoggedOut);
        }
    }

    /// Dismisses a login or registration error.
    pub fn clear_error(&self) {
        if self.context.clear_error() {
            tracing::debug!("session error cleared");
        }
    }

    fn establish(&self, response: AuthResponse) -> Result<User> {
        let AuthResponse { access_token, user } = response;
        if let Err(e) = self.context.persist(&access_token, &user) {
            tracing::error!(error = %e, "failed to persist session");
            self.context.set_state(SessionState::Error(e.user_message()));
            return Err(e);
        }

        tracing::info!(user_id = %user.id, "signed in");
        self.context.set_state(SessionState::Authenticated(user.clone()));
        self.context.emit(SessionEvent::LoggedIn(user.clone()));
        Ok(user)
    }

    fn fail(&self, error: &LibraryError, unauthorized: &str) -> LibraryError {
        let message = match error {
            LibraryError::SessionExpired => unauthorized.to_string(),
            LibraryError::Server { message, .. } => message.clone(),
            LibraryError::Network(_) => "Unable to reach the server. Please try again.".to_string(),
            other => other.to_string(),
        };
        tracing::warn!(error = %error, "authentication failed");
        self.context.set_state(SessionState::Error(message.clone()));
        LibraryError::Auth(message)
    }
}
