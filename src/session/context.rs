//! Shared session slot: persisted credentials plus the published state.
//!
//! The context is the single writer of both. It is shared between the store and
//! the API client, which reaches it through [`AuthHook`] to read the token and to
//! report 401 responses.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::{broadcast, watch};

use crate::api::AuthHook;
use crate::domain::error::{LibraryError, Result};
use crate::domain::user::User;
use crate::session::state::{SessionEvent, SessionState};
use crate::storage::Storage;

/// Storage key of the bearer token.
pub const TOKEN_KEY: &str = "authToken";
/// Storage key of the serialized [`User`].
pub const USER_KEY: &str = "user";

const EVENT_CAPACITY: usize = 16;

pub(crate) struct SessionContext {
    storage: Mutex<Box<dyn Storage>>,
    state: watch::Sender<SessionState>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionContext {
    pub(crate) fn new(storage: Box<dyn Storage>) -> Self {
        let (state, _) = watch::channel(SessionState::Uninitialized);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            storage: Mutex::new(storage),
            state,
            events,
        }
    }

    fn storage(&self) -> MutexGuard<'_, Box<dyn Storage>> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub(crate) fn events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Publishes `state`, returning the one it replaced.
    pub(crate) fn set_state(&self, state: SessionState) -> SessionState {
        tracing::debug!(state = ?state, "session state changed");
        self.state.send_replace(state)
    }

    /// Moves `Error(_)` to `Anonymous`; any other state is left alone.
    pub(crate) fn clear_error(&self) -> bool {
        self.state.send_if_modified(|state| {
            if matches!(state, SessionState::Error(_)) {
                *state = SessionState::Anonymous;
                true
            } else {
                false
            }
        })
    }

    pub(crate) fn emit(&self, event: SessionEvent) {
        tracing::debug!(event = ?event, "session event");
        // No receivers is fine; events are advisory.
        let _ = self.events.send(event);
    }

    pub(crate) fn token(&self) -> Option<String> {
        match self.storage().get(TOKEN_KEY) {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read stored token");
                None
            }
        }
    }

    /// Stored token and user. A user entry that does not parse counts as absent.
    pub(crate) fn credentials(&self) -> Result<(Option<String>, Option<User>)> {
        let storage = self.storage();
        let token = storage.get(TOKEN_KEY)?;
        let user = match storage.get(USER_KEY)? {
            Some(raw) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!(error = %e, "stored user is unreadable");
                    None
                }
            },
            None => None,
        };
        Ok((token, user))
    }

    /// Writes token and user together.
    pub(crate) fn persist(&self, token: &str, user: &User) -> Result<()> {
        let user = serde_json::to_string(user)
            .map_err(|e| LibraryError::Storage(format!("failed to serialize user: {e}")))?;
        self.storage().put_all(&[(TOKEN_KEY, token), (USER_KEY, &user)])
    }

    /// Refreshes the stored user, keeping the current token.
    pub(crate) fn persist_user(&self, user: &User) -> Result<()> {
        let user = serde_json::to_string(user)
            .map_err(|e| LibraryError::Storage(format!("failed to serialize user: {e}")))?;
        self.storage().put_all(&[(USER_KEY, &user)])
    }

    /// Removes token and user together. Returns whether a token was present.
    pub(crate) fn clear(&self) -> bool {
        let mut storage = self.storage();
        Self::clear_locked(&mut storage)
    }

    fn clear_locked(storage: &mut MutexGuard<'_, Box<dyn Storage>>) -> bool {
        let had_token = matches!(storage.get(TOKEN_KEY), Ok(Some(_)));
        if let Err(e) = storage.remove_all(&[TOKEN_KEY, USER_KEY]) {
            tracing::error!(error = %e, "failed to clear stored credentials");
        }
        had_token
    }

    /// Handles a 401: clears credentials, publishes `Anonymous` and emits a
    /// single [`SessionEvent::Expired`].
    ///
    /// A no-op when nothing is stored and no user is signed in, so a burst of
    /// 401s produces one event.
    pub(crate) fn expire(&self) {
        let mut storage = self.storage();
        let had_token = matches!(storage.get(TOKEN_KEY), Ok(Some(_)));
        let was_authenticated = self.state.borrow().is_authenticated();
        if !had_token && !was_authenticated {
            tracing::debug!("session already cleared, ignoring 401");
            return;
        }

        Self::clear_locked(&mut storage);
        self.set_state(SessionState::Anonymous);
        drop(storage);

        tracing::info!("session expired");
        self.emit(SessionEvent::Expired);
    }
}

impl AuthHook for SessionContext {
    fn bearer_token(&self) -> Option<String> {
        self.token()
    }

    fn on_unauthorized(&self) {
        self.expire();
    }
}
