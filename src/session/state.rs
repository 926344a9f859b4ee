use crate::domain::user::User;

/// Authentication state observed by the shell and by tests.
///
/// The bearer token is deliberately absent; it only lives in storage.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// `restore` has not run yet.
    #[default]
    Uninitialized,
    /// A restore, login or registration is in flight.
    Loading,
    Authenticated(User),
    Anonymous,
    /// The last login or registration failed with this message.
    Error(String),
}

impl SessionState {
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Discrete session transitions, published on a broadcast channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn(User),
    LoggedOut,
    /// The backend rejected the stored token. Consumers should return to login.
    Expired,
}
