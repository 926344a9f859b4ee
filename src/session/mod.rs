//! Session management.
//!
//! [`SessionStore`] owns the signed-in user and the persisted credentials. State
//! is published on a `watch` channel so any number of consumers can follow it,
//! and discrete transitions ([`SessionEvent`]) go out on a `broadcast` channel.
//!
//! The token and the serialized user are stored under [`TOKEN_KEY`] and
//! [`USER_KEY`] and are always written and removed together.

mod context;
mod state;
mod store;

pub use context::{TOKEN_KEY, USER_KEY};
pub use state::{SessionEvent, SessionState};
pub use store::SessionStore;
