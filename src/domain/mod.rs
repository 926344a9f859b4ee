//! Domain layer for the bookshelf client.
//!
//! Core types shared by every other layer, independent of HTTP, storage or the
//! terminal shell.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`user`]: Accounts and auth request bodies
//! - [`book`]: Book records and drafts
//! - [`query`]: List query state and the page-reset rule

pub mod book;
pub mod error;
pub mod query;
pub mod user;

pub use book::{Book, BookDraft};
pub use error::{FieldErrors, LibraryError, Result};
pub use query::{ListQuery, QueryChange, QueryPatch, SortDirection, SortKey};
pub use user::{AuthResponse, LoginRequest, RegisterRequest, Role, User};
