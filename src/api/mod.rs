//! Backend API access.
//!
//! Requests go through two layers. [`Transport`] moves a raw request to the
//! backend and hands back status and body; [`ReqwestTransport`] is the HTTP
//! implementation. [`ApiClient`] sits on top, attaches the bearer token, maps
//! statuses to [`LibraryError`](crate::domain::LibraryError) variants and decodes
//! typed bodies.
//!
//! A 401 from any endpoint is reported to the [`AuthHook`] exactly where it is
//! observed, so callers never have to handle session expiry themselves.

pub mod client;
pub mod http;
pub mod page;
pub mod transport;

pub use client::{ApiClient, AuthHook};
pub use http::ReqwestTransport;
pub use page::BookPage;
pub use transport::{ApiReply, ApiRequest, Method, Transport};
