//! Storage layer for persisted credentials.
//!
//! The session keeps two string entries, the bearer token and the serialized
//! user profile. Both live behind the [`Storage`] trait so the session logic does
//! not care whether they end up in a JSON file or in memory.
//!
//! # Modules
//!
//! - `backend`: Storage trait abstraction for backend implementations
//! - `json`: JSON file-based storage implementation
//! - `memory`: In-process storage for tests and ephemeral sessions

pub mod backend;
pub mod json;
pub mod memory;

pub use backend::Storage;
pub use json::JsonStorage;
pub use memory::MemoryStorage;
