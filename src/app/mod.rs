//! Application layer coordinating shell state, events, and actions.
//!
//! Sits between the runtime loop (main.rs) and the session and book stores.
//!
//! # Architecture
//!
//! ```text
//! Input line → parse → Event → handle_event → ShellState mutations → Actions
//!                                   ↑                                   ↓
//!                                   └──────── session changes ──────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`commands`]: Text command parsing
//! - [`handler`]: Event processing logic and state transition coordinator
//! - [`modes`]: Screen and input mode state machine types
//! - [`state`]: Shell state container and view model computation

pub mod actions;
pub mod commands;
pub mod handler;
pub mod modes;
pub mod state;

pub use actions::Action;
pub use commands::{parse, HELP};
pub use handler::{handle_event, Event};
pub use modes::{InputMode, Screen};
pub use state::ShellState;
