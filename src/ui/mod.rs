//! Plain-text rendering of the shell.
//!
//! ```text
//! ShellState → compute_viewmodel → UIViewModel → render → Write
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: View model types representing renderable state
//! - [`renderer`]: Top-level rendering coordinator
//! - [`components`]: Section renderers (header, status, table, empty, footer)
//! - [`helpers`]: Character-width text layout

pub mod components;
pub mod helpers;
pub mod renderer;
pub mod viewmodel;

pub use renderer::{render, DEFAULT_COLS};
pub use viewmodel::{DisplayItem, EmptyState, FooterInfo, HeaderInfo, StatusInfo, UIViewModel};
