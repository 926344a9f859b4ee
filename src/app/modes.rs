//! Screen and input mode state types for the shell.
//!
//! # State Machine
//!
//! The shell shows one of two screens:
//! - **Login**: shown while no user is signed in; only account commands work
//! - **Books**: the book list, reachable only with an authenticated session
//!
//! On the books screen, input is interpreted in one of two modes:
//! - **Normal**: every command is available
//! - **`ConfirmDelete`**: a delete is pending and waits for `yes` or `no`

/// Screen currently shown by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Login,
    Books,
}

/// Current input handling mode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,

    /// Waiting for the user to confirm deletion of book `id`.
    ///
    /// `yes` issues the delete; anything else cancels it.
    ConfirmDelete {
        id: String,
    },
}
