//! Actions representing side effects to be executed by the shell runtime.
//!
//! The event handler returns a `Vec<Action>` after processing each event. The
//! runtime in `main.rs` executes them in order against the session store and
//! the book list controller.

use crate::books::Confirmation;
use crate::domain::book::BookDraft;
use crate::domain::query::QueryPatch;

/// Commands representing side effects to be executed by the shell runtime.
#[derive(Clone, PartialEq, Eq)]
pub enum Action {
    Login {
        email: String,
        password: String,
    },
    Register {
        first_name: String,
        last_name: String,
        email: String,
        password: String,
    },
    Logout,
    /// Dismisses the session error and both list error scopes.
    ClearErrors,

    /// Merges a patch into the list query, refetching if needed.
    UpdateQuery(QueryPatch),
    /// Refetches the current page.
    Refresh,
    NextPage,
    PreviousPage,
    GoToPage(u32),
    /// Forgets the fetched list, used when the session ends.
    ResetBooks,

    CreateBook(BookDraft),
    UpdateBook {
        id: String,
        draft: BookDraft,
    },
    ShowBook(String),
    DeleteBook {
        id: String,
        confirmation: Confirmation,
    },

    ShowHelp,
    Quit,
}

impl Action {
    /// Variant name, safe to log.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Login { .. } => "login",
            Self::Register { .. } => "register",
            Self::Logout => "logout",
            Self::ClearErrors => "clear_errors",
            Self::UpdateQuery(_) => "update_query",
            Self::Refresh => "refresh",
            Self::NextPage => "next_page",
            Self::PreviousPage => "previous_page",
            Self::GoToPage(_) => "go_to_page",
            Self::ResetBooks => "reset_books",
            Self::CreateBook(_) => "create_book",
            Self::UpdateBook { .. } => "update_book",
            Self::ShowBook(_) => "show_book",
            Self::DeleteBook { .. } => "delete_book",
            Self::ShowHelp => "show_help",
            Self::Quit => "quit",
        }
    }
}

// Credentials never reach logs or panic messages.
impl std::fmt::Debug for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Login { email, .. } => f
                .debug_struct("Login")
                .field("email", email)
                .finish_non_exhaustive(),
            Self::Register { email, .. } => f
                .debug_struct("Register")
                .field("email", email)
                .finish_non_exhaustive(),
            Self::UpdateQuery(patch) => f.debug_tuple("UpdateQuery").field(patch).finish(),
            Self::GoToPage(page) => f.debug_tuple("GoToPage").field(page).finish(),
            Self::CreateBook(draft) => f.debug_tuple("CreateBook").field(draft).finish(),
            Self::UpdateBook { id, draft } => f
                .debug_struct("UpdateBook")
                .field("id", id)
                .field("draft", draft)
                .finish(),
            Self::ShowBook(id) => f.debug_tuple("ShowBook").field(id).finish(),
            Self::DeleteBook { id, confirmation } => f
                .debug_struct("DeleteBook")
                .field("id", id)
                .field("confirmation", confirmation)
                .finish(),
            other => f.write_str(other.kind()),
        }
    }
}
