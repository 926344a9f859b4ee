//! View model types representing renderable shell output.
//!
//! View models are created via `ShellState::compute_viewmodel()` and consumed by
//! the renderer. They contain no business logic, only display-ready data.

use crate::domain::book::Book;

/// Complete view model for one redraw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UIViewModel {
    pub header: HeaderInfo,

    /// Paging and query summary. `None` on the login screen.
    pub status: Option<StatusInfo>,

    /// Rows of the book table, already filtered and sorted.
    pub display_items: Vec<DisplayItem>,

    /// Notices and errors, shown between the header and the table.
    pub messages: Vec<String>,

    /// Shown instead of the table when there is nothing to list.
    pub empty_state: Option<EmptyState>,

    pub footer: FooterInfo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,
    /// Full name of the signed-in user.
    pub user: Option<String>,
}

/// Current page and query settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    /// "Page X of Y".
    pub page: String,
    pub search: Option<String>,
    pub genre: Option<String>,
    /// Sort key and direction, e.g. "title asc".
    pub sort: String,
    /// A fetch or save is in flight.
    pub loading: bool,
}

/// One book row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayItem {
    pub id: String,
    pub title: String,
    pub author: String,
    /// Year as text, or `-` when unknown.
    pub year: String,
    pub genre: String,
}

impl From<&Book> for DisplayItem {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.clone(),
            title: book.title.clone(),
            author: book.author.clone(),
            year: book
                .published_year
                .map_or_else(|| "-".to_string(), |y| y.to_string()),
            genre: book.genre.clone().unwrap_or_else(|| "-".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    /// Command hints for the current mode.
    pub keybindings: String,
}

/// Empty state message display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}
