//! List query state: paging, search, genre filter and sort order.
//!
//! [`ListQuery::merge`] is the only way the controller changes a query. It applies
//! the page-reset rule and reports whether the server needs to be asked again.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Field the derived view is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Title,
    PublishedYear,
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "published_year" | "year" => Ok(Self::PublishedYear),
            "created_at" | "created" => Ok(Self::CreatedAt),
            "updated_at" | "updated" => Ok(Self::UpdatedAt),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Title => "title",
            Self::PublishedYear => "published_year",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("unknown sort direction: {other}")),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        })
    }
}

/// What the list view is currently asking for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// One-based page number sent to the server.
    pub page: u32,
    pub page_size: u32,
    /// Trimmed search term; empty means no search.
    pub search_term: String,
    pub genre_filter: Option<String>,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
}

impl ListQuery {
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            search_term: String::new(),
            genre_filter: None,
            sort_key: SortKey::default(),
            sort_direction: SortDirection::default(),
        }
    }

    /// Search term to send, `None` when blank.
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        if self.search_term.is_empty() {
            None
        } else {
            Some(&self.search_term)
        }
    }

    /// Applies `patch` and reports what changed.
    ///
    /// A changed search term, genre filter or page size resets the page to 1,
    /// overriding any page in the same patch. Values equal to the current ones
    /// are not changes.
    pub fn merge(&mut self, patch: QueryPatch) -> QueryChange {
        let before = (self.page, self.page_size, self.search_term.clone());
        let mut reset_page = false;

        if let Some(term) = patch.search_term {
            let term = term.trim().to_string();
            if term != self.search_term {
                self.search_term = term;
                reset_page = true;
            }
        }
        if let Some(genre) = patch.genre_filter {
            let genre = genre.map(|g| g.trim().to_string()).filter(|g| !g.is_empty());
            if genre != self.genre_filter {
                self.genre_filter = genre;
                reset_page = true;
            }
        }
        if let Some(size) = patch.page_size {
            let size = size.max(1);
            if size != self.page_size {
                self.page_size = size;
                reset_page = true;
            }
        }
        if let Some(key) = patch.sort_key {
            self.sort_key = key;
        }
        if let Some(direction) = patch.sort_direction {
            self.sort_direction = direction;
        }

        if reset_page {
            self.page = 1;
        } else if let Some(page) = patch.page {
            self.page = page.max(1);
        }

        let after = (self.page, self.page_size, self.search_term.clone());
        QueryChange {
            page_reset: reset_page,
            refetch: before != after,
        }
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::new(10)
    }
}

/// Partial update to a [`ListQuery`]. `None` leaves a field untouched.
///
/// `genre_filter` is doubly optional: `Some(None)` clears the filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPatch {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search_term: Option<String>,
    pub genre_filter: Option<Option<String>>,
    pub sort_key: Option<SortKey>,
    pub sort_direction: Option<SortDirection>,
}

impl QueryPatch {
    #[must_use]
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }

    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search_term: Some(term.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn genre(genre: Option<String>) -> Self {
        Self {
            genre_filter: Some(genre),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn sort(key: SortKey, direction: SortDirection) -> Self {
        Self {
            sort_key: Some(key),
            sort_direction: Some(direction),
            ..Self::default()
        }
    }
}

/// Outcome of [`ListQuery::merge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueryChange {
    /// The page was forced back to 1.
    pub page_reset: bool,
    /// Page, page size or search term differ from before.
    pub refetch: bool,
}
