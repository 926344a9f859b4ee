//! Book records and drafts.
//!
//! A [`Book`] is the server's copy of a record; the client never invents one. A
//! [`BookDraft`] is what the user typed into the add/edit form and must pass
//! [`BookDraft::check`] before it is sent anywhere.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use super::error::{FieldErrors, Result};

/// Earliest publication year accepted by the form.
pub const MIN_PUBLISHED_YEAR: i32 = 1000;

/// A book as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Draft pre-filled with this book's fields, for the edit form.
    #[must_use]
    pub fn to_draft(&self) -> BookDraft {
        BookDraft {
            title: self.title.clone(),
            author: self.author.clone(),
            published_year: self.published_year,
            genre: self.genre.clone(),
        }
    }
}

/// User-entered book fields prior to create or update.
///
/// Serializes as the body of `POST /books` and `PATCH /books/:id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
}

impl BookDraft {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            published_year: None,
            genre: None,
        }
    }

    #[must_use]
    pub const fn with_year(mut self, year: i32) -> Self {
        self.published_year = Some(year);
        self
    }

    #[must_use]
    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    /// Checks the draft against the current calendar year.
    ///
    /// # Errors
    ///
    /// Returns [`super::LibraryError::Validation`] naming every failing field.
    pub fn check(&self) -> Result<()> {
        self.check_for_year(Utc::now().year())
    }

    /// Checks the draft with an explicit upper bound for `published_year`.
    ///
    /// # Errors
    ///
    /// Returns [`super::LibraryError::Validation`] naming every failing field.
    pub fn check_for_year(&self, current_year: i32) -> Result<()> {
        let mut errors = FieldErrors::new();
        if self.title.trim().is_empty() {
            errors.add("title", "Title is required");
        }
        if self.author.trim().is_empty() {
            errors.add("author", "Author is required");
        }
        if let Some(year) = self.published_year {
            if !(MIN_PUBLISHED_YEAR..=current_year).contains(&year) {
                errors.add("published_year", "Please enter a valid year");
            }
        }
        errors.into_result()
    }

    /// Copy with a blank genre dropped, the form that goes over the wire.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            title: self.title.clone(),
            author: self.author.clone(),
            published_year: self.published_year,
            genre: self
                .genre
                .as_ref()
                .filter(|g| !g.trim().is_empty())
                .cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LibraryError;

    fn errors_of(draft: &BookDraft) -> FieldErrors {
        match draft.check_for_year(2024) {
            Err(LibraryError::Validation(errors)) => errors,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn blank_title_is_rejected() {
        let errors = errors_of(&BookDraft::new("  ", "X"));
        assert_eq!(errors.get("title"), Some("Title is required"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn year_must_fall_between_1000_and_current_year() {
        assert!(BookDraft::new("Dune", "Herbert").with_year(1000).check_for_year(2024).is_ok());
        assert!(BookDraft::new("Dune", "Herbert").with_year(2024).check_for_year(2024).is_ok());

        let errors = errors_of(&BookDraft::new("Dune", "Herbert").with_year(999));
        assert_eq!(errors.get("published_year"), Some("Please enter a valid year"));
        let errors = errors_of(&BookDraft::new("Dune", "Herbert").with_year(2025));
        assert!(errors.get("published_year").is_some());
    }

    #[test]
    fn missing_year_is_allowed() {
        assert!(BookDraft::new("Dune", "Herbert").check_for_year(2024).is_ok());
    }

    #[test]
    fn normalized_drops_blank_genre() {
        let draft = BookDraft::new("Dune", "Herbert").with_genre(" ").normalized();
        assert_eq!(draft.genre, None);
        let body = serde_json::to_value(&draft).unwrap();
        assert!(body.get("genre").is_none());
        assert!(body.get("published_year").is_none());
    }

    #[test]
    fn book_round_trips_backend_timestamps() {
        let book: Book = serde_json::from_str(
            r#"{"id":"b1","title":"Dune","author":"Frank Herbert","published_year":1965,
                "created_at":"2024-01-02T03:04:05Z","updated_at":"2024-01-02T03:04:05.500Z"}"#,
        )
        .unwrap();
        assert_eq!(book.published_year, Some(1965));
        assert_eq!(book.genre, None);
        assert!(book.updated_at > book.created_at);
        assert_eq!(book.to_draft().title, "Dune");
    }
}
