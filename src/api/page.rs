//! Normalization of the book list response.
//!
//! The backend has answered list requests in three shapes over time:
//!
//! - a bare array of books (one page, no counters)
//! - `{ "data": [...], "page": n, "totalPages": m }`
//! - `{ "items": [...], "currentPage": n, "totalPages": m }`
//!
//! All three become a [`BookPage`] here so nothing past the API boundary ever
//! sees the difference. Anything else, `null` included, is an empty page.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::book::Book;
use crate::domain::error::{LibraryError, Result};

/// One page of books with its counters, both at least 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookPage {
    pub records: Vec<Book>,
    pub current_page: u32,
    pub total_pages: u32,
}

impl Default for BookPage {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            current_page: 1,
            total_pages: 1,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DataEnvelope {
    data: Vec<Book>,
    #[serde(default)]
    page: Option<u32>,
    #[serde(default)]
    total_pages: Option<u32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemsEnvelope {
    items: Vec<Book>,
    #[serde(default)]
    current_page: Option<u32>,
    #[serde(default)]
    total_pages: Option<u32>,
}

impl BookPage {
    pub(crate) fn new(records: Vec<Book>, current_page: Option<u32>, total_pages: Option<u32>) -> Self {
        Self {
            records,
            current_page: current_page.unwrap_or(1).max(1),
            total_pages: total_pages.unwrap_or(1).max(1),
        }
    }

    /// Normalizes a decoded list response.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Decode`] when a recognized shape carries records
    /// that are not valid books.
    pub fn from_value(value: Value) -> Result<Self> {
        let decode = |e: serde_json::Error| LibraryError::Decode(format!("book list: {e}"));

        match value {
            Value::Array(_) => {
                let records: Vec<Book> = serde_json::from_value(value).map_err(decode)?;
                Ok(Self::new(records, None, None))
            }
            Value::Object(ref map) if map.get("data").is_some_and(Value::is_array) => {
                let envelope: DataEnvelope = serde_json::from_value(value).map_err(decode)?;
                Ok(Self::new(envelope.data, envelope.page, envelope.total_pages))
            }
            Value::Object(ref map) if map.get("items").is_some_and(Value::is_array) => {
                let envelope: ItemsEnvelope = serde_json::from_value(value).map_err(decode)?;
                Ok(Self::new(
                    envelope.items,
                    envelope.current_page,
                    envelope.total_pages,
                ))
            }
            Value::Null => Ok(Self::default()),
            other => {
                tracing::warn!(kind = kind_of(&other), "unrecognized book list shape, treating as empty");
                Ok(Self::default())
            }
        }
    }

    /// Normalizes a raw response body. An empty body is an empty page.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Decode`] if the body is not JSON or carries
    /// malformed records.
    pub fn from_body(body: &str) -> Result<Self> {
        if body.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: Value = serde_json::from_str(body)
            .map_err(|e| LibraryError::Decode(format!("book list: {e}")))?;
        Self::from_value(value)
    }
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn book(id: &str) -> Value {
        json!({
            "id": id,
            "title": format!("Title {id}"),
            "author": "Someone",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    #[test]
    fn bare_array_is_a_single_page() {
        let page = BookPage::from_value(json!([book("1"), book("2")])).unwrap();
        assert_eq!(page.records.len(), 2);
        assert_eq!((page.current_page, page.total_pages), (1, 1));
    }

    #[test]
    fn data_envelope_uses_page_and_total_pages() {
        let page =
            BookPage::from_value(json!({"data": [book("1")], "page": 2, "totalPages": 5})).unwrap();
        assert_eq!(page.records[0].id, "1");
        assert_eq!((page.current_page, page.total_pages), (2, 5));
    }

    #[test]
    fn items_envelope_uses_current_page() {
        let page = BookPage::from_value(
            json!({"items": [book("1")], "currentPage": 3, "totalPages": 4, "total": 31}),
        )
        .unwrap();
        assert_eq!((page.current_page, page.total_pages), (3, 4));
    }

    #[test]
    fn zero_or_missing_counters_default_to_one() {
        let page = BookPage::from_value(json!({"data": [], "page": 0})).unwrap();
        assert_eq!((page.current_page, page.total_pages), (1, 1));
    }

    #[test]
    fn null_and_unknown_shapes_are_empty() {
        assert_eq!(BookPage::from_value(Value::Null).unwrap(), BookPage::default());
        assert_eq!(
            BookPage::from_value(json!({"results": []})).unwrap(),
            BookPage::default()
        );
        assert_eq!(BookPage::from_body("").unwrap(), BookPage::default());
    }

    #[test]
    fn malformed_records_are_a_decode_error() {
        let err = BookPage::from_value(json!([{"id": 1}])).unwrap_err();
        assert!(matches!(err, LibraryError::Decode(_)));
    }
}
