//! Client-side filtering and ordering of the fetched page.

use std::cmp::Ordering;

use crate::domain::book::Book;
use crate::domain::query::{SortDirection, SortKey};

/// Books from `records` matching `genre_filter`, ordered by `key` and `direction`.
///
/// The genre comparison ignores case and surrounding whitespace; a blank filter
/// keeps everything. Ties keep their fetched order in both directions, so the
/// result depends only on the arguments.
#[must_use]
pub fn derived_view(
    records: &[Book],
    genre_filter: Option<&str>,
    key: SortKey,
    direction: SortDirection,
) -> Vec<Book> {
    let wanted = genre_filter
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_lowercase);

    let mut view: Vec<Book> = records
        .iter()
        .filter(|book| match &wanted {
            Some(genre) => book
                .genre
                .as_deref()
                .is_some_and(|g| g.trim().to_lowercase() == *genre),
            None => true,
        })
        .cloned()
        .collect();

    view.sort_by(|a, b| {
        let ordering = compare(a, b, key);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    view
}

fn compare(a: &Book, b: &Book, key: SortKey) -> Ordering {
    match key {
        SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        SortKey::PublishedYear => a
            .published_year
            .unwrap_or(0)
            .cmp(&b.published_year.unwrap_or(0)),
        SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        SortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn book(id: &str, title: &str, year: Option<i32>, genre: Option<&str>, day: u32) -> Book {
        let at = Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap();
        Book {
            id: id.to_string(),
            title: title.to_string(),
            author: "A".to_string(),
            published_year: year,
            genre: genre.map(str::to_string),
            created_at: at,
            updated_at: at,
        }
    }

    fn ids(view: &[Book]) -> Vec<&str> {
        view.iter().map(|b| b.id.as_str()).collect()
    }

    #[test]
    fn title_sort_ignores_case() {
        let records = vec![
            book("1", "banana", None, None, 1),
            book("2", "Apple", None, None, 2),
            book("3", "cherry", None, None, 3),
        ];
        let view = derived_view(&records, None, SortKey::Title, SortDirection::Asc);
        assert_eq!(ids(&view), ["2", "1", "3"]);
    }

    #[test]
    fn genre_filter_is_case_insensitive_and_trimmed() {
        let records = vec![
            book("1", "Dune", None, Some("Sci-Fi"), 1),
            book("2", "Emma", None, Some("Romance"), 2),
            book("3", "Solaris", None, Some("sci-fi "), 3),
            book("4", "Untitled", None, None, 4),
        ];
        let view = derived_view(&records, Some(" SCI-FI"), SortKey::CreatedAt, SortDirection::Asc);
        assert_eq!(ids(&view), ["1", "3"]);

        let all = derived_view(&records, Some("  "), SortKey::CreatedAt, SortDirection::Asc);
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn missing_year_sorts_as_zero() {
        let records = vec![
            book("1", "A", Some(1990), None, 1),
            book("2", "B", None, None, 2),
            book("3", "C", Some(1850), None, 3),
        ];
        let view = derived_view(&records, None, SortKey::PublishedYear, SortDirection::Asc);
        assert_eq!(ids(&view), ["2", "3", "1"]);
    }

    #[test]
    fn ties_keep_fetched_order_in_both_directions() {
        let records = vec![
            book("1", "Same", None, None, 5),
            book("2", "same", None, None, 5),
            book("3", "Other", None, None, 5),
        ];
        let asc = derived_view(&records, None, SortKey::Title, SortDirection::Asc);
        assert_eq!(ids(&asc), ["3", "1", "2"]);
        let desc = derived_view(&records, None, SortKey::Title, SortDirection::Desc);
        assert_eq!(ids(&desc), ["1", "2", "3"]);
    }

    #[test]
    fn applying_twice_gives_the_same_view() {
        let records = vec![
            book("1", "Dune", Some(1965), Some("Sci-Fi"), 3),
            book("2", "Emma", Some(1815), Some("Romance"), 1),
            book("3", "Solaris", Some(1961), Some("Sci-Fi"), 2),
        ];
        let once = derived_view(&records, Some("sci-fi"), SortKey::UpdatedAt, SortDirection::Desc);
        let twice = derived_view(&once, Some("sci-fi"), SortKey::UpdatedAt, SortDirection::Desc);
        assert_eq!(once, twice);
        assert_eq!(ids(&once), ["1", "3"]);
    }
}
