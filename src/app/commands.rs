//! Text command parsing.
//!
//! One input line becomes one [`Event`]. Book fields are separated by `|` so
//! titles and authors can contain spaces:
//!
//! ```text
//! add Dune | Frank Herbert | 1965 | Sci-Fi
//! edit 42 Dune Messiah | Frank Herbert | 1969
//! ```

use crate::app::handler::Event;
use crate::domain::book::BookDraft;
use crate::domain::query::{SortDirection, SortKey};

/// Help text listing every command.
pub const HELP: &str = "\
Account
  login <email> <password>
  register <first> <last> <email> <password>
  logout
  dismiss                       clear error messages

Books
  list                          reload the current page
  search [term]                 search titles and authors; empty clears
  genre [name]                  filter this page by genre; empty clears
  sort <title|year|created|updated> [asc|desc]
  next | prev | page <n>
  add <title> | <author> [| <year>] [| <genre>]
  edit <id> <title> | <author> [| <year>] [| <genre>]
  show <id>
  delete <id>                   asks for confirmation (yes/no)

  help | quit";

/// Parses one line of input. Returns `None` for blank lines.
#[must_use]
pub fn parse(line: &str) -> Option<Event> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (command, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(c, r)| (c, r.trim()));
    let args: Vec<&str> = rest.split_whitespace().collect();

    let event = match command.to_ascii_lowercase().as_str() {
        "login" => match args.as_slice() {
            [email, password] => Event::Login {
                email: (*email).to_string(),
                password: (*password).to_string(),
            },
            _ => usage("login <email> <password>"),
        },
        "register" => match args.as_slice() {
            [first, last, email, password] => Event::Register {
                first_name: (*first).to_string(),
                last_name: (*last).to_string(),
                email: (*email).to_string(),
                password: (*password).to_string(),
            },
            _ => usage("register <first> <last> <email> <password>"),
        },
        "logout" => Event::Logout,
        "dismiss" | "clear" => Event::Dismiss,
        "list" | "refresh" | "ls" => Event::Refresh,
        "search" => Event::Search(rest.to_string()),
        "genre" => Event::Genre(if rest.is_empty() {
            None
        } else {
            Some(rest.to_string())
        }),
        "sort" => parse_sort(&args),
        "next" | "n" => Event::NextPage,
        "prev" | "previous" | "p" => Event::PreviousPage,
        "page" => match args.as_slice() {
            [page] => page
                .parse::<u32>()
                .map_or_else(|_| usage("page <n>"), Event::GoToPage),
            _ => usage("page <n>"),
        },
        "add" => match parse_draft(rest) {
            Ok(draft) => Event::Add(draft),
            Err(event) => event,
        },
        "edit" => match rest.split_once(char::is_whitespace) {
            Some((id, fields)) => match parse_draft(fields) {
                Ok(draft) => Event::Edit {
                    id: id.to_string(),
                    draft,
                },
                Err(event) => event,
            },
            None => usage("edit <id> <title> | <author> [| <year>] [| <genre>]"),
        },
        "show" => match args.as_slice() {
            [id] => Event::Show((*id).to_string()),
            _ => usage("show <id>"),
        },
        "delete" | "rm" => match args.as_slice() {
            [id] => Event::Delete((*id).to_string()),
            _ => usage("delete <id>"),
        },
        "yes" | "y" => Event::Confirm,
        "no" => Event::Decline,
        "help" | "?" => Event::Help,
        "quit" | "exit" | "q" => Event::Quit,
        other => Event::Invalid(format!("Unknown command `{other}`. Type `help` for a list.")),
    };
    Some(event)
}

fn usage(text: &str) -> Event {
    Event::Invalid(format!("Usage: {text}"))
}

fn parse_sort(args: &[&str]) -> Event {
    let (key, direction) = match args {
        [key] => (*key, None),
        [key, direction] => (*key, Some(*direction)),
        _ => return usage("sort <title|year|created|updated> [asc|desc]"),
    };
    let Ok(key) = key.parse::<SortKey>() else {
        return usage("sort <title|year|created|updated> [asc|desc]");
    };
    let direction = match direction.map(str::parse::<SortDirection>) {
        None => SortDirection::Asc,
        Some(Ok(direction)) => direction,
        Some(Err(_)) => return usage("sort <title|year|created|updated> [asc|desc]"),
    };
    Event::Sort { key, direction }
}

fn parse_draft(fields: &str) -> Result<BookDraft, Event> {
    let parts: Vec<&str> = fields.split('|').map(str::trim).collect();
    if parts.len() < 2 || parts.len() > 4 {
        return Err(usage("add <title> | <author> [| <year>] [| <genre>]"));
    }

    let mut draft = BookDraft::new(parts[0], parts[1]);
    if let Some(year) = parts.get(2).filter(|y| !y.is_empty()) {
        match year.parse::<i32>() {
            Ok(year) => draft.published_year = Some(year),
            Err(_) => return Err(Event::Invalid("Please enter a valid year".to_string())),
        }
    }
    if let Some(genre) = parts.get(3).filter(|g| !g.is_empty()) {
        draft.genre = Some((*genre).to_string());
    }
    Ok(draft)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(parse("   "), None);
    }

    #[test]
    fn add_splits_fields_on_pipes() {
        let event = parse("add Dune | Frank Herbert | 1965 | Sci-Fi").unwrap();
        assert_eq!(
            event,
            Event::Add(
                BookDraft::new("Dune", "Frank Herbert")
                    .with_year(1965)
                    .with_genre("Sci-Fi")
            )
        );
    }

    #[test]
    fn add_allows_skipping_year() {
        let event = parse("add Emma | Jane Austen | | Romance").unwrap();
        assert_eq!(
            event,
            Event::Add(BookDraft::new("Emma", "Jane Austen").with_genre("Romance"))
        );
    }

    #[test]
    fn edit_takes_id_then_fields() {
        let event = parse("edit b7 Dune Messiah | Frank Herbert").unwrap();
        assert_eq!(
            event,
            Event::Edit {
                id: "b7".into(),
                draft: BookDraft::new("Dune Messiah", "Frank Herbert"),
            }
        );
    }

    #[test]
    fn non_numeric_year_is_rejected() {
        assert_eq!(
            parse("add Dune | Herbert | soon"),
            Some(Event::Invalid("Please enter a valid year".into()))
        );
    }

    #[test]
    fn sort_defaults_to_ascending() {
        assert_eq!(
            parse("sort year"),
            Some(Event::Sort {
                key: SortKey::PublishedYear,
                direction: SortDirection::Asc
            })
        );
        assert_eq!(
            parse("sort title desc"),
            Some(Event::Sort {
                key: SortKey::Title,
                direction: SortDirection::Desc
            })
        );
    }

    #[test]
    fn search_keeps_spaces_and_empty_clears() {
        assert_eq!(parse("search war and peace"), Some(Event::Search("war and peace".into())));
        assert_eq!(parse("search"), Some(Event::Search(String::new())));
        assert_eq!(parse("genre"), Some(Event::Genre(None)));
    }

    #[test]
    fn unknown_commands_explain_themselves() {
        assert!(matches!(parse("frobnicate"), Some(Event::Invalid(_))));
        assert!(matches!(parse("page two"), Some(Event::Invalid(_))));
    }
}
