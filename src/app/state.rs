//! Shell state and view model computation.
//!
//! [`ShellState`] holds only what the shell itself owns: the current screen,
//! the input mode and a one-line notice. Session and list data stay in their
//! stores and are passed in when a view model is computed.

use super::modes::{InputMode, Screen};
use crate::books::ListSnapshot;
use crate::session::SessionState;
use crate::ui::viewmodel::{DisplayItem, EmptyState, FooterInfo, HeaderInfo, StatusInfo, UIViewModel};

/// Title shown in the header on every screen.
pub const APP_TITLE: &str = "Bookshelf";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellState {
    pub screen: Screen,
    pub input_mode: InputMode,
    /// Whether the last observed session state was authenticated.
    pub authenticated: bool,
    /// One-off message shown under the header until the next command.
    pub notice: Option<String>,
}

impl ShellState {
    /// Builds the renderable view for the current screen.
    #[must_use]
    pub fn compute_viewmodel(&self, session: &SessionState, list: &ListSnapshot) -> UIViewModel {
        match self.screen {
            Screen::Login => self.login_viewmodel(session),
            Screen::Books => self.books_viewmodel(session, list),
        }
    }

    fn login_viewmodel(&self, session: &SessionState) -> UIViewModel {
        let mut messages: Vec<String> = self.notice.iter().cloned().collect();
        if let Some(error) = session.error() {
            messages.push(error.to_string());
        }

        let subtitle = if session.is_loading() {
            "Signing in...".to_string()
        } else {
            "login <email> <password>  |  register <first> <last> <email> <password>".to_string()
        };

        UIViewModel {
            header: HeaderInfo {
                title: APP_TITLE.to_string(),
                user: None,
            },
            status: None,
            display_items: vec![],
            messages,
            empty_state: Some(EmptyState {
                message: "Sign in to manage your library".to_string(),
                subtitle,
            }),
            footer: FooterInfo {
                keybindings: "login | register | help | quit".to_string(),
            },
        }
    }

    fn books_viewmodel(&self, session: &SessionState, list: &ListSnapshot) -> UIViewModel {
        let mut messages: Vec<String> = self.notice.iter().cloned().collect();
        messages.extend(list.list_error.iter().cloned());
        messages.extend(list.form_error.iter().map(|e| format!("Form: {e}")));

        let display_items: Vec<DisplayItem> = list.visible.iter().map(DisplayItem::from).collect();

        let empty_state = if display_items.is_empty() && !list.loading {
            Some(empty_state_for(list))
        } else {
            None
        };

        UIViewModel {
            header: HeaderInfo {
                title: APP_TITLE.to_string(),
                user: session.user().map(crate::domain::User::full_name),
            },
            status: Some(StatusInfo {
                page: format!("Page {} of {}", list.current_page, list.total_pages),
                search: list.query.search().map(str::to_string),
                genre: list.query.genre_filter.clone(),
                sort: format!("{} {}", list.query.sort_key, list.query.sort_direction),
                loading: list.loading || list.submitting,
            }),
            display_items,
            messages,
            empty_state,
            footer: FooterInfo {
                keybindings: match self.input_mode {
                    InputMode::ConfirmDelete { .. } => "yes | no".to_string(),
                    InputMode::Normal => {
                        "search | genre | sort | next | prev | add | edit | delete | help".to_string()
                    }
                },
            },
        }
    }
}

fn empty_state_for(list: &ListSnapshot) -> EmptyState {
    if list.query.search().is_some() || list.query.genre_filter.is_some() {
        EmptyState {
            message: "No books found".to_string(),
            subtitle: "Try adjusting your search terms.".to_string(),
        }
    } else {
        EmptyState {
            message: "No books yet".to_string(),
            subtitle: "Get started by adding your first book.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::query::ListQuery;
    use crate::domain::user::{Role, User};

    fn snapshot(query: ListQuery) -> ListSnapshot {
        ListSnapshot {
            query,
            records: vec![],
            visible: vec![],
            current_page: 2,
            total_pages: 3,
            loading: false,
            submitting: false,
            list_error: Some("Network error: refused".into()),
            form_error: None,
        }
    }

    fn ada() -> SessionState {
        SessionState::Authenticated(User {
            id: "u1".into(),
            email: "ada@example.com".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            role: Role::User,
        })
    }

    #[test]
    fn books_screen_shows_user_page_and_errors() {
        let state = ShellState {
            screen: Screen::Books,
            authenticated: true,
            ..ShellState::default()
        };
        let vm = state.compute_viewmodel(&ada(), &snapshot(ListQuery::new(10)));

        assert_eq!(vm.header.user.as_deref(), Some("Ada Lovelace"));
        assert_eq!(vm.status.as_ref().map(|s| s.page.as_str()), Some("Page 2 of 3"));
        assert_eq!(vm.messages, vec!["Network error: refused".to_string()]);
        assert_eq!(
            vm.empty_state.map(|e| e.subtitle),
            Some("Get started by adding your first book.".to_string())
        );
    }

    #[test]
    fn empty_search_suggests_adjusting_terms() {
        let state = ShellState {
            screen: Screen::Books,
            authenticated: true,
            ..ShellState::default()
        };
        let mut query = ListQuery::new(10);
        query.search_term = "zzz".into();
        let vm = state.compute_viewmodel(&ada(), &snapshot(query));
        assert_eq!(
            vm.empty_state.map(|e| e.subtitle),
            Some("Try adjusting your search terms.".to_string())
        );
    }

    #[test]
    fn login_screen_shows_session_error() {
        let state = ShellState::default();
        let vm = state.compute_viewmodel(
            &SessionState::Error("Invalid email or password".into()),
            &snapshot(ListQuery::new(10)),
        );
        assert!(vm.status.is_none());
        assert_eq!(vm.messages, vec!["Invalid email or password".to_string()]);
    }
}
