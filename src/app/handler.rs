//! Event handling and state transition logic.
//!
//! [`handle_event`] is synchronous and never touches the network. It updates
//! [`ShellState`], decides which side effects are needed and returns them as
//! [`Action`]s for the runtime to execute. Session changes observed by the
//! runtime come back in as events, so screen switches and the protected-route
//! rule live here too.
//!
//! # Example
//!
//! ```rust
//! use bookshelf::app::{handle_event, Action, Event, ShellState};
//!
//! let mut state = ShellState::default();
//! let (render, actions) = handle_event(&mut state, &Event::NextPage)?;
//! assert!(render);
//! assert!(actions.is_empty()); // refused: nobody is signed in
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::app::modes::{InputMode, Screen};
use crate::app::{Action, ShellState};
use crate::books::Confirmation;
use crate::domain::book::BookDraft;
use crate::domain::error::Result;
use crate::domain::query::{QueryPatch, SortDirection, SortKey};
use crate::session::SessionState;

/// Notice shown when a book command is issued without a session.
pub const LOGIN_REQUIRED: &str = "Please log in to manage your books.";
/// Notice shown after the backend rejected the session token.
pub const SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";

/// Events triggered by user commands or by session changes.
#[derive(Clone, PartialEq, Eq)]
pub enum Event {
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
    Dismiss,

    Refresh,
    Search(String),
    /// `None` clears the filter.
    Genre(Option<String>),
    Sort {
        key: SortKey,
        direction: SortDirection,
    },
    NextPage,
    PreviousPage,
    GoToPage(u32),

    Add(BookDraft),
    Edit {
        id: String,
        draft: BookDraft,
    },
    Show(String),
    Delete(String),
    Confirm,
    Decline,

    Help,
    Quit,
    /// A command that failed to parse, with the message to show.
    Invalid(String),

    /// The session store published a new state.
    SessionChanged(SessionState),
    /// The backend rejected the token; the session is already cleared.
    SessionExpired,
}

impl Event {
    /// Variant name, safe to log.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Login { .. } => "login",
            Self::Register { .. } => "register",
            Self::Logout => "logout",
            Self::Dismiss => "dismiss",
            Self::Refresh => "refresh",
            Self::Search(_) => "search",
            Self::Genre(_) => "genre",
            Self::Sort { .. } => "sort",
            Self::NextPage => "next_page",
            Self::PreviousPage => "previous_page",
            Self::GoToPage(_) => "go_to_page",
            Self::Add(_) => "add",
            Self::Edit { .. } => "edit",
            Self::Show(_) => "show",
            Self::Delete(_) => "delete",
            Self::Confirm => "confirm",
            Self::Decline => "decline",
            Self::Help => "help",
            Self::Quit => "quit",
            Self::Invalid(_) => "invalid",
            Self::SessionChanged(_) => "session_changed",
            Self::SessionExpired => "session_expired",
        }
    }

    /// Whether the event reads or changes books and so needs a session.
    #[must_use]
    pub const fn requires_session(&self) -> bool {
        matches!(
            self,
            Self::Refresh
                | Self::Search(_)
                | Self::Genre(_)
                | Self::Sort { .. }
                | Self::NextPage
                | Self::PreviousPage
                | Self::GoToPage(_)
                | Self::Add(_)
                | Self::Edit { .. }
                | Self::Show(_)
                | Self::Delete(_)
        )
    }
}

impl std::fmt::Debug for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.kind())
    }
}

/// Processes an event, mutates shell state, and returns actions to execute.
///
/// The boolean is `true` when the screen should be redrawn.
///
/// # Errors
///
/// Currently infallible; the `Result` keeps the signature stable for handlers
/// that may need to fail.
pub fn handle_event(state: &mut ShellState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = event.kind()).entered();

    // A pending delete only survives an explicit answer.
    if let InputMode::ConfirmDelete { id } = &state.input_mode {
        let id = id.clone();
        match event {
            Event::Confirm => {
                state.input_mode = InputMode::Normal;
                tracing::debug!(book_id = %id, "delete confirmed");
                return Ok((
                    true,
                    vec![Action::DeleteBook {
                        id,
                        confirmation: Confirmation::Confirmed,
                    }],
                ));
            }
            Event::Decline => {
                state.input_mode = InputMode::Normal;
                state.notice = Some("Delete cancelled.".to_string());
                return Ok((true, vec![]));
            }
            _ => {
                tracing::debug!(book_id = %id, "pending delete abandoned");
                state.input_mode = InputMode::Normal;
            }
        }
    }

    if event.requires_session() && !state.authenticated {
        tracing::debug!("book command refused without a session");
        state.screen = Screen::Login;
        state.notice = Some(LOGIN_REQUIRED.to_string());
        return Ok((true, vec![]));
    }

    match event {
        Event::Login { email, password } => {
            if state.authenticated {
                state.notice = Some("Already logged in. Use `logout` first.".to_string());
                return Ok((true, vec![]));
            }
            state.notice = None;
            Ok((
                false,
                vec![Action::Login {
                    email: email.clone(),
                    password: password.clone(),
                }],
            ))
        }
        Event::Register {
            first_name,
            last_name,
            email,
            password,
        } => {
            if state.authenticated {
                state.notice = Some("Already logged in. Use `logout` first.".to_string());
                return Ok((true, vec![]));
            }
            state.notice = None;
            Ok((
                false,
                vec![Action::Register {
                    first_name: first_name.clone(),
                    last_name: last_name.clone(),
                    email: email.clone(),
                    password: password.clone(),
                }],
            ))
        }
        Event::Logout => {
            state.notice = None;
            Ok((false, vec![Action::Logout]))
        }
        Event::Dismiss => {
            state.notice = None;
            Ok((true, vec![Action::ClearErrors]))
        }
        Event::Refresh => Ok((true, vec![Action::Refresh])),
        Event::Search(term) => Ok((true, vec![Action::UpdateQuery(QueryPatch::search(term.clone()))])),
        Event::Genre(genre) => Ok((true, vec![Action::UpdateQuery(QueryPatch::genre(genre.clone()))])),
        Event::Sort { key, direction } => Ok((
            true,
            vec![Action::UpdateQuery(QueryPatch::sort(*key, *direction))],
        )),
        Event::NextPage => Ok((true, vec![Action::NextPage])),
        Event::PreviousPage => Ok((true, vec![Action::PreviousPage])),
        Event::GoToPage(page) => Ok((true, vec![Action::GoToPage(*page)])),
        Event::Add(draft) => Ok((true, vec![Action::CreateBook(draft.clone())])),
        Event::Edit { id, draft } => Ok((
            true,
            vec![Action::UpdateBook {
                id: id.clone(),
                draft: draft.clone(),
            }],
        )),
        Event::Show(id) => Ok((false, vec![Action::ShowBook(id.clone())])),
        Event::Delete(id) => {
            state.input_mode = InputMode::ConfirmDelete { id: id.clone() };
            state.notice = Some(format!(
                "Are you sure you want to delete book {id}? (yes/no)"
            ));
            Ok((true, vec![]))
        }
        Event::Confirm | Event::Decline => {
            state.notice = Some("Nothing to confirm.".to_string());
            Ok((true, vec![]))
        }
        Event::Help => Ok((false, vec![Action::ShowHelp])),
        Event::Quit => Ok((false, vec![Action::Quit])),
        Event::Invalid(message) => {
            state.notice = Some(message.clone());
            Ok((true, vec![]))
        }
        Event::SessionChanged(session) => Ok(apply_session(state, session)),
        Event::SessionExpired => {
            let was_authenticated = state.authenticated;
            state.authenticated = false;
            state.screen = Screen::Login;
            state.input_mode = InputMode::Normal;
            state.notice = Some(SESSION_EXPIRED.to_string());
            let actions = if was_authenticated {
                vec![Action::ResetBooks]
            } else {
                vec![]
            };
            Ok((true, actions))
        }
    }
}

fn apply_session(state: &mut ShellState, session: &SessionState) -> (bool, Vec<Action>) {
    match session {
        SessionState::Authenticated(user) => {
            if state.authenticated {
                return (false, vec![]);
            }
            tracing::debug!(user_id = %user.id, "entering books screen");
            state.authenticated = true;
            state.screen = Screen::Books;
            (true, vec![Action::Refresh])
        }
        SessionState::Anonymous | SessionState::Error(_) => {
            let was_authenticated = state.authenticated;
            state.authenticated = false;
            state.screen = Screen::Login;
            state.input_mode = InputMode::Normal;
            let actions = if was_authenticated {
                vec![Action::ResetBooks]
            } else {
                vec![]
            };
            (true, actions)
        }
        SessionState::Uninitialized | SessionState::Loading => (false, vec![]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{Role, User};

    fn user() -> User {
        User {
            id: "u1".into(),
            email: "ada@example.com".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            role: Role::User,
        }
    }

    fn signed_in() -> ShellState {
        let mut state = ShellState::default();
        handle_event(&mut state, &Event::SessionChanged(SessionState::Authenticated(user()))).unwrap();
        state
    }

    #[test]
    fn book_commands_need_a_session() {
        let mut state = ShellState::default();
        let (render, actions) = handle_event(&mut state, &Event::Refresh).unwrap();
        assert!(render);
        assert!(actions.is_empty());
        assert_eq!(state.screen, Screen::Login);
        assert_eq!(state.notice.as_deref(), Some(LOGIN_REQUIRED));
    }

    #[test]
    fn authentication_switches_screen_and_refreshes() {
        let mut state = ShellState::default();
        let (_, actions) =
            handle_event(&mut state, &Event::SessionChanged(SessionState::Authenticated(user())))
                .unwrap();
        assert_eq!(state.screen, Screen::Books);
        assert_eq!(actions, vec![Action::Refresh]);

        let (_, again) =
            handle_event(&mut state, &Event::SessionChanged(SessionState::Authenticated(user())))
                .unwrap();
        assert!(again.is_empty());
    }

    #[test]
    fn delete_waits_for_yes() {
        let mut state = signed_in();
        let (_, actions) = handle_event(&mut state, &Event::Delete("b1".into())).unwrap();
        assert!(actions.is_empty());
        assert_eq!(state.input_mode, InputMode::ConfirmDelete { id: "b1".into() });

        let (_, actions) = handle_event(&mut state, &Event::Confirm).unwrap();
        assert_eq!(
            actions,
            vec![Action::DeleteBook {
                id: "b1".into(),
                confirmation: Confirmation::Confirmed
            }]
        );
        assert_eq!(state.input_mode, InputMode::Normal);
    }

    #[test]
    fn declining_or_moving_on_cancels_delete() {
        let mut state = signed_in();
        handle_event(&mut state, &Event::Delete("b1".into())).unwrap();
        let (_, actions) = handle_event(&mut state, &Event::Decline).unwrap();
        assert!(actions.is_empty());

        handle_event(&mut state, &Event::Delete("b1".into())).unwrap();
        let (_, actions) = handle_event(&mut state, &Event::NextPage).unwrap();
        assert_eq!(actions, vec![Action::NextPage]);
        assert_eq!(state.input_mode, InputMode::Normal);
    }

    #[test]
    fn expiry_returns_to_login_once() {
        let mut state = signed_in();
        let (_, actions) = handle_event(&mut state, &Event::SessionExpired).unwrap();
        assert_eq!(actions, vec![Action::ResetBooks]);
        assert_eq!(state.screen, Screen::Login);
        assert_eq!(state.notice.as_deref(), Some(SESSION_EXPIRED));

        let (_, actions) = handle_event(&mut state, &Event::SessionExpired).unwrap();
        assert!(actions.is_empty());
    }

    #[test]
    fn search_becomes_query_patch() {
        let mut state = signed_in();
        let (_, actions) = handle_event(&mut state, &Event::Search("dune".into())).unwrap();
        assert_eq!(actions, vec![Action::UpdateQuery(QueryPatch::search("dune"))]);
    }

    #[test]
    fn event_debug_hides_credentials() {
        let event = Event::Login {
            email: "ada@example.com".into(),
            password: "hunter22".into(),
        };
        assert!(!format!("{event:?}").contains("hunter22"));
    }
}
