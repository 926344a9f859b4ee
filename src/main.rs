//! Terminal shell for the bookshelf client.
//!
//! Reads one command per line from stdin, turns it into an [`Event`], lets the
//! library's event handler decide what to do, executes the resulting
//! [`Action`]s against the session store and book list controller, then
//! redraws the screen.
//!
//! # Runtime Loop
//!
//! ```text
//! stdin line → parse → Event ─┐
//!                             ├→ handle_event → Actions → stores
//! session watch / events ─────┘                              │
//!          ↑                                                 │
//!          └──────────── state changes, 401 expiry ──────────┘
//! ```
//!
//! Session changes are drained after every action, so a 401 seen while
//! fetching lands the shell on the login screen before the next prompt.
//!
//! # Usage
//!
//! ```bash
//! bookshelf                          # use config file and persisted session
//! bookshelf --ephemeral              # keep credentials in memory only
//! bookshelf --api-url https://books.example.com/api --page-size 20
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::BTreeMap;
use std::io::Write as _;
use std::process::ExitCode;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{broadcast, watch};

use bookshelf::app::{parse, HELP};
use bookshelf::books::DeleteOutcome;
use bookshelf::storage::MemoryStorage;
use bookshelf::ui::{render, DEFAULT_COLS};
use bookshelf::{
    handle_event, initialize, observability, Action, Config, Event, Library, LibraryError, Result,
    SessionEvent, SessionState, ShellState,
};

#[derive(Parser)]
#[command(name = "bookshelf")]
#[command(author, version, about = "Manage your personal library from the terminal")]
struct Cli {
    /// Backend base URL (overrides config and BOOKSHELF_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Books per page
    #[arg(long)]
    page_size: Option<u32>,

    /// Directory for the session file and logs
    #[arg(long)]
    data_dir: Option<String>,

    /// Log filter, e.g. `debug` or `bookshelf=trace`
    #[arg(long)]
    trace_level: Option<String>,

    /// Keep credentials in memory only; nothing is written to disk
    #[arg(long)]
    ephemeral: bool,

    /// Render width in columns
    #[arg(long, default_value_t = DEFAULT_COLS)]
    cols: usize,
}

impl Cli {
    fn overrides(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        if let Some(url) = &self.api_url {
            map.insert("api_url".to_string(), url.clone());
        }
        if let Some(size) = self.page_size {
            map.insert("page_size".to_string(), size.to_string());
        }
        if let Some(dir) = &self.data_dir {
            map.insert("data_dir".to_string(), dir.clone());
        }
        if let Some(level) = &self.trace_level {
            map.insert("trace_level".to_string(), level.clone());
        }
        map
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "shell exited with error");
            eprintln!("bookshelf: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;
    config.merge_map(&cli.overrides());
    config.validate()?;
    observability::init_tracing(&config);

    let library = if cli.ephemeral {
        tracing::debug!("using in-memory credential storage");
        Library::connect(&config, Box::new(MemoryStorage::new()))?
    } else {
        initialize(&config)?
    };

    let mut shell = Shell::new(library, cli.cols);
    shell.start().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    shell.prompt();
    while let Some(line) = lines.next_line().await? {
        let Some(event) = parse(&line) else {
            shell.prompt();
            continue;
        };
        if !shell.dispatch(event).await {
            break;
        }
        shell.prompt();
    }

    tracing::debug!("shell finished");
    Ok(())
}

/// Runtime state of the terminal shell.
struct Shell {
    library: Library,
    app: ShellState,
    session_rx: watch::Receiver<SessionState>,
    session_events: broadcast::Receiver<SessionEvent>,
    cols: usize,
}

impl Shell {
    fn new(library: Library, cols: usize) -> Self {
        let session_rx = library.session.subscribe();
        let session_events = library.session.events();
        Self {
            library,
            app: ShellState::default(),
            session_rx,
            session_events,
            cols,
        }
    }

    /// Restores the persisted session and draws the first screen.
    async fn start(&mut self) {
        let state = self.library.session.restore().await;
        tracing::debug!(authenticated = state.is_authenticated(), "session restored");
        self.sync_session().await;
        self.draw();
    }

    /// Handles one event and everything it triggers. Returns `false` to quit.
    async fn dispatch(&mut self, event: Event) -> bool {
        let (should_render, actions) = match handle_event(&mut self.app, &event) {
            Ok(result) => result,
            Err(e) => {
                tracing::debug!(error = %e, "error handling event");
                return true;
            }
        };
        tracing::debug!(
            event_type = event.kind(),
            action_count = actions.len(),
            should_render,
            "event handled"
        );

        let mut redraw = should_render;
        for action in actions {
            if matches!(action, Action::Quit) {
                return false;
            }
            redraw |= self.execute_action(action).await;
        }

        redraw |= self.sync_session().await;
        if redraw {
            self.draw();
        }
        true
    }

    /// Feeds pending session events and state changes back through the
    /// handler until nothing new arrives. Returns whether anything changed.
    async fn sync_session(&mut self) -> bool {
        let mut changed = false;
        loop {
            let mut pending = Vec::new();
            loop {
                match self.session_events.try_recv() {
                    Ok(SessionEvent::Expired) => pending.push(Event::SessionExpired),
                    Ok(SessionEvent::LoggedIn(_) | SessionEvent::LoggedOut) => {}
                    Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "session events lagged");
                    }
                    Err(_) => break,
                }
            }
            if self.session_rx.has_changed().unwrap_or(false) {
                let state = self.session_rx.borrow_and_update().clone();
                pending.push(Event::SessionChanged(state));
            }
            if pending.is_empty() {
                return changed;
            }

            for event in pending {
                let Ok((render, actions)) = handle_event(&mut self.app, &event) else {
                    continue;
                };
                changed |= render;
                for action in actions {
                    changed |= self.execute_action(action).await;
                }
            }
        }
    }

    /// Executes one action. Returns whether the screen should be redrawn.
    #[tracing::instrument(level = "debug", skip_all, fields(action = action.kind()))]
    async fn execute_action(&mut self, action: Action) -> bool {
        let session = &self.library.session;
        let books = &self.library.books;

        match action {
            Action::Login { email, password } => {
                if let Err(e @ LibraryError::Validation(_)) = session.login(&email, &password).await {
                    self.app.notice = Some(e.user_message());
                }
                true
            }
            Action::Register {
                first_name,
                last_name,
                email,
                password,
            } => {
                if let Err(e @ LibraryError::Validation(_)) = session
                    .register(&first_name, &last_name, &email, &password)
                    .await
                {
                    self.app.notice = Some(e.user_message());
                }
                true
            }
            Action::Logout => {
                session.logout();
                self.app.notice = Some("Logged out.".to_string());
                true
            }
            Action::ClearErrors => {
                session.clear_error();
                books.clear_list_error();
                books.clear_form_error();
                true
            }
            Action::UpdateQuery(patch) => {
                log_failure("update_query", books.set_query(patch).await);
                true
            }
            Action::Refresh => {
                log_failure("refresh", books.fetch().await);
                true
            }
            Action::NextPage => {
                log_failure("next_page", books.next_page().await);
                true
            }
            Action::PreviousPage => {
                log_failure("previous_page", books.previous_page().await);
                true
            }
            Action::GoToPage(page) => {
                log_failure("go_to_page", books.go_to_page(page).await);
                true
            }
            Action::ResetBooks => {
                books.reset();
                true
            }
            Action::CreateBook(draft) => {
                match books.create(&draft).await {
                    Ok(book) => self.app.notice = Some(format!("Added \"{}\" ({}).", book.title, book.id)),
                    Err(e @ LibraryError::Validation(_)) => self.app.notice = Some(e.user_message()),
                    Err(e) => tracing::debug!(error = %e, "create failed"),
                }
                true
            }
            Action::UpdateBook { id, draft } => {
                match books.update(&id, &draft).await {
                    Ok(book) => self.app.notice = Some(format!("Updated \"{}\".", book.title)),
                    Err(e @ LibraryError::Validation(_)) => self.app.notice = Some(e.user_message()),
                    Err(e) => tracing::debug!(error = %e, "update failed"),
                }
                true
            }
            Action::ShowBook(id) => match books.get(&id).await {
                Ok(book) => {
                    let mut out = std::io::stdout().lock();
                    let _ = writeln!(out, "{}", describe(&book));
                    false
                }
                Err(_) => true,
            },
            Action::DeleteBook { id, confirmation } => {
                match books.delete(&id, confirmation).await {
                    Ok(DeleteOutcome::Deleted) => {
                        self.app.notice = Some(format!("Deleted book {id}."));
                    }
                    Ok(DeleteOutcome::NotConfirmed) => {
                        self.app.notice = Some("Delete cancelled.".to_string());
                    }
                    Err(e) => tracing::debug!(error = %e, "delete failed"),
                }
                true
            }
            Action::ShowHelp => {
                let mut out = std::io::stdout().lock();
                let _ = writeln!(out, "{HELP}");
                false
            }
            Action::Quit => false,
        }
    }

    fn draw(&mut self) {
        let session = self.library.session.state();
        let list = self.library.books.snapshot();
        let vm = self.app.compute_viewmodel(&session, &list);

        let mut out = std::io::stdout().lock();
        if let Err(e) = render(&mut out, &vm, self.cols) {
            tracing::warn!(error = %e, "render failed");
        }
        // Notices are one-shot.
        self.app.notice = None;
    }

    fn prompt(&self) {
        let mut out = std::io::stdout().lock();
        let _ = write!(out, "> ");
        let _ = out.flush();
    }
}

fn log_failure<T>(operation: &'static str, result: Result<T>) {
    if let Err(e) = result {
        tracing::debug!(operation, error = %e, "list operation failed");
    }
}

fn describe(book: &bookshelf::domain::Book) -> String {
    let mut lines = vec![
        format!("{} ({})", book.title, book.id),
        format!("  by {}", book.author),
    ];
    if let Some(year) = book.published_year {
        lines.push(format!("  published {year}"));
    }
    if let Some(genre) = &book.genre {
        lines.push(format!("  genre {genre}"));
    }
    lines.push(format!(
        "  added {}, updated {}",
        book.created_at.format("%Y-%m-%d"),
        book.updated_at.format("%Y-%m-%d")
    ));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use bookshelf::api::{ApiReply, ApiRequest, Transport};
    use bookshelf::domain::BookDraft;

    #[derive(Default)]
    struct CountingTransport {
        sent: AtomicUsize,
    }

    #[async_trait]
    impl Transport for CountingTransport {
        async fn send(&self, _request: ApiRequest) -> Result<ApiReply> {
            self.sent.fetch_add(1, Ordering::SeqCst);
            Ok(ApiReply::new(404, ""))
        }
    }

    fn shell() -> (Shell, Arc<CountingTransport>) {
        let transport = Arc::new(CountingTransport::default());
        let library = Library::new(Box::new(MemoryStorage::new()), transport.clone(), 10);
        (Shell::new(library, DEFAULT_COLS), transport)
    }

    #[tokio::test]
    async fn invalid_new_book_is_reported_to_the_user() {
        let (mut shell, transport) = shell();

        let redraw = shell
            .execute_action(Action::CreateBook(BookDraft::new("", "Herbert")))
            .await;

        assert!(redraw);
        let notice = shell.app.notice.clone().unwrap_or_default();
        assert!(notice.contains("Title is required"), "notice was {notice:?}");
        assert_eq!(transport.sent.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn invalid_edit_is_reported_to_the_user() {
        let (mut shell, transport) = shell();

        shell
            .execute_action(Action::UpdateBook {
                id: "b1".into(),
                draft: BookDraft::new("Dune", "Herbert").with_year(99_999),
            })
            .await;

        let notice = shell.app.notice.clone().unwrap_or_default();
        assert!(notice.contains("Please enter a valid year"), "notice was {notice:?}");
        assert_eq!(transport.sent.load(Ordering::SeqCst), 0);
    }
}
