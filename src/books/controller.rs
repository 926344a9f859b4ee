//! Paginated book list with search, genre filter and sorting.
//!
//! The controller keeps the last page the server returned and derives the
//! visible list from it. Server-side concerns (page, page size, search) trigger
//! a fetch; genre and sort only re-derive.
//!
//! Every fetch takes a [`FetchTicket`]. When fetches overlap, only the most
//! recently issued ticket is applied, whatever order the responses arrive in.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::api::{ApiClient, BookPage};
use crate::books::view::derived_view;
use crate::domain::book::{Book, BookDraft};
use crate::domain::error::{LibraryError, Result};
use crate::domain::query::{ListQuery, QueryChange, QueryPatch};

/// Proof that a fetch was started, carrying the parameters it was issued with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    page: u32,
    page_size: u32,
    search: Option<String>,
}

impl FetchTicket {
    #[must_use]
    pub const fn seq(&self) -> u64 {
        self.seq
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response became the current page.
    Applied,
    /// A newer fetch was issued after this one; the response was dropped.
    Discarded,
}

/// Answer to "Are you sure you want to delete this book?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Self::Confirmed
        } else {
            Self::Declined
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotConfirmed,
}

/// Point-in-time copy of the controller state for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSnapshot {
    pub query: ListQuery,
    /// Records exactly as fetched, before filtering and sorting.
    pub records: Vec<Book>,
    /// The derived view: genre-filtered and sorted.
    pub visible: Vec<Book>,
    pub current_page: u32,
    pub total_pages: u32,
    pub loading: bool,
    pub submitting: bool,
    pub list_error: Option<String>,
    pub form_error: Option<String>,
}

#[derive(Debug)]
struct ListState {
    query: ListQuery,
    records: Vec<Book>,
    current_page: u32,
    total_pages: u32,
    loading: bool,
    submitting: bool,
    loaded_once: bool,
    list_error: Option<String>,
    form_error: Option<String>,
    /// Sequence number of the most recently issued ticket.
    issued: u64,
}

impl ListState {
    fn new(page_size: u32) -> Self {
        Self {
            query: ListQuery::new(page_size),
            records: Vec::new(),
            current_page: 1,
            total_pages: 1,
            loading: false,
            submitting: false,
            loaded_once: false,
            list_error: None,
            form_error: None,
            issued: 0,
        }
    }
}

/// Book list state shared by the shell and its commands.
pub struct BookListController {
    api: ApiClient,
    inner: Mutex<ListState>,
}

impl BookListController {
    pub fn new(api: ApiClient, page_size: u32) -> Self {
        Self {
            api,
            inner: Mutex::new(ListState::new(page_size)),
        }
    }

    fn state(&self) -> MutexGuard<'_, ListState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn query(&self) -> ListQuery {
        self.state().query.clone()
    }

    #[must_use]
    pub fn snapshot(&self) -> ListSnapshot {
        let state = self.state();
        ListSnapshot {
            query: state.query.clone(),
            records: state.records.clone(),
            visible: Self::derive(&state),
            current_page: state.current_page,
            total_pages: state.total_pages,
            loading: state.loading,
            submitting: state.submitting,
            list_error: state.list_error.clone(),
            form_error: state.form_error.clone(),
        }
    }

    /// Fetched records filtered by genre and sorted by the current sort settings.
    #[must_use]
    pub fn derived_view(&self) -> Vec<Book> {
        Self::derive(&self.state())
    }

    fn derive(state: &ListState) -> Vec<Book> {
        derived_view(
            &state.records,
            state.query.genre_filter.as_deref(),
            state.query.sort_key,
            state.query.sort_direction,
        )
    }

    /// Issues a ticket for the current page, page size and search term.
    pub fn begin_fetch(&self) -> FetchTicket {
        let mut state = self.state();
        state.issued += 1;
        state.loading = true;
        let ticket = FetchTicket {
            seq: state.issued,
            page: state.query.page,
            page_size: state.query.page_size,
            search: state.query.search().map(str::to_string),
        };
        tracing::debug!(
            seq = ticket.seq,
            page = ticket.page,
            page_size = ticket.page_size,
            search = ?ticket.search,
            "fetch issued"
        );
        ticket
    }

    /// Applies the response for `ticket` unless a newer ticket was issued.
    ///
    /// # Errors
    ///
    /// Returns the fetch error after recording it as the list error. A 401 is
    /// returned without a list message. Errors for discarded tickets are
    /// dropped and reported as [`FetchOutcome::Discarded`].
    pub fn complete_fetch(
        &self,
        ticket: FetchTicket,
        result: Result<BookPage>,
    ) -> Result<FetchOutcome> {
        let _span = tracing::debug_span!("complete_fetch", seq = ticket.seq).entered();

        let mut state = self.state();
        if ticket.seq != state.issued {
            tracing::debug!(latest = state.issued, "stale response discarded");
            return Ok(FetchOutcome::Discarded);
        }
        state.loading = false;

        match result {
            Ok(page) => {
                tracing::debug!(
                    count = page.records.len(),
                    current_page = page.current_page,
                    total_pages = page.total_pages,
                    "page applied"
                );
                state.records = page.records;
                state.current_page = page.current_page;
                state.total_pages = page.total_pages;
                state.loaded_once = true;
                state.list_error = None;
                Ok(FetchOutcome::Applied)
            }
            Err(e) => {
                if !e.is_session_expired() {
                    tracing::warn!(error = %e, "fetch failed");
                    state.list_error = Some(e.user_message());
                }
                if !state.loaded_once {
                    state.records.clear();
                }
                Err(e)
            }
        }
    }

    /// Fetches the current page.
    ///
    /// # Errors
    ///
    /// See [`BookListController::complete_fetch`].
    pub async fn fetch(&self) -> Result<FetchOutcome> {
        let ticket = self.begin_fetch();
        let result = self
            .api
            .list_books(ticket.page, ticket.page_size, ticket.search.as_deref())
            .await;
        self.complete_fetch(ticket, result)
    }

    /// Merges `patch` into the query and refetches if the server would answer
    /// differently.
    ///
    /// # Errors
    ///
    /// Propagates the refetch error, which is also recorded as the list error.
    pub async fn set_query(&self, patch: QueryPatch) -> Result<QueryChange> {
        let change = {
            let mut state = self.state();
            let change = state.query.merge(patch);
            tracing::debug!(
                page = state.query.page,
                search = %state.query.search_term,
                genre = ?state.query.genre_filter,
                sort_key = %state.query.sort_key,
                sort_direction = %state.query.sort_direction,
                refetch = change.refetch,
                "query updated"
            );
            change
        };

        if change.refetch {
            self.fetch().await?;
        }
        Ok(change)
    }

    /// Moves one page forward, stopping at the last page.
    ///
    /// # Errors
    ///
    /// See [`BookListController::set_query`].
    pub async fn next_page(&self) -> Result<QueryChange> {
        let target = {
            let state = self.state();
            state.query.page.saturating_add(1).min(state.total_pages)
        };
        self.go_to_page(target).await
    }

    /// Moves one page back, stopping at the first page.
    ///
    /// # Errors
    ///
    /// See [`BookListController::set_query`].
    pub async fn previous_page(&self) -> Result<QueryChange> {
        let target = self.state().query.page.saturating_sub(1);
        self.go_to_page(target).await
    }

    /// Jumps to `page`, clamped to the known page range.
    ///
    /// # Errors
    ///
    /// See [`BookListController::set_query`].
    pub async fn go_to_page(&self, page: u32) -> Result<QueryChange> {
        let page = {
            let state = self.state();
            page.clamp(1, state.total_pages.max(1))
        };
        self.set_query(QueryPatch::page(page)).await
    }

    /// Fetches one book, for pre-filling the edit form.
    ///
    /// # Errors
    ///
    /// Returns the backend error after recording it as the form error.
    pub async fn get(&self, id: &str) -> Result<Book> {
        let result = self.api.get_book(id).await;
        if let Err(e) = &result {
            self.record_form_error(e);
        }
        result
    }

    /// Validates and creates a book, then refetches the current page.
    ///
    /// # Errors
    ///
    /// - [`LibraryError::Validation`] before any request
    /// - the backend error, also recorded as the form error
    pub async fn create(&self, draft: &BookDraft) -> Result<Book> {
        draft.check()?;
        tracing::debug!(title = %draft.title, "creating book");
        self.submit(self.api.create_book(draft)).await
    }

    /// Validates and updates book `id`, then refetches the current page.
    ///
    /// # Errors
    ///
    /// Same as [`BookListController::create`].
    pub async fn update(&self, id: &str, draft: &BookDraft) -> Result<Book> {
        draft.check()?;
        tracing::debug!(book_id = %id, "updating book");
        self.submit(self.api.update_book(id, draft)).await
    }

    async fn submit<F>(&self, request: F) -> Result<Book>
    where
        F: Future<Output = Result<Book>>,
    {
        {
            let mut state = self.state();
            state.submitting = true;
            state.form_error = None;
        }

        let result = request.await;
        self.state().submitting = false;

        match result {
            Ok(book) => {
                tracing::info!(book_id = %book.id, "book saved");
                if let Err(e) = self.fetch().await {
                    tracing::debug!(error = %e, "refresh after save failed");
                }
                Ok(book)
            }
            Err(e) => {
                self.record_form_error(&e);
                Err(e)
            }
        }
    }

    /// Deletes book `id` if `confirmation` allows it, then refetches.
    ///
    /// # Errors
    ///
    /// Returns the backend error after recording it as the list error. The
    /// current records are left as they were.
    pub async fn delete(&self, id: &str, confirmation: Confirmation) -> Result<DeleteOutcome> {
        if confirmation == Confirmation::Declined {
            tracing::debug!(book_id = %id, "delete not confirmed");
            return Ok(DeleteOutcome::NotConfirmed);
        }

        if let Err(e) = self.api.delete_book(id).await {
            if !e.is_session_expired() {
                tracing::warn!(book_id = %id, error = %e, "delete failed");
                self.state().list_error = Some(e.user_message());
            }
            return Err(e);
        }

        tracing::info!(book_id = %id, "book deleted");
        if let Err(e) = self.fetch().await {
            tracing::debug!(error = %e, "refresh after delete failed");
        }
        Ok(DeleteOutcome::Deleted)
    }

    /// Waits for `confirm` and deletes only if it resolves to `true`.
    ///
    /// # Errors
    ///
    /// See [`BookListController::delete`].
    pub async fn delete_after<F>(&self, id: &str, confirm: F) -> Result<DeleteOutcome>
    where
        F: Future<Output = bool>,
    {
        let confirmation = Confirmation::from(confirm.await);
        self.delete(id, confirmation).await
    }

    pub fn clear_list_error(&self) {
        self.state().list_error = None;
    }

    pub fn clear_form_error(&self) {
        self.state().form_error = None;
    }

    /// Drops everything fetched so far and invalidates in-flight fetches.
    ///
    /// The page size is kept; the rest of the query returns to defaults.
    pub fn reset(&self) {
        let mut state = self.state();
        let issued = state.issued;
        let page_size = state.query.page_size;
        *state = ListState::new(page_size);
        state.issued = issued + 1;
        tracing::debug!("book list reset");
    }

    fn record_form_error(&self, error: &LibraryError) {
        if !error.is_session_expired() {
            tracing::warn!(error = %error, "form request failed");
            self.state().form_error = Some(error.user_message());
        }
    }
}
