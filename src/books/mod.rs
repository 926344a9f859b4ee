//! Book list: fetching, paging, searching and editing book records.
//!
//! - `controller`: [`BookListController`] and its request sequencing
//! - `view`: the pure [`derived_view`] used for genre filtering and sorting

pub mod controller;
pub mod view;

pub use controller::{
    BookListController, Confirmation, DeleteOutcome, FetchOutcome, FetchTicket, ListSnapshot,
};
pub use view::derived_view;
