//! Composable UI component renderers.
//!
//! Each component writes one section of the screen to the output sink and
//! returns I/O errors to the caller.
//!
//! # Components
//!
//! - [`header`]: Title bar with the signed-in user
//! - [`status`]: Page counter and active query settings
//! - [`table`]: Book rows (ID, TITLE, AUTHOR, YEAR, GENRE)
//! - [`empty`]: Empty state message
//! - [`footer`]: Command hints
//!
//! # Layout
//!
//! ```text
//! [Header]
//! [Border]
//! [Status]
//! [Messages]
//! [Table or Empty state]
//! [Border]
//! [Footer]
//! ```

mod empty;
mod footer;
mod header;
mod status;
mod table;

use std::io::{self, Write};

use crate::ui::viewmodel::UIViewModel;

use empty::render_empty_state;
use footer::render_footer;
use header::render_header;
use status::render_status;
use table::{render_table_headers, render_table_rows};

fn render_border(out: &mut dyn Write, cols: usize) -> io::Result<()> {
    writeln!(out, "{}", "─".repeat(cols))
}

fn render_messages(out: &mut dyn Write, messages: &[String]) -> io::Result<()> {
    for message in messages {
        writeln!(out, "! {message}")?;
    }
    Ok(())
}

/// Renders the full screen layout.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn render_screen(out: &mut dyn Write, vm: &UIViewModel, cols: usize) -> io::Result<()> {
    render_header(out, &vm.header, cols)?;
    render_border(out, cols)?;
    if let Some(status) = &vm.status {
        render_status(out, status)?;
    }
    render_messages(out, &vm.messages)?;

    if let Some(empty) = &vm.empty_state {
        render_empty_state(out, empty, cols)?;
    } else {
        render_table_headers(out, cols)?;
        render_table_rows(out, &vm.display_items, cols)?;
    }

    render_border(out, cols)?;
    render_footer(out, &vm.footer, cols)
}
