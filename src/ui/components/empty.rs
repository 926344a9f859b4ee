//! Empty state component renderer.

use std::io::{self, Write};

use crate::ui::helpers::center;
use crate::ui::viewmodel::EmptyState;

/// Renders the two-line empty state, centered, with a blank line above.
pub fn render_empty_state(out: &mut dyn Write, empty: &EmptyState, cols: usize) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", center(&empty.message, cols).trim_end())?;
    writeln!(out, "{}", center(&empty.subtitle, cols).trim_end())?;
    writeln!(out)
}
