//! Footer component renderer.

use std::io::{self, Write};

use crate::ui::helpers::center;
use crate::ui::viewmodel::FooterInfo;

/// Renders the command hints centered, truncated to the terminal width.
pub fn render_footer(out: &mut dyn Write, footer: &FooterInfo, cols: usize) -> io::Result<()> {
    writeln!(out, "{}", center(&footer.keybindings, cols).trim_end())
}
