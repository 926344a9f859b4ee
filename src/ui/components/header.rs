//! Header component renderer.

use std::io::{self, Write};

use crate::ui::helpers::center;
use crate::ui::viewmodel::HeaderInfo;

/// Renders the title centered, with the user name appended when signed in.
pub fn render_header(out: &mut dyn Write, header: &HeaderInfo, cols: usize) -> io::Result<()> {
    let title = match &header.user {
        Some(user) => format!("{} · {user}", header.title),
        None => header.title.clone(),
    };
    writeln!(out, "{}", center(&title, cols).trim_end())
}
