//! Status line renderer.
//!
//! Shows the page counter followed by whichever query settings are active:
//!
//! ```text
//! Page 2 of 5 · search "dune" · genre Sci-Fi · sort title asc
//! ```

use std::io::{self, Write};

use crate::ui::viewmodel::StatusInfo;

pub fn render_status(out: &mut dyn Write, status: &StatusInfo) -> io::Result<()> {
    let mut parts = vec![status.page.clone()];
    if let Some(search) = &status.search {
        parts.push(format!("search \"{search}\""));
    }
    if let Some(genre) = &status.genre {
        parts.push(format!("genre {genre}"));
    }
    parts.push(format!("sort {}", status.sort));
    if status.loading {
        parts.push("loading…".to_string());
    }
    writeln!(out, "{}", parts.join(" · "))
}
