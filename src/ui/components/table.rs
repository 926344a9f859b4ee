//! Table component renderer.
//!
//! Columns are ID, TITLE, AUTHOR, YEAR and GENRE. ID, YEAR and GENRE have fixed
//! widths; TITLE and AUTHOR share what is left of the terminal width.

use std::io::{self, Write};

use crate::ui::helpers::fit;
use crate::ui::viewmodel::DisplayItem;

const ID_WIDTH: usize = 10;
const YEAR_WIDTH: usize = 6;
const GENRE_WIDTH: usize = 14;
const MIN_TEXT_WIDTH: usize = 10;

/// Widths of the TITLE and AUTHOR columns for `cols` characters.
fn text_widths(cols: usize) -> (usize, usize) {
    // Four single-space gaps between five columns.
    let fixed = ID_WIDTH + YEAR_WIDTH + GENRE_WIDTH + 4;
    let remaining = cols.saturating_sub(fixed).max(MIN_TEXT_WIDTH * 2);
    let title = remaining * 3 / 5;
    (title, remaining - title)
}

fn row(out: &mut dyn Write, cells: [&str; 5], cols: usize) -> io::Result<()> {
    let (title_width, author_width) = text_widths(cols);
    let line = format!(
        "{} {} {} {} {}",
        fit(cells[0], ID_WIDTH),
        fit(cells[1], title_width),
        fit(cells[2], author_width),
        fit(cells[3], YEAR_WIDTH),
        fit(cells[4], GENRE_WIDTH),
    );
    writeln!(out, "{}", line.trim_end())
}

pub fn render_table_headers(out: &mut dyn Write, cols: usize) -> io::Result<()> {
    row(out, ["ID", "TITLE", "AUTHOR", "YEAR", "GENRE"], cols)
}

pub fn render_table_rows(out: &mut dyn Write, items: &[DisplayItem], cols: usize) -> io::Result<()> {
    for item in items {
        row(
            out,
            [
                item.id.as_str(),
                item.title.as_str(),
                item.author.as_str(),
                item.year.as_str(),
                item.genre.as_str(),
            ],
            cols,
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_fill_terminal_width() {
        let (title, author) = text_widths(100);
        assert_eq!(ID_WIDTH + title + author + YEAR_WIDTH + GENRE_WIDTH + 4, 100);
    }

    #[test]
    fn narrow_terminals_keep_a_minimum() {
        let (title, author) = text_widths(20);
        assert_eq!(title + author, MIN_TEXT_WIDTH * 2);
    }
}
