//! Top-level rendering coordinator.

use std::io::{self, Write};

use crate::ui::components;
use crate::ui::viewmodel::UIViewModel;

/// Default width when the terminal size is unknown.
pub const DEFAULT_COLS: usize = 80;

/// Writes `vm` to `out` as plain text.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn render(out: &mut dyn Write, vm: &UIViewModel, cols: usize) -> io::Result<()> {
    components::render_screen(out, vm, cols)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::viewmodel::{DisplayItem, EmptyState, FooterInfo, HeaderInfo, StatusInfo};

    fn vm() -> UIViewModel {
        UIViewModel {
            header: HeaderInfo {
                title: "Bookshelf".into(),
                user: Some("Ada Lovelace".into()),
            },
            status: Some(StatusInfo {
                page: "Page 1 of 2".into(),
                search: Some("dune".into()),
                genre: None,
                sort: "title asc".into(),
                loading: false,
            }),
            display_items: vec![DisplayItem {
                id: "b1".into(),
                title: "Dune".into(),
                author: "Frank Herbert".into(),
                year: "1965".into(),
                genre: "Sci-Fi".into(),
            }],
            messages: vec!["Book saved.".into()],
            empty_state: None,
            footer: FooterInfo {
                keybindings: "help".into(),
            },
        }
    }

    fn rendered(vm: &UIViewModel) -> String {
        let mut out = Vec::new();
        render(&mut out, vm, DEFAULT_COLS).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn renders_header_status_and_rows() {
        let text = rendered(&vm());
        assert!(text.contains("Bookshelf · Ada Lovelace"));
        assert!(text.contains("Page 1 of 2 · search \"dune\" · sort title asc"));
        assert!(text.contains("! Book saved."));
        assert!(text.contains("Frank Herbert"));
    }

    #[test]
    fn empty_state_replaces_table() {
        let mut vm = vm();
        vm.display_items.clear();
        vm.empty_state = Some(EmptyState {
            message: "No books yet".into(),
            subtitle: "Get started by adding your first book.".into(),
        });
        let text = rendered(&vm);
        assert!(text.contains("Get started by adding your first book."));
        assert!(!text.contains("TITLE"));
    }
}
