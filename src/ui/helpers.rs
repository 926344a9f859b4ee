//! Shared text layout utilities.
//!
//! All widths are in characters, not bytes, so titles with accents or CJK
//! text do not break column alignment.

/// Cuts `text` to at most `width` characters, ending in `…` when shortened.
#[must_use]
pub fn truncate(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(width - 1).collect();
    out.push('…');
    out
}

/// `text` truncated or right-padded with spaces to exactly `width` characters.
#[must_use]
pub fn fit(text: &str, width: usize) -> String {
    let cut = truncate(text, width);
    let pad = width.saturating_sub(cut.chars().count());
    format!("{cut}{}", " ".repeat(pad))
}

/// `text` centered in `cols` characters, padded on both sides.
#[must_use]
pub fn center(text: &str, cols: usize) -> String {
    let cut = truncate(text, cols);
    let len = cut.chars().count();
    let left = cols.saturating_sub(len) / 2;
    let right = cols.saturating_sub(left + len);
    format!("{}{cut}{}", " ".repeat(left), " ".repeat(right))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("Les Misérables", 20), "Les Misérables");
        assert_eq!(truncate("Les Misérables", 8), "Les Mis…");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn fit_pads_short_text() {
        assert_eq!(fit("Dune", 6), "Dune  ");
        assert_eq!(fit("Dune Messiah", 6), "Dune …");
    }

    #[test]
    fn center_splits_padding() {
        assert_eq!(center("ab", 6), "  ab  ");
        assert_eq!(center("abc", 6), " abc  ");
    }
}
