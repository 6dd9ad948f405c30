use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Trim, drop a single trailing `;`, trim again.
pub fn normalize_query_text(query: &str) -> &str {
    let trimmed = query.trim();
    trimmed.strip_suffix(';').unwrap_or(trimmed).trim()
}

/// Trim and collapse every whitespace run to one space. Used to compare a stored
/// query against the text currently in the buffer.
pub fn collapse_whitespace(query: &str) -> String {
    WHITESPACE_RUN.replace_all(query.trim(), " ").into_owned()
}

/// Trim a raw selection: leading whitespace, and trailing whitespace, newlines
/// and semicolons. Returns the number of chars skipped at the front together
/// with the remaining text.
pub fn trim_selection_text(selected: &str) -> (usize, &str) {
    let without_tail = selected.trim_end_matches(|c: char| c.is_whitespace() || c == ';');
    let body = without_tail.trim_start();
    let skipped = without_tail[..without_tail.len() - body.len()].chars().count();
    (skipped, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_query_text() {
        assert_eq!(normalize_query_text("  SELECT 1 ;  "), "SELECT 1");
        assert_eq!(normalize_query_text("SELECT 1;;"), "SELECT 1;");
        assert_eq!(normalize_query_text("\n\nSELECT 1\n"), "SELECT 1");
        assert_eq!(normalize_query_text(""), "");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(
            collapse_whitespace("  SELECT *\n\tFROM   t  "),
            "SELECT * FROM t"
        );
        assert_eq!(collapse_whitespace("SELECT 'a  b'"), "SELECT 'a b'");
    }

    #[test]
    fn test_trim_selection_text() {
        assert_eq!(trim_selection_text("  SELECT 1;\n\n"), (2, "SELECT 1"));
        assert_eq!(trim_selection_text("SELECT 1 ;;"), (0, "SELECT 1"));
        assert_eq!(trim_selection_text(" \n ;"), (0, ""));
    }
}
