use tabular_statements::syntax::strip_sql_comments;
use tabular_statements::{
    Position, QueryKey, ScanOptions, SqlDocument, all_statements, resolve_at_cursor,
    statements_in_range, validate_query_at_offset,
};

const DOC: &str = "SELECT 1;\nSELECT 2;\nSELECT 3";

#[test]
fn three_statement_document_splits_by_row() {
    let all = all_statements(DOC);
    let got: Vec<_> = all.iter().map(|s| (s.text.as_str(), s.start.row)).collect();
    assert_eq!(got, vec![("SELECT 1", 0), ("SELECT 2", 1), ("SELECT 3", 2)]);
    // last one has no terminator and runs to the end of the text
    assert_eq!(all[2].end_offset, DOC.chars().count());
}

#[test]
fn cursor_inside_second_statement() {
    let got = resolve_at_cursor(DOC, Position::new(1, 1)).unwrap();
    assert_eq!(got.text, "SELECT 2");
    assert_eq!(got.start, Position::new(1, 0));
    assert_eq!(got.end, Position::new(1, 8));
}

#[test]
fn semicolon_in_literal_does_not_split() {
    let doc = "SELECT 'x;y'; SELECT 2;";
    let all = all_statements(doc);
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].text, "SELECT 'x;y'");
    assert_eq!(resolve_at_cursor(doc, Position::new(0, 18)).unwrap().text, "SELECT 2");

    let single = all_statements("SELECT 'a;b';");
    assert_eq!(single.len(), 1);
    assert_eq!(single[0].text, "SELECT 'a;b'");
}

#[test]
fn cursor_strictly_inside_always_resolves_to_that_statement() {
    let doc = "SELECT a\n  FROM t1;\nUPDATE t2 SET x = ';';  DELETE FROM t3";
    for statement in all_statements(doc) {
        for offset in statement.start_offset..statement.end_offset {
            let doc_view = SqlDocument::new(doc);
            let cursor = doc_view.offset_to_position(offset);
            let got = doc_view.statement_at_cursor(cursor).unwrap();
            assert_eq!(got.text, statement.text, "offset {offset}");
        }
    }
}

#[test]
fn caret_past_terminator_moves_to_next_statement() {
    let doc = "SELECT 1; SELECT 2";
    // on the `;` itself
    assert_eq!(resolve_at_cursor(doc, Position::new(0, 8)).unwrap().text, "SELECT 1");
    // right after it
    assert_eq!(resolve_at_cursor(doc, Position::new(0, 9)).unwrap().text, "SELECT 2");
    assert_eq!(resolve_at_cursor(doc, Position::new(0, 10)).unwrap().text, "SELECT 2");

    let tight = "SELECT 1;SELECT 2";
    assert_eq!(resolve_at_cursor(tight, Position::new(0, 9)).unwrap().text, "SELECT 2");
}

#[test]
fn range_resolution_stops_at_owning_statement() {
    let doc = "SELECT 1;\nSELECT 2;\nSELECT 3;\nSELECT 4;";
    let got: Vec<_> = statements_in_range(doc, Position::new(0, 0), Position::new(2, 0))
        .into_iter()
        .map(|s| s.text)
        .collect();
    assert_eq!(got, vec!["SELECT 1", "SELECT 2", "SELECT 3"]);
}

#[test]
fn validate_tracks_identity_and_edits() {
    let statement = resolve_at_cursor(DOC, Position::new(1, 4)).unwrap();
    let key = statement.query_key();
    let (text, offset) = key.split().unwrap();
    assert!(validate_query_at_offset(DOC, offset, text));

    let edited = DOC.replace("SELECT 2", "SELECT 20");
    assert!(!validate_query_at_offset(&edited, offset, text));

    let shifted = format!("\n{DOC}");
    assert!(!validate_query_at_offset(&shifted, offset, text));
    let moved = key.shift(0, 1);
    assert_eq!(moved, QueryKey::new("SELECT 2", 11));
    let (text, offset) = moved.split().unwrap();
    assert!(validate_query_at_offset(&shifted, offset, text));
}

#[test]
fn stripped_text_splits_at_the_same_offsets() {
    let doc = "-- setup\nSELECT 1; /* a;b */\nSELECT 'c--;' -- tail;\n;";
    let stripped = strip_sql_comments(doc);
    let plain: Vec<_> = all_statements(doc).into_iter().map(|s| s.start_offset).collect();
    let blanked: Vec<_> = all_statements(&stripped)
        .into_iter()
        .map(|s| s.start_offset)
        .collect();
    assert_eq!(plain, blanked);
    assert_eq!(plain.len(), 2);
}

#[test]
fn line_comments_can_be_turned_off() {
    let doc = "SELECT 1 -- a;b\n;";
    let options = ScanOptions {
        line_comments: false,
        ..ScanOptions::default()
    };
    assert_eq!(SqlDocument::new(doc).all_statements().len(), 1);
    let texts: Vec<_> = SqlDocument::with_options(doc, options)
        .all_statements()
        .into_iter()
        .map(|s| s.text)
        .collect();
    assert_eq!(texts, vec!["SELECT 1 -- a", "b\n"]);
}

#[test]
fn unterminated_literal_degrades_gracefully() {
    let doc = "SELECT 'oops;\nSELECT 2;\nSELECT 3;";
    let all = all_statements(doc);
    assert_eq!(all.len(), 1);
    assert!(resolve_at_cursor(doc, Position::new(2, 3)).is_some());
}
