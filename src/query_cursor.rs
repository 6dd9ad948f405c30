//! Picks the statement to run, explain or fix for a caret or a selection.

use std::ops::Range;

use log::debug;

use crate::editor_position::{char_len, offset_to_position, slice_chars};
use crate::models::structs::{
    Position, QueryRequest, ScanOptions, SelectionSlice, Statement, StatementSpan,
};
use crate::query_range::all_spans;
use crate::query_scanner::{ScanResult, scan_statements};
use crate::query_tools::trim_selection_text;
use crate::syntax::is_blank_sql;

/// Choose between the last completed span and the owning span for `cursor`.
///
/// When both cover the cursor row (two statements sharing a line), a caret
/// anywhere past the completed statement's `;` belongs to the owning one.
pub fn pick_span(scan: &ScanResult, cursor: Position) -> Option<&StatementSpan> {
    let last = scan
        .last_completed()
        .filter(|span| span.contains_row(cursor.row));
    let owning = scan
        .owning
        .as_ref()
        .filter(|span| span.contains_row(cursor.row));

    match (last, owning) {
        (Some(last), None) => Some(last),
        (None, Some(owning)) => Some(owning),
        (Some(last), Some(owning)) => {
            if cursor.column > last.end.column {
                Some(owning)
            } else {
                Some(last)
            }
        }
        (None, None) => None,
    }
}

pub fn resolve_at_cursor(text: &str, cursor: Position) -> Option<Statement> {
    statement_at_cursor(text, cursor, &ScanOptions::default())
}

pub fn statement_at_cursor(text: &str, cursor: Position, options: &ScanOptions) -> Option<Statement> {
    let scan = scan_statements(text, 0, cursor, options);
    pick_span(&scan, cursor).map(|span| Statement::from_span(text, span))
}

/// The trimmed selection as a statement, or `None` when nothing but
/// whitespace, comments or semicolons is selected.
pub fn selection_statement(
    text: &str,
    selection: Range<usize>,
    options: &ScanOptions,
) -> Option<Statement> {
    let start = selection.start.min(selection.end);
    let end = selection.start.max(selection.end).min(char_len(text));
    if start >= end {
        return None;
    }
    let raw = slice_chars(text, start, end);
    let (skipped, body) = trim_selection_text(raw);
    if body.is_empty() || is_blank_sql(body, options) {
        return None;
    }
    let start_offset = start + skipped;
    let end_offset = start_offset + body.chars().count();
    Some(Statement {
        text: body.to_string(),
        start: offset_to_position(text, start_offset),
        end: offset_to_position(text, end_offset),
        start_offset,
        end_offset,
        is_selection: true,
    })
}

/// A non-blank selection wins over the caret; otherwise resolve at the caret.
pub fn resolve(
    text: &str,
    cursor: Position,
    selection: Option<Range<usize>>,
    options: &ScanOptions,
) -> Option<Statement> {
    if let Some(statement) = selection.and_then(|range| selection_statement(text, range, options))
    {
        return Some(statement);
    }
    statement_at_cursor(text, cursor, options)
}

/// Requests to run for a caret and optional selection.
///
/// A selection spanning several statements yields one request per statement it
/// touches, each carrying the part of the selection inside that statement.
/// Parts that are blank once trimmed are dropped.
pub fn statements_for_selection(
    text: &str,
    cursor: Position,
    selection: Option<Range<usize>>,
    options: &ScanOptions,
) -> Vec<QueryRequest> {
    let Some(selected) = selection.and_then(|range| selection_statement(text, range, options))
    else {
        return statement_at_cursor(text, cursor, options)
            .map(QueryRequest::for_statement)
            .into_iter()
            .collect();
    };

    let (sel_start, sel_end) = (selected.start_offset, selected.end_offset);
    let requests: Vec<QueryRequest> = all_spans(text, options)
        .iter()
        .filter(|span| span.end_offset >= sel_start && span.start_offset <= sel_end)
        .filter_map(|span| {
            let start = span.start_offset.max(sel_start);
            let end = span.end_offset.min(sel_end);
            let piece = slice_chars(text, start, end);
            if is_blank_sql(piece, options) {
                return None;
            }
            Some(QueryRequest {
                statement: Statement::from_span(text, span),
                selection: Some(SelectionSlice {
                    start_offset: start,
                    end_offset: end,
                    text: piece.to_string(),
                }),
            })
        })
        .collect();
    debug!(
        "selection {}..{} covers {} statement(s)",
        sel_start,
        sel_end,
        requests.len()
    );
    requests
}
