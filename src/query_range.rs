//! Whole-document and range lookups built on the scanner.

use crate::editor_position::{end_position, position_to_offset};
use crate::models::structs::{Position, ScanOptions, Statement, StatementSpan};
use crate::query_scanner::scan_statements;

/// Every statement span in `text`, in order.
pub fn all_spans(text: &str, options: &ScanOptions) -> Vec<StatementSpan> {
    scan_statements(text, 0, end_position(text), options).into_spans()
}

/// Spans from `start` up to and including the one that owns `end`.
pub fn spans_in_range(
    text: &str,
    start: Position,
    end: Position,
    options: &ScanOptions,
) -> Vec<StatementSpan> {
    let from = position_to_offset(text, start);
    scan_statements(text, from, end, options).into_spans()
}

pub fn all_statements(text: &str) -> Vec<Statement> {
    all_statements_with(text, &ScanOptions::default())
}

pub fn all_statements_with(text: &str, options: &ScanOptions) -> Vec<Statement> {
    all_spans(text, options)
        .iter()
        .map(|span| Statement::from_span(text, span))
        .collect()
}

pub fn statements_in_range(text: &str, start: Position, end: Position) -> Vec<Statement> {
    statements_in_range_with(text, start, end, &ScanOptions::default())
}

pub fn statements_in_range_with(
    text: &str,
    start: Position,
    end: Position,
    options: &ScanOptions,
) -> Vec<Statement> {
    spans_in_range(text, start, end, options)
        .iter()
        .map(|span| Statement::from_span(text, span))
        .collect()
}

/// Statements whose first char sits on `row`.
pub fn statements_starting_on_row(text: &str, row: usize, options: &ScanOptions) -> Vec<Statement> {
    all_spans(text, options)
        .iter()
        .filter(|span| span.start.row == row)
        .map(|span| Statement::from_span(text, span))
        .collect()
}
