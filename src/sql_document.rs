//! Borrowed view over a SQL buffer bundling the statement lookups with one set
//! of [`ScanOptions`].

use std::ops::Range;

use crate::editor_position::{end_position, offset_to_position, position_to_offset};
use crate::models::structs::{Position, QueryRequest, ScanOptions, Statement};
use crate::query_cursor::{resolve, statement_at_cursor, statements_for_selection};
use crate::query_key::validate_query_at_offset_with;
use crate::query_range::{
    all_statements_with, statements_in_range_with, statements_starting_on_row,
};
use crate::query_scanner::{ScanResult, scan_statements};

#[derive(Debug, Clone, Copy)]
pub struct SqlDocument<'a> {
    text: &'a str,
    options: ScanOptions,
}

impl<'a> SqlDocument<'a> {
    pub fn new(text: &'a str) -> Self {
        Self::with_options(text, ScanOptions::default())
    }

    pub fn with_options(text: &'a str, options: ScanOptions) -> Self {
        Self { text, options }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    pub fn offset_to_position(&self, offset: usize) -> Position {
        offset_to_position(self.text, offset)
    }

    pub fn position_to_offset(&self, position: Position) -> usize {
        position_to_offset(self.text, position)
    }

    pub fn end_position(&self) -> Position {
        end_position(self.text)
    }

    pub fn scan(&self, from: usize, target: Position) -> ScanResult {
        scan_statements(self.text, from, target, &self.options)
    }

    pub fn all_statements(&self) -> Vec<Statement> {
        all_statements_with(self.text, &self.options)
    }

    pub fn statements_in_range(&self, start: Position, end: Position) -> Vec<Statement> {
        statements_in_range_with(self.text, start, end, &self.options)
    }

    pub fn statement_at_cursor(&self, cursor: Position) -> Option<Statement> {
        statement_at_cursor(self.text, cursor, &self.options)
    }

    pub fn resolve(&self, cursor: Position, selection: Option<Range<usize>>) -> Option<Statement> {
        resolve(self.text, cursor, selection, &self.options)
    }

    pub fn statements_starting_on_row(&self, row: usize) -> Vec<Statement> {
        statements_starting_on_row(self.text, row, &self.options)
    }

    pub fn statements_for_selection(
        &self,
        cursor: Position,
        selection: Option<Range<usize>>,
    ) -> Vec<QueryRequest> {
        statements_for_selection(self.text, cursor, selection, &self.options)
    }

    pub fn validate_query_at_offset(&self, offset: usize, expected: &str) -> bool {
        validate_query_at_offset_with(self.text, offset, expected, &self.options)
    }
}
