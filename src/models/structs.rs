use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::query_key::QueryKey;
use crate::query_tools::normalize_query_text;

/// Zero-based (row, column) caret position. Columns count chars, and column `c`
/// sits right before the `c`-th char of the row.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    pub row: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Toggles for the tokenizer shared by the comment stripper and the scanner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Treat `--` up to end of line as a comment
    pub line_comments: bool,
    /// Treat `/* ... */` as a comment
    pub block_comments: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            line_comments: true,
            block_comments: true,
        }
    }
}

/// A statement region produced by one scanner call.
///
/// `end_offset` points at the terminating `;` (or the end of the text) and is
/// never part of the statement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementSpan {
    pub start_offset: usize,
    pub end_offset: usize,
    pub start: Position,
    pub end: Position,
    /// Same region in bytes, for slicing the source `&str`
    pub bytes: Range<usize>,
}

impl StatementSpan {
    pub fn is_empty(&self) -> bool {
        self.start_offset >= self.end_offset
    }

    /// Length in chars.
    pub fn len(&self) -> usize {
        self.end_offset.saturating_sub(self.start_offset)
    }

    pub fn contains_row(&self, row: usize) -> bool {
        self.start.row <= row && row <= self.end.row
    }

    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.bytes.clone()).unwrap_or_default()
    }
}

/// A resolved, user-facing statement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub text: String,
    pub start: Position,
    pub end: Position,
    pub start_offset: usize,
    pub end_offset: usize,
    pub is_selection: bool,
}

impl Statement {
    pub fn from_span(source: &str, span: &StatementSpan) -> Self {
        Self {
            text: span.text(source).to_string(),
            start: span.start,
            end: span.end,
            start_offset: span.start_offset,
            end_offset: span.end_offset,
            is_selection: false,
        }
    }

    /// Text with surrounding whitespace and one trailing `;` removed, as sent to the database.
    pub fn query(&self) -> &str {
        normalize_query_text(&self.text)
    }

    pub fn query_key(&self) -> QueryKey {
        QueryKey::new(self.query(), self.start_offset)
    }
}

/// Part of a statement the user had selected when asking to run it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSlice {
    pub start_offset: usize,
    pub end_offset: usize,
    pub text: String,
}

/// Something to hand to the execution dispatcher: the owning statement and,
/// when the user selected only part of it, that part.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub statement: Statement,
    pub selection: Option<SelectionSlice>,
}

impl QueryRequest {
    pub fn for_statement(statement: Statement) -> Self {
        Self {
            statement,
            selection: None,
        }
    }

    /// The SQL that should actually be executed.
    pub fn query_text(&self) -> &str {
        match &self.selection {
            Some(slice) => normalize_query_text(&slice.text),
            None => self.statement.query(),
        }
    }

    /// Results are always keyed by the enclosing statement, even for partial runs.
    pub fn query_key(&self) -> QueryKey {
        self.statement.query_key()
    }
}

/// Database error reported for an executed query. `position` is a char index
/// into the executed query text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResult {
    pub message: String,
    pub position: usize,
}

/// Outcome of one execution, stored by the caller under its [`QueryKey`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub error: Option<ErrorResult>,
    pub success: Option<bool>,
    pub selection: Option<Range<usize>>,
    pub query_text: String,
    pub start_offset: usize,
    pub end_offset: usize,
}

impl ExecutionRecord {
    pub fn from_request(request: &QueryRequest, error: Option<ErrorResult>) -> Self {
        let statement = &request.statement;
        Self {
            success: Some(error.is_none()),
            error,
            selection: request
                .selection
                .as_ref()
                .map(|slice| slice.start_offset..slice.end_offset),
            query_text: statement.query().to_string(),
            start_offset: statement.start_offset,
            end_offset: statement.end_offset,
        }
    }
}
