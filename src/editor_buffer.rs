use std::ops::Range;

use log::debug;

use crate::editor_markers::{BufferExecutions, clamp_range, error_position, error_range};
use crate::editor_position::{byte_offset, char_len, offset_to_position, slice_chars};
use crate::editor_selection::EditorSelection;
use crate::models::structs::{
    ErrorResult, ExecutionRecord, Position, QueryRequest, ScanOptions, Statement,
};
use crate::query_cursor::{statement_at_cursor, statements_for_selection};
use crate::query_key::QueryKey;

/// Text of one editor tab together with its caret and execution results.
///
/// All ranges are char offsets. Every edit keeps the selection and the stored
/// results in step with the text, discarding results whose statement changed.
#[derive(Debug, Clone, Default)]
pub struct EditorBuffer {
    text: String,
    pub selection: EditorSelection,
    pub executions: BufferExecutions,
    options: ScanOptions,
    /// Bumped on every edit
    pub last_revision: u64,
}

impl EditorBuffer {
    pub fn new(initial: &str) -> Self {
        Self::with_options(initial, ScanOptions::default())
    }

    pub fn with_options(initial: &str, options: ScanOptions) -> Self {
        Self {
            text: initial.to_string(),
            options,
            ..Self::default()
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn text_snapshot(&self) -> String {
        self.text.clone()
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Length in chars.
    pub fn len(&self) -> usize {
        char_len(&self.text)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Replace the whole content. Stored results cannot be mapped across a
    /// wholesale replacement, so they are dropped.
    pub fn set_text(&mut self, new_text: String) {
        self.text = new_text;
        self.selection.clamp_to(self.len());
        self.executions.clear();
        self.last_revision += 1;
    }

    /// Replace the chars in `range` with `replacement`.
    pub fn apply_single_replace(&mut self, range: Range<usize>, replacement: &str) {
        let len = self.len();
        let start = range.start.min(len);
        let end = range.end.clamp(start, len);
        let removed = end - start;
        let inserted = char_len(replacement);

        let (from, to) = (byte_offset(&self.text, start), byte_offset(&self.text, end));
        self.text.replace_range(from..to, replacement);

        if removed > 0 {
            self.selection.apply_simple_delete(start, removed);
        }
        if inserted > 0 {
            self.selection.apply_simple_insert(start, inserted);
        }

        // the replaced region itself is covered by re-validation below
        let delta = inserted as isize - removed as isize;
        self.executions.shift_after_edit(end, delta);
        self.executions.retain_valid(&self.text, &self.options);
        self.last_revision += 1;
    }

    /// Apply `new` as a single replacement, given that the buffer currently
    /// holds `prev`. Returns `false`, leaving the buffer untouched, when `prev`
    /// is not the current text.
    pub fn try_single_span_update(&mut self, prev: &str, new: &str) -> bool {
        if prev != self.text {
            return false;
        }
        if prev == new {
            return true;
        }
        let prefix = prev
            .chars()
            .zip(new.chars())
            .take_while(|(a, b)| a == b)
            .count();
        let prev_len = char_len(prev);
        let new_len = char_len(new);
        let max_suffix = prev_len.min(new_len) - prefix;
        let suffix = prev
            .chars()
            .rev()
            .zip(new.chars().rev())
            .take(max_suffix)
            .take_while(|(a, b)| a == b)
            .count();

        let inserted = slice_chars(new, prefix, new_len - suffix).to_string();
        debug!(
            "single span update {}..{} -> {} char(s)",
            prefix,
            prev_len - suffix,
            inserted.chars().count()
        );
        self.apply_single_replace(prefix..prev_len - suffix, &inserted);
        true
    }

    pub fn cursor_position(&self) -> Position {
        offset_to_position(&self.text, self.selection.head())
    }

    /// Statement under the caret, ignoring any selection.
    pub fn statement_at_cursor(&self) -> Option<Statement> {
        statement_at_cursor(&self.text, self.cursor_position(), &self.options)
    }

    /// What "run" should execute for the current caret and selection.
    pub fn run_targets(&self) -> Vec<QueryRequest> {
        statements_for_selection(
            &self.text,
            self.cursor_position(),
            self.selection.selected_range(),
            &self.options,
        )
    }

    pub fn record_execution(&mut self, request: &QueryRequest, error: Option<ErrorResult>) -> QueryKey {
        let key = request.query_key();
        self.executions
            .record(key.clone(), ExecutionRecord::from_request(request, error));
        key
    }

    /// Where to draw the error stored for `statement`, if any.
    pub fn error_marker(&self, statement: &Statement) -> Option<(Position, &ErrorResult)> {
        let (executed, error) = self.failed_execution(statement)?;
        Some((error_position(&executed, error.position), error))
    }

    /// Char range to underline for the error stored for `statement`. `None`
    /// when there is no error or no word at its position.
    pub fn error_range(&self, statement: &Statement) -> Option<(Range<usize>, &ErrorResult)> {
        let (executed, error) = self.failed_execution(statement)?;
        let range = error_range(&executed, error.position)?;
        Some((clamp_range(range, executed.start_offset..executed.end_offset), error))
    }

    /// The text that actually ran for `statement` and the error it produced.
    fn failed_execution(&self, statement: &Statement) -> Option<(Statement, &ErrorResult)> {
        let record = self.executions.get(&statement.query_key())?;
        let error = record.error.as_ref()?;
        let executed = match &record.selection {
            Some(range) => {
                let range = clamp_range(range.clone(), 0..self.len());
                Statement {
                    text: slice_chars(&self.text, range.start, range.end).to_string(),
                    start: offset_to_position(&self.text, range.start),
                    end: offset_to_position(&self.text, range.end),
                    start_offset: range.start,
                    end_offset: range.end,
                    is_selection: true,
                }
            }
            None => statement.clone(),
        };
        Some((executed, error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_counts_chars() {
        let mut buf = EditorBuffer::new("SELECT 'é';");
        buf.apply_single_replace(8..9, "ü");
        assert_eq!(buf.as_str(), "SELECT 'ü';");
        assert_eq!(buf.len(), 11);
    }

    #[test]
    fn test_replace_moves_caret() {
        let mut buf = EditorBuffer::new("SELECT 1;\nSELECT 2;");
        buf.selection = EditorSelection::collapsed(12);
        buf.apply_single_replace(0..0, "-- x\n");
        assert_eq!(buf.selection.head(), 17);
        assert_eq!(buf.statement_at_cursor().unwrap().text, "SELECT 2");
    }

    #[test]
    fn test_execution_survives_edit_elsewhere() {
        let mut buf = EditorBuffer::new("SELECT 1;\nSELECT * FROM missing;");
        buf.selection = EditorSelection::collapsed(12);
        let request = buf.run_targets().remove(0);
        let key = buf.record_execution(
            &request,
            Some(ErrorResult {
                message: "no such table".into(),
                position: 14,
            }),
        );
        assert_eq!(key.as_str(), "SELECT * FROM missing@10");

        buf.apply_single_replace(7..8, "42");
        let statement = buf.statement_at_cursor().unwrap();
        assert_eq!(statement.start_offset, 11);
        let (position, error) = buf.error_marker(&statement).unwrap();
        assert_eq!(error.message, "no such table");
        assert_eq!(position, Position::new(1, 14));
        // the underline covers `missing`
        let (range, _) = buf.error_range(&statement).unwrap();
        assert_eq!(range, 25..32);
    }

    #[test]
    fn test_execution_dropped_when_statement_edited() {
        let mut buf = EditorBuffer::new("SELECT 1;\nSELECT 2;");
        buf.selection = EditorSelection::collapsed(11);
        let request = buf.run_targets().remove(0);
        buf.record_execution(&request, None);
        assert_eq!(buf.executions.len(), 1);

        buf.apply_single_replace(17..18, "3");
        assert!(buf.executions.is_empty());
    }

    #[test]
    fn test_selection_run_error_marker() {
        let mut buf = EditorBuffer::new("SELECT a FROM t WHERE x;");
        buf.selection = EditorSelection::new(0, 15);
        let requests = buf.run_targets();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].query_text(), "SELECT a FROM t");
        buf.record_execution(
            &requests[0],
            Some(ErrorResult {
                message: "bad column".into(),
                position: 7,
            }),
        );
        let statement = buf.statement_at_cursor().unwrap();
        let (position, _) = buf.error_marker(&statement).unwrap();
        assert_eq!(position, Position::new(0, 7));
        let (range, _) = buf.error_range(&statement).unwrap();
        assert_eq!(range, 7..8);
    }

    #[test]
    fn test_error_range_stays_inside_selection() {
        let mut buf = EditorBuffer::new("SELECT abc FROM t;");
        // only `SELECT ab` ran; the word continues past the selection
        buf.selection = EditorSelection::new(0, 9);
        let request = buf.run_targets().remove(0);
        buf.record_execution(
            &request,
            Some(ErrorResult {
                message: "unknown column".into(),
                position: 8,
            }),
        );
        let statement = buf.statement_at_cursor().unwrap();
        let (range, _) = buf.error_range(&statement).unwrap();
        assert_eq!(range, 7..9);
    }

    #[test]
    fn test_try_single_span_update_rejects_stale_prev() {
        let mut buf = EditorBuffer::new("SELECT 1");
        assert!(!buf.try_single_span_update("SELECT 2", "SELECT 3"));
        assert_eq!(buf.as_str(), "SELECT 1");
        assert!(buf.try_single_span_update("SELECT 1", "SELECT 1"));
    }

    #[test]
    fn test_set_text_clears_results() {
        let mut buf = EditorBuffer::new("SELECT 1;");
        let request = buf.run_targets().remove(0);
        buf.record_execution(&request, None);
        buf.selection = EditorSelection::collapsed(9);
        buf.set_text("x".into());
        assert!(buf.executions.is_empty());
        assert_eq!(buf.selection.head(), 1);
    }
}
