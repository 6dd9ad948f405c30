//! Per-buffer execution results and the arithmetic behind error markers.

use std::collections::HashMap;
use std::ops::Range;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::editor_position::relative_position;
use crate::models::structs::{ErrorResult, ExecutionRecord, Position, ScanOptions, Statement};
use crate::query_key::{QueryKey, shift_offset, validate_query_at_offset_with};

/// Execution results of one buffer, keyed by the statement they belong to.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct BufferExecutions {
    records: HashMap<QueryKey, ExecutionRecord>,
}

impl BufferExecutions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, key: QueryKey, record: ExecutionRecord) -> Option<ExecutionRecord> {
        self.records.insert(key, record)
    }

    pub fn get(&self, key: &QueryKey) -> Option<&ExecutionRecord> {
        self.records.get(key)
    }

    pub fn latest_error(&self, key: &QueryKey) -> Option<&ErrorResult> {
        self.records.get(key).and_then(|record| record.error.as_ref())
    }

    pub fn remove(&mut self, key: &QueryKey) -> Option<ExecutionRecord> {
        self.records.remove(key)
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QueryKey, &ExecutionRecord)> {
        self.records.iter()
    }

    /// Move keys and stored offsets after an edit of `delta` chars at `change_offset`.
    pub fn shift_after_edit(&mut self, change_offset: usize, delta: isize) {
        if delta == 0 {
            return;
        }
        let shift = |offset: usize| shift_offset(offset, change_offset, delta);
        self.records = std::mem::take(&mut self.records)
            .into_iter()
            .map(|(key, mut record)| {
                record.start_offset = shift(record.start_offset);
                record.end_offset = shift(record.end_offset);
                record.selection = record
                    .selection
                    .map(|range| shift(range.start)..shift(range.end));
                (key.shift(change_offset, delta), record)
            })
            .collect();
    }

    /// Drop every record whose statement no longer reads the same at its offset.
    /// Returns how many were dropped.
    pub fn retain_valid(&mut self, text: &str, options: &ScanOptions) -> usize {
        let before = self.records.len();
        self.records.retain(|key, _| match key.split() {
            Ok((query, offset)) => validate_query_at_offset_with(text, offset, query, options),
            Err(_) => false,
        });
        let dropped = before - self.records.len();
        if dropped > 0 {
            debug!("discarded {} stale execution record(s)", dropped);
        }
        dropped
    }
}

/// Where in the document a database error at char `position` of `statement`'s
/// query points. An error reported at the very end of the query lands after
/// its last non-whitespace char.
pub fn error_position(statement: &Statement, position: usize) -> Position {
    let query = statement.text.as_str();
    let query_len = query.chars().count();
    let position = if position >= query_len {
        query.trim_end().chars().count()
    } else {
        position
    };
    relative_position(statement.start, query, position)
}

/// Document char range to underline for an error at char `position` of
/// `statement`'s text. A mid-query error widens to the word touching it; an
/// error at the very end is an empty range after the last non-whitespace char.
/// `None` when no word touches the position.
pub fn error_range(statement: &Statement, position: usize) -> Option<Range<usize>> {
    let chars: Vec<char> = statement.text.chars().collect();
    if position >= chars.len() {
        let end = statement.start_offset + statement.text.trim_end().chars().count();
        return Some(end..end);
    }
    let is_word = |c: &&char| c.is_alphanumeric() || **c == '_';
    let before = chars[..position].iter().rev().take_while(is_word).count();
    let after = chars[position..].iter().take_while(is_word).count();
    if before == 0 && after == 0 {
        return None;
    }
    let at = statement.start_offset + position;
    Some(at - before..at + after)
}

/// Clamp `range` into `bounds`. Disjoint ranges collapse to an empty range at
/// the nearest edge of `bounds`.
pub fn clamp_range(range: Range<usize>, bounds: Range<usize>) -> Range<usize> {
    let start = range.start.clamp(bounds.start, bounds.end.max(bounds.start));
    let end = range.end.min(bounds.end).max(start);
    start..end
}
