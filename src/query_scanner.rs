//! Single-pass statement scanner.
//!
//! Walks the buffer once from a start offset, splitting on `;` outside of
//! strings and comments. Every terminator strictly before the target caret
//! closes a *completed* statement; the first terminator at or after the target
//! closes the *owning* statement and stops the scan. If the text runs out
//! first, whatever non-blank text is still pending becomes the owning
//! statement, which covers a final statement without a terminator.

use log::trace;

use crate::editor_position::{byte_offset, char_len, offset_to_position};
use crate::models::enums::CharClass;
use crate::models::structs::{Position, ScanOptions, StatementSpan};
use crate::syntax::SqlChars;

/// Output of one scanner call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Terminated statements before the target, in document order
    pub completed: Vec<StatementSpan>,
    /// Statement the target belongs to, or the trailing unterminated one
    pub owning: Option<StatementSpan>,
}

impl ScanResult {
    pub fn last_completed(&self) -> Option<&StatementSpan> {
        self.completed.last()
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_empty() && self.owning.is_none()
    }

    /// Completed spans followed by the owning one.
    pub fn into_spans(self) -> Vec<StatementSpan> {
        let mut spans = self.completed;
        spans.extend(self.owning);
        spans
    }
}

/// A point in the text, tracked in chars, bytes and rows/columns at once.
#[derive(Clone, Copy, Debug)]
struct Mark {
    offset: usize,
    byte: usize,
    position: Position,
}

impl Mark {
    fn span_to(self, end: Mark) -> StatementSpan {
        StatementSpan {
            start_offset: self.offset,
            end_offset: end.offset,
            start: self.position,
            end: end.position,
            bytes: self.byte..end.byte,
        }
    }
}

/// True when a terminator at `here` lies strictly before the caret `target`.
#[inline]
fn is_before(here: Position, target: Position) -> bool {
    here.row < target.row || (here.row == target.row && here.column < target.column)
}

/// Scan `text` from char offset `from` towards the caret `target`.
pub fn scan_statements(
    text: &str,
    from: usize,
    target: Position,
    options: &ScanOptions,
) -> ScanResult {
    let total = char_len(text);
    let from = from.min(total);
    let start = offset_to_position(text, from);

    let mut result = ScanResult::default();
    let mut pending = Mark {
        offset: from,
        byte: byte_offset(text, from),
        position: start,
    };
    let mut row = start.row;
    let mut column = start.column;

    for c in SqlChars::starting_at(text, from, *options) {
        let here = Position::new(row, column);
        let after = if c.ch == '\n' {
            Position::new(row + 1, 0)
        } else {
            Position::new(row, column + 1)
        };
        let next = Mark {
            offset: c.offset + 1,
            byte: c.next_byte(),
            position: after,
        };

        match c.class {
            class if class.is_trivia() => {
                if pending.offset == c.offset {
                    pending = next;
                }
            }
            CharClass::Terminator => {
                let span = pending.span_to(Mark {
                    offset: c.offset,
                    byte: c.byte,
                    position: here,
                });
                if is_before(here, target) {
                    if !span.is_empty() {
                        result.completed.push(span);
                    }
                    pending = next;
                } else {
                    trace!(
                        "scan stopped at terminator {}:{} (target {}:{})",
                        here.row, here.column, target.row, target.column
                    );
                    result.owning = (!span.is_empty()).then_some(span);
                    return result;
                }
            }
            _ => {}
        }

        row = after.row;
        column = after.column;
    }

    if pending.offset < total {
        let end = Mark {
            offset: total,
            byte: text.len(),
            position: Position::new(row, column),
        };
        result.owning = Some(pending.span_to(end));
    }
    result
}
