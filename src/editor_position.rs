//! Conversions between absolute char offsets and (row, column) caret positions.
//!
//! Text is expected to use `\n` line endings; callers normalize `\r\n` first.

use crate::models::structs::Position;

/// Number of chars in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Position of char `offset`. Offsets past the end clamp to the end of the text.
pub fn offset_to_position(text: &str, offset: usize) -> Position {
    let mut row = 0;
    let mut column = 0;
    for ch in text.chars().take(offset) {
        if ch == '\n' {
            row += 1;
            column = 0;
        } else {
            column += 1;
        }
    }
    Position::new(row, column)
}

/// Char offset of `position`. Rows past the last line clamp to the last line,
/// and columns clamp to the length of their line.
pub fn position_to_offset(text: &str, position: Position) -> usize {
    let mut offset = 0;
    let mut lines = text.split('\n').enumerate().peekable();
    while let Some((row, line)) = lines.next() {
        let line_len = line.chars().count();
        if row == position.row || lines.peek().is_none() {
            return offset + position.column.min(line_len);
        }
        offset += line_len + 1;
    }
    offset
}

/// Caret position after the last char.
pub fn end_position(text: &str) -> Position {
    offset_to_position(text, usize::MAX)
}

/// Byte index of char `offset`, or `text.len()` when the offset is past the end.
pub fn byte_offset(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

/// Slice `text` by a char range, clamping both ends.
pub fn slice_chars(text: &str, start: usize, end: usize) -> &str {
    let from = byte_offset(text, start);
    let to = byte_offset(text, end.max(start));
    &text[from..to]
}

/// Position of `offset` inside `inner`, where `inner` starts at `origin` in the document.
///
/// Used to map a char index reported against a query back into the buffer:
/// only the first line of `inner` is shifted by `origin.column`.
pub fn relative_position(origin: Position, inner: &str, offset: usize) -> Position {
    let local = offset_to_position(inner, offset);
    if local.row == 0 {
        Position::new(origin.row, origin.column + local.column)
    } else {
        Position::new(origin.row + local.row, local.column)
    }
}
