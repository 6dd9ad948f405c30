//! Caret and selection of one editor buffer, in char offsets.
//! Kept in step with edits so statement lookups always see a valid caret.

use std::ops::Range;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorSelection {
    /// Where the selection started
    pub anchor: usize,
    /// Where the caret is
    pub head: usize,
}

impl EditorSelection {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    pub fn collapsed(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.head
    }

    pub fn head(&self) -> usize {
        self.head
    }

    /// (min, max) of anchor and head.
    pub fn range(&self) -> Range<usize> {
        self.anchor.min(self.head)..self.anchor.max(self.head)
    }

    /// The selected range, or `None` for a bare caret.
    pub fn selected_range(&self) -> Option<Range<usize>> {
        (!self.is_collapsed()).then(|| self.range())
    }

    pub fn set_primary_range(&mut self, anchor: usize, head: usize) {
        self.anchor = anchor;
        self.head = head;
    }

    /// Drop the selection, leaving the caret at its far end.
    pub fn collapse(&mut self) {
        let pos = self.anchor.max(self.head);
        self.anchor = pos;
        self.head = pos;
    }

    pub fn apply_simple_insert(&mut self, at: usize, len: usize) {
        if self.head >= at {
            self.head += len;
        }
        if self.anchor >= at {
            self.anchor += len;
        }
    }

    /// Ends inside the deleted range snap to its start.
    pub fn apply_simple_delete(&mut self, at: usize, del_len: usize) {
        let end = at + del_len;
        let shift = |pos: usize| {
            if pos >= end {
                pos - del_len
            } else if pos >= at {
                at
            } else {
                pos
            }
        };
        self.anchor = shift(self.anchor);
        self.head = shift(self.head);
    }

    /// Keep both ends inside a buffer of `len` chars.
    pub fn clamp_to(&mut self, len: usize) {
        self.anchor = self.anchor.min(len);
        self.head = self.head.min(len);
    }
}
