//! Stable identity of a statement occurrence and re-validation against an edited buffer.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::editor_position::{char_len, offset_to_position};
use crate::models::structs::ScanOptions;
use crate::query_range::statements_in_range_with;
use crate::query_tools::collapse_whitespace;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum QueryKeyError {
    #[error("query key has no '@' separator: {0}")]
    MissingSeparator(String),
    #[error("query key has an invalid start offset: {0}")]
    InvalidOffset(String),
}

/// `text@start_offset`. Equal for two resolutions of the same unedited statement;
/// any change to its text or position produces a different key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryKey(String);

impl QueryKey {
    pub fn new(text: &str, start_offset: usize) -> Self {
        Self(format!("{text}@{start_offset}"))
    }

    /// Rebuild a key from its string form, checking that it can be split back.
    pub fn parse(raw: &str) -> Result<Self, QueryKeyError> {
        let key = Self(raw.to_string());
        key.split()?;
        Ok(key)
    }

    /// Split into (query text, start offset). Query text may itself contain `@`,
    /// so the last separator wins.
    pub fn split(&self) -> Result<(&str, usize), QueryKeyError> {
        let (text, offset) = self
            .0
            .rsplit_once('@')
            .ok_or_else(|| QueryKeyError::MissingSeparator(self.0.clone()))?;
        let offset = offset
            .parse()
            .map_err(|_| QueryKeyError::InvalidOffset(self.0.clone()))?;
        Ok((text, offset))
    }

    pub fn query_text(&self) -> &str {
        self.split().map(|(text, _)| text).unwrap_or(&self.0)
    }

    pub fn start_offset(&self) -> Option<usize> {
        self.split().ok().map(|(_, offset)| offset)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key after an edit of `delta` chars at `change_offset`.
    pub fn shift(&self, change_offset: usize, delta: isize) -> Self {
        match self.split() {
            Ok((text, start)) => Self::new(text, shift_offset(start, change_offset, delta)),
            Err(_) => self.clone(),
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Offsets at or after an edit move with it; earlier offsets stay put.
pub fn shift_offset(offset: usize, change_offset: usize, delta: isize) -> usize {
    if offset >= change_offset {
        offset.saturating_add_signed(delta)
    } else {
        offset
    }
}

/// True when a statement still starts exactly at `offset` and reads `expected`
/// (modulo whitespace). Any failure to resolve counts as stale.
pub fn validate_query_at_offset(text: &str, offset: usize, expected: &str) -> bool {
    validate_query_at_offset_with(text, offset, expected, &ScanOptions::default())
}

pub fn validate_query_at_offset_with(
    text: &str,
    offset: usize,
    expected: &str,
    options: &ScanOptions,
) -> bool {
    if offset >= char_len(text) {
        return false;
    }
    let position = offset_to_position(text, offset);
    let Some(found) = statements_in_range_with(text, position, position, options)
        .into_iter()
        .next()
    else {
        return false;
    };
    found.start_offset == offset
        && collapse_whitespace(&found.text) == collapse_whitespace(expected)
}
