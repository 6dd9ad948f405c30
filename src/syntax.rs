//! Character-level SQL tokenizer shared by the comment stripper and the statement scanner.
//!
//! Only the distinctions the statement engine needs are made: string literals
//! (single quotes), line comments, block comments, whitespace and the `;`
//! terminator. Keywords and operators are all plain [`CharClass::Code`].

use std::iter::Peekable;
use std::str::CharIndices;

use crate::models::enums::{CharClass, ScanState};
use crate::models::structs::ScanOptions;

/// One classified character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SqlChar {
    /// Char index into the source text
    pub offset: usize,
    /// Byte index into the source text
    pub byte: usize,
    pub ch: char,
    pub class: CharClass,
}

impl SqlChar {
    /// Byte index right after this char.
    #[inline]
    pub fn next_byte(&self) -> usize {
        self.byte + self.ch.len_utf8()
    }
}

/// Iterator over the chars of a SQL buffer, tagging each one with its [`CharClass`].
pub struct SqlChars<'a> {
    chars: Peekable<CharIndices<'a>>,
    offset: usize,
    state: ScanState,
    prev: Option<char>,
    options: ScanOptions,
    // the `*` of a `/*` opener must not close the comment it opens
    opener_pending: bool,
    closing_star: bool,
}

impl<'a> SqlChars<'a> {
    pub fn new(text: &'a str, options: ScanOptions) -> Self {
        Self::starting_at(text, 0, options)
    }

    /// Start tokenizing at char `offset`, in [`ScanState::Normal`].
    pub fn starting_at(text: &'a str, offset: usize, options: ScanOptions) -> Self {
        let mut prev = None;
        let mut chars = text.char_indices().peekable();
        let mut skipped = 0;
        while skipped < offset {
            match chars.next() {
                Some((_, ch)) => prev = Some(ch),
                None => break,
            }
            skipped += 1;
        }
        Self {
            chars,
            offset: skipped,
            state: ScanState::Normal,
            prev,
            options,
            opener_pending: false,
            closing_star: false,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Char index of the next char to be produced.
    pub fn offset(&self) -> usize {
        self.offset
    }

    fn peek_is(&mut self, expected: char) -> bool {
        matches!(self.chars.peek(), Some((_, ch)) if *ch == expected)
    }

    fn classify(&mut self, ch: char) -> CharClass {
        match self.state {
            ScanState::Normal => match ch {
                '\'' => {
                    self.state = ScanState::InString;
                    CharClass::Quote
                }
                ';' => CharClass::Terminator,
                '\n' => CharClass::Newline,
                ' ' | '\t' => CharClass::Space,
                '-' if self.options.line_comments
                    && self.peek_is('-')
                    && !matches!(self.prev, Some('\'' | '"' | '`')) =>
                {
                    self.state = ScanState::LineComment;
                    CharClass::Comment
                }
                '/' if self.options.block_comments && self.peek_is('*') => {
                    self.state = ScanState::BlockComment;
                    self.opener_pending = true;
                    self.closing_star = false;
                    CharClass::Comment
                }
                _ => CharClass::Code,
            },
            ScanState::InString => match ch {
                '\'' => {
                    self.state = ScanState::Normal;
                    CharClass::Quote
                }
                '\n' => CharClass::Newline,
                _ => CharClass::Literal,
            },
            ScanState::LineComment => match ch {
                '\n' => {
                    self.state = ScanState::Normal;
                    CharClass::Newline
                }
                _ => CharClass::Comment,
            },
            ScanState::BlockComment => {
                if self.opener_pending {
                    self.opener_pending = false;
                    return CharClass::Comment;
                }
                if ch == '/' && self.closing_star {
                    self.state = ScanState::Normal;
                    self.closing_star = false;
                    return CharClass::Comment;
                }
                self.closing_star = ch == '*';
                if ch == '\n' {
                    CharClass::Newline
                } else {
                    CharClass::Comment
                }
            }
        }
    }
}

impl Iterator for SqlChars<'_> {
    type Item = SqlChar;

    fn next(&mut self) -> Option<Self::Item> {
        let (byte, ch) = self.chars.next()?;
        let offset = self.offset;
        self.offset += 1;
        let class = self.classify(ch);
        self.prev = Some(ch);
        Some(SqlChar {
            offset,
            byte,
            ch,
            class,
        })
    }
}

/// Blank out SQL comments with the default [`ScanOptions`].
///
/// Comment chars become spaces and newlines are kept, so the result has the
/// same line count and char length as the input.
pub fn strip_sql_comments(text: &str) -> String {
    strip_sql_comments_with(text, &ScanOptions::default())
}

pub fn strip_sql_comments_with(text: &str, options: &ScanOptions) -> String {
    SqlChars::new(text, *options)
        .map(|c| match c.class {
            CharClass::Comment => ' ',
            _ => c.ch,
        })
        .collect()
}

/// True when the text holds nothing but whitespace and comments.
pub fn is_blank_sql(text: &str, options: &ScanOptions) -> bool {
    SqlChars::new(text, *options).all(|c| c.class.is_trivia() || c.ch.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes(sql: &str) -> Vec<CharClass> {
        SqlChars::new(sql, ScanOptions::default())
            .map(|c| c.class)
            .collect()
    }

    #[test]
    fn test_semicolon_inside_string_is_literal() {
        let got = classes("'a;b';");
        assert_eq!(
            got,
            vec![
                CharClass::Quote,
                CharClass::Literal,
                CharClass::Literal,
                CharClass::Literal,
                CharClass::Quote,
                CharClass::Terminator,
            ]
        );
    }

    #[test]
    fn test_doubled_quote_keeps_string_open() {
        let got = classes("'it''s;'");
        assert_eq!(got[6], CharClass::Literal);
        assert_eq!(*got.last().unwrap(), CharClass::Quote);
    }

    #[test]
    fn test_line_comment_ends_at_newline() {
        let got = classes("-- x;\n;");
        assert!(got[..5].iter().all(|c| *c == CharClass::Comment));
        assert_eq!(got[5], CharClass::Newline);
        assert_eq!(got[6], CharClass::Terminator);
    }

    #[test]
    fn test_dashes_after_quote_are_not_a_comment() {
        let got = classes("'a'--;");
        assert_eq!(got[3], CharClass::Code);
        assert_eq!(got[5], CharClass::Terminator);
    }

    #[test]
    fn test_block_comment_spans_lines() {
        let got = classes("/* a;\n */;");
        assert_eq!(got[4], CharClass::Comment);
        assert_eq!(got[5], CharClass::Newline);
        assert_eq!(got[8], CharClass::Comment);
        assert_eq!(got[9], CharClass::Terminator);
    }

    #[test]
    fn test_block_comment_opener_star_does_not_close() {
        // `/*/` is still an open comment
        let got = classes("/*/;*/;");
        assert_eq!(got[3], CharClass::Comment);
        assert_eq!(got[6], CharClass::Terminator);
    }

    #[test]
    fn test_block_comments_can_be_disabled() {
        let options = ScanOptions {
            block_comments: false,
            ..ScanOptions::default()
        };
        let got: Vec<_> = SqlChars::new("/*;*/", options).map(|c| c.class).collect();
        assert_eq!(got[2], CharClass::Terminator);
    }

    #[test]
    fn test_strip_preserves_length_and_lines() {
        let sql = "SELECT 1; -- first\nSELECT 2 /* two\nlines */;";
        let stripped = strip_sql_comments(sql);
        assert_eq!(stripped.chars().count(), sql.chars().count());
        assert_eq!(stripped.lines().count(), sql.lines().count());
        assert!(!stripped.contains("first"));
        assert!(!stripped.contains("lines"));
        assert!(stripped.starts_with("SELECT 1;"));
    }

    #[test]
    fn test_strip_keeps_dashes_inside_strings() {
        let sql = "SELECT '--not a comment' -- real\n";
        let stripped = strip_sql_comments(sql);
        assert!(stripped.contains("'--not a comment'"));
        assert!(!stripped.contains("real"));
    }

    #[test]
    fn test_starting_at_offset() {
        let chars: Vec<_> = SqlChars::starting_at("ab;cd", 2, ScanOptions::default()).collect();
        assert_eq!(chars[0].offset, 2);
        assert_eq!(chars[0].byte, 2);
        assert_eq!(chars[0].class, CharClass::Terminator);
    }

    #[test]
    fn test_is_blank_sql() {
        let options = ScanOptions::default();
        assert!(is_blank_sql("  \n-- nothing\n/* here */ ", &options));
        assert!(!is_blank_sql("-- c\nSELECT 1", &options));
        assert!(is_blank_sql("", &options));
    }
}
