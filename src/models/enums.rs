/// Tokenizer state while walking a SQL buffer.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ScanState {
    #[default]
    Normal,
    InString,
    LineComment,
    BlockComment,
}

/// What a single character means to the statement scanner.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum CharClass {
    /// Ordinary statement text outside of strings and comments
    Code,
    /// A `'` that opens or closes a string literal
    Quote,
    /// Character inside a string literal
    Literal,
    /// Character that belongs to a line or block comment (delimiters included)
    Comment,
    /// Space or tab outside of strings and comments
    Space,
    /// `\n`, whatever the state
    Newline,
    /// `;` outside of strings and comments
    Terminator,
}

impl CharClass {
    /// Characters that may be trimmed from the front of a pending statement.
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(self, CharClass::Space | CharClass::Newline | CharClass::Comment)
    }
}
