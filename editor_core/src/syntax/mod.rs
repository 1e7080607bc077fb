//! Syntax highlighting module.
//!
//! Line-at-a-time tokenizers that carry state (open block comments, raw
//! strings) from one line to the next. Callers feed lines in increasing
//! document order, or call [`Highlighter::reset`] and replay.

mod c_family;
mod language;
mod theme;

pub use c_family::{CFamilyHighlighter, LanguageSyntax, C, CPP, JAVA, JAVASCRIPT, TYPESCRIPT};
pub use language::Language;
pub use theme::{Color, Style, Theme};

/// Token categories produced by highlighters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TokenKind {
    /// Plain text (never emitted; gaps between tokens are default).
    #[default]
    Default,
    Keyword,
    Type,
    String,
    Number,
    Comment,
    Preprocessor,
    Function,
    Operator,
    Bracket,
}

/// A highlighted run of characters on one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// Start column (characters).
    pub start: usize,
    /// Length in characters.
    pub length: usize,
    pub kind: TokenKind,
}

impl Token {
    pub fn new(start: usize, length: usize, kind: TokenKind) -> Self {
        Self {
            start,
            length,
            kind,
        }
    }

    /// Column just past the token.
    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

/// State carried from the end of one line to the start of the next.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LineState {
    #[default]
    Normal,
    /// Inside an unterminated `/* ... */` comment.
    BlockComment,
    /// Inside an unterminated raw string; `delimiter` is the closing
    /// sequence, e.g. `)xyz"`.
    RawString { delimiter: String },
}

/// A stateful per-line tokenizer.
pub trait Highlighter {
    /// Display name of the language.
    fn language(&self) -> &str;

    /// File extensions handled, without the leading dot.
    fn extensions(&self) -> &[&'static str];

    /// Tokenizes one line and advances the carried state past it.
    ///
    /// Tokens are ordered by start column and do not overlap.
    fn highlight_line(&mut self, line: &str) -> Vec<Token>;

    /// Returns the carried state to its initial value.
    fn reset(&mut self);

    /// Advances the carried state past a line without producing tokens.
    fn update_state(&mut self, line: &str);

    /// Returns true while a construct spans past the last line fed.
    fn in_multiline_construct(&self) -> bool;
}
