//! Lexer tokens.
//!
//! A [`Token`] is a reusable accumulator: the lexer resets it at the start
//! of every token, appends characters to its lexeme while scanning, and
//! hands a reference to the tree builder once the token is complete.

use crate::charset::CharacterSet;
use std::fmt;

/// The kind of a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TokenKind {
    #[default]
    None,
    String,
    QuotedString,
    Number,
    Double,
    Equals,
    OpenBrace,
    CloseBrace,
    Comment,
    CommentBlock,
    Eof,
    Eol,
}

impl TokenKind {
    /// Returns `true` for kinds that carry a value lexeme.
    #[inline]
    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::String | TokenKind::QuotedString | TokenKind::Number | TokenKind::Double
        )
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            TokenKind::None => "none",
            TokenKind::String => "string",
            TokenKind::QuotedString => "quoted string",
            TokenKind::Number => "number",
            TokenKind::Double => "double",
            TokenKind::Equals => "'='",
            TokenKind::OpenBrace => "'{'",
            TokenKind::CloseBrace => "'}'",
            TokenKind::Comment => "comment",
            TokenKind::CommentBlock => "block comment",
            TokenKind::Eof => "end of input",
            TokenKind::Eol => "end of line",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A token kind, its lexeme and the position where it started.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Token {
    kind: TokenKind,
    lexeme: String,
    line: usize,
    column: usize,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind) -> Self {
        Token {
            kind,
            lexeme: String::with_capacity(64),
            line: 0,
            column: 0,
        }
    }

    /// Clears the lexeme and assigns a new kind, keeping the buffer.
    pub fn reset(&mut self, kind: TokenKind) {
        self.kind = kind;
        self.lexeme.clear();
    }

    pub fn set_position(&mut self, line: usize, column: usize) {
        self.line = line;
        self.column = column;
    }

    #[inline]
    pub fn push(&mut self, c: char) {
        self.lexeme.push(c);
    }

    #[inline]
    #[must_use]
    pub const fn kind(&self) -> TokenKind {
        self.kind
    }

    #[inline]
    pub fn set_kind(&mut self, kind: TokenKind) {
        self.kind = kind;
    }

    #[inline]
    #[must_use]
    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    #[inline]
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    #[inline]
    #[must_use]
    pub const fn column(&self) -> usize {
        self.column
    }

    /// Returns `true` if every lexeme character belongs to `set`.
    #[must_use]
    pub fn is_only(&self, set: &CharacterSet) -> bool {
        set.is_all_in(&self.lexeme)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:?} at {}:{}",
            self.kind, self.lexeme, self.line, self.column
        )
    }
}
