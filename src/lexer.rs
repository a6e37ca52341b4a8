//! Character-level lexer.
//!
//! The [`Lexer`] pulls characters from its input one at a time, keeping the
//! current character plus one character of lookahead. Each call to
//! [`Lexer::next_token`] skips tabs and spaces, classifies the current
//! character into a tentative [`TokenKind`], extends the lexeme under that
//! kind's continuation rules and hands the finished token to a
//! [`TokenHandler`].
//!
//! Carriage returns never reach the scanner, so CRLF input is read as LF.
//! Lines start at 1; the column counts consumed characters on the current
//! line, starting at 1 for the first one.
//!
//! ## Examples
//!
//! ```rust
//! use duct_script::lexer::tokenize;
//! use duct_script::TokenKind;
//!
//! let tokens = tokenize("port = 8080").unwrap();
//! let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind()).collect();
//! assert_eq!(
//!     kinds,
//!     vec![TokenKind::String, TokenKind::Equals, TokenKind::Number, TokenKind::Eof]
//! );
//! ```

use crate::charset::CharacterSet;
use crate::token::{Token, TokenKind};
use crate::{Error, Result};
use std::iter::Peekable;
use std::str::Chars;

/// Receives every token the lexer finishes.
pub trait TokenHandler {
    /// Handles one finished token.
    ///
    /// # Errors
    ///
    /// Returning an error aborts the parse.
    fn handle_token(&mut self, token: &Token) -> Result<()>;
}

/// Collects clones of every token; handy for inspecting a token stream.
impl TokenHandler for Vec<Token> {
    fn handle_token(&mut self, token: &Token) -> Result<()> {
        self.push(token.clone());
        Ok(())
    }
}

/// Maps the character after a backslash to the character it stands for.
///
/// Returns `None` for characters that do not form an escape sequence.
#[inline]
#[must_use]
pub fn unescape_char(c: char) -> Option<char> {
    match c {
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        '\'' | '"' | '\\' | '{' | '}' | '=' => Some(c),
        _ => None,
    }
}

/// The duct script lexer.
///
/// One lexer scans one input; create a new one per parse.
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    current: Option<char>,
    line: usize,
    column: usize,
    token: Token,
    finished: bool,
    whitespace: CharacterSet,
    number_start: CharacterSet,
    numerals: CharacterSet,
    signs: CharacterSet,
    decimal_signs: CharacterSet,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        let signs = CharacterSet::new().with_char('-').with_char('+');
        let mut lexer = Lexer {
            chars: input.chars().peekable(),
            current: None,
            line: 1,
            column: 0,
            token: Token::new(TokenKind::None),
            finished: false,
            whitespace: CharacterSet::whitespace(),
            number_start: CharacterSet::numbers().with_char('-').with_char('+'),
            numerals: CharacterSet::numbers(),
            decimal_signs: signs.clone().with_char('.'),
            signs,
        };
        lexer.next_char();
        lexer
    }

    /// Line of the current character.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Column of the current character.
    #[must_use]
    pub const fn column(&self) -> usize {
        self.column
    }

    /// Scans one token and delivers it to `handler`.
    ///
    /// Returns `Ok(false)` once the end-of-input token has been delivered.
    /// If the input ends right after a token (no trailing newline) an
    /// explicit [`TokenKind::Eof`] token follows it in the same call.
    ///
    /// # Errors
    ///
    /// Returns lexical errors from the scanner and any error the handler
    /// returns.
    pub fn next_token<H: TokenHandler + ?Sized>(&mut self, handler: &mut H) -> Result<bool> {
        if self.finished {
            return Ok(false);
        }

        self.skip_whitespace();
        self.classify()?;
        self.read_token()?;
        self.resolve_numeric();
        handler.handle_token(&self.token)?;

        if self.token.kind() == TokenKind::Eof {
            self.finished = true;
            return Ok(false);
        }
        if self.current.is_none() {
            self.token.reset(TokenKind::Eof);
            self.token.set_position(self.line, self.column);
            handler.handle_token(&self.token)?;
            self.finished = true;
            return Ok(false);
        }
        Ok(true)
    }

    /// Drives the lexer to the end of input.
    ///
    /// # Errors
    ///
    /// Stops at the first lexical or handler error.
    pub fn run<H: TokenHandler + ?Sized>(&mut self, handler: &mut H) -> Result<()> {
        while self.next_token(handler)? {}
        Ok(())
    }

    fn next_char(&mut self) -> Option<char> {
        if self.current == Some('\n') {
            self.line += 1;
            self.column = 0;
        }
        self.current = loop {
            match self.chars.next() {
                Some('\r') => continue,
                other => break other,
            }
        };
        if self.current.is_some() {
            self.column += 1;
        }
        self.current
    }

    fn peek_char(&mut self) -> Option<char> {
        while self.chars.peek() == Some(&'\r') {
            self.chars.next();
        }
        self.chars.peek().copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.current {
            if self.whitespace.contains(c) {
                self.next_char();
            } else {
                break;
            }
        }
    }

    fn skip_to_eol(&mut self) {
        while let Some(c) = self.current {
            if c == '\n' {
                break;
            }
            self.next_char();
        }
    }

    fn error(&self, msg: &str) -> Error {
        Error::lexical(self.line, self.column, msg)
    }

    /// `//` or `/*` at the current position.
    fn at_comment_start(&mut self) -> bool {
        self.current == Some('/') && matches!(self.peek_char(), Some('/' | '*'))
    }

    /// Characters that end a free-form token.
    fn is_terminator(&mut self, c: char) -> bool {
        matches!(c, '\n' | '=' | '{' | '}') || self.whitespace.contains(c) || self.at_comment_start()
    }

    fn classify(&mut self) -> Result<()> {
        self.token.reset(TokenKind::None);
        self.token.set_position(self.line, self.column);

        let current = self.current;
        let kind = match current {
            None => TokenKind::Eof,
            Some('"') => TokenKind::QuotedString,
            Some('*') if self.peek_char() == Some('/') => {
                return Err(self.error("unexpected end of block comment"));
            }
            Some('/') => match self.peek_char() {
                Some('/') => TokenKind::Comment,
                Some('*') => TokenKind::CommentBlock,
                _ => TokenKind::String,
            },
            Some('\n') => TokenKind::Eol,
            Some('.') => {
                self.token.push('.');
                TokenKind::Double
            }
            Some('=') => TokenKind::Equals,
            Some('{') => TokenKind::OpenBrace,
            Some('}') => TokenKind::CloseBrace,
            Some(c) if self.number_start.contains(c) => {
                self.token.push(c);
                TokenKind::Number
            }
            Some(_) => TokenKind::String,
        };
        self.token.set_kind(kind);
        Ok(())
    }

    fn read_token(&mut self) -> Result<()> {
        match self.token.kind() {
            TokenKind::QuotedString => {
                self.read_quoted_string()?;
                self.next_char(); // closing quote
            }
            TokenKind::String => self.read_string()?,
            TokenKind::Number => {
                self.next_char();
                self.read_number()?;
            }
            TokenKind::Double => {
                self.next_char();
                self.read_double()?;
            }
            TokenKind::Equals | TokenKind::OpenBrace | TokenKind::CloseBrace | TokenKind::Eol => {
                self.next_char();
            }
            // The newline stays put; it terminates the statement.
            TokenKind::Comment => self.skip_to_eol(),
            TokenKind::CommentBlock => self.read_comment_block()?,
            TokenKind::Eof | TokenKind::None => {}
        }
        Ok(())
    }

    /// Demotes numeric tokens made only of signs or decimal points.
    fn resolve_numeric(&mut self) {
        let demote = match self.token.kind() {
            TokenKind::Number => self.token.is_only(&self.signs),
            TokenKind::Double => self.token.is_only(&self.decimal_signs),
            _ => false,
        };
        if demote {
            self.token.set_kind(TokenKind::String);
        }
    }

    fn read_escape(&mut self) -> Result<char> {
        match self.next_char() {
            Some(c) => unescape_char(c)
                .ok_or_else(|| self.error(&format!("unknown escape sequence: \\{c}"))),
            None => Err(self.error("unexpected end of input in escape sequence")),
        }
    }

    fn read_number(&mut self) -> Result<()> {
        while let Some(c) = self.current {
            if c == '"' {
                return Err(self.error("unexpected quote"));
            } else if self.is_terminator(c) {
                break;
            } else if self.numerals.contains(c) {
                self.token.push(c);
            } else if c == '.' {
                self.token.push(c);
                self.next_char();
                self.token.set_kind(TokenKind::Double);
                return self.read_double();
            } else {
                self.token.set_kind(TokenKind::String);
                return self.read_string();
            }
            self.next_char();
        }
        Ok(())
    }

    fn read_double(&mut self) -> Result<()> {
        while let Some(c) = self.current {
            if c == '"' {
                return Err(self.error("unexpected quote"));
            } else if self.is_terminator(c) {
                break;
            } else if self.numerals.contains(c) {
                self.token.push(c);
            } else {
                // A second decimal point or any other character.
                self.token.set_kind(TokenKind::String);
                return self.read_string();
            }
            self.next_char();
        }
        Ok(())
    }

    fn read_string(&mut self) -> Result<()> {
        while let Some(c) = self.current {
            if c == '"' {
                return Err(self.error("unexpected quote"));
            } else if c == '\\' {
                let escaped = self.read_escape()?;
                self.token.push(escaped);
            } else if self.is_terminator(c) {
                break;
            } else {
                self.token.push(c);
            }
            self.next_char();
        }
        Ok(())
    }

    /// Reads up to (not past) the closing quote.
    ///
    /// The first raw newline of a line break is kept; further newlines and
    /// the indentation after it are dropped.
    fn read_quoted_string(&mut self) -> Result<()> {
        self.next_char(); // opening quote
        let mut in_break = false;
        loop {
            let current = self.current;
            match current {
                None => return Err(self.error("unterminated quoted string")),
                Some('"') => return Ok(()),
                Some('\n') => {
                    if !in_break {
                        self.token.push('\n');
                        in_break = true;
                    }
                }
                Some(c) if in_break && self.whitespace.contains(c) => {}
                Some(c) => {
                    in_break = false;
                    if c == '\\' {
                        let escaped = self.read_escape()?;
                        self.token.push(escaped);
                    } else {
                        self.token.push(c);
                    }
                }
            }
            self.next_char();
        }
    }

    fn read_comment_block(&mut self) -> Result<()> {
        self.next_char(); // '/'
        self.next_char(); // '*'
        loop {
            let current = self.current;
            match current {
                None => return Err(self.error("unterminated block comment")),
                Some('*') if self.peek_char() == Some('/') => {
                    self.next_char();
                    self.next_char();
                    return Ok(());
                }
                Some(_) => {
                    self.next_char();
                }
            }
        }
    }
}

/// Scans `input` to completion and returns every delivered token.
///
/// # Errors
///
/// Returns the first lexical error.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    Lexer::new(input).run(&mut tokens)?;
    Ok(tokens)
}
