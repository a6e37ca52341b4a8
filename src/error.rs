//! Error types for loading, writing and deserializing duct scripts.
//!
//! Parsing failures fall into three families, all of them fatal to the parse
//! that raised them:
//!
//! - **Lexical**: malformed token content (unexpected quote inside a token,
//!   unknown escape sequence, unterminated quoted string or block comment,
//!   stray `*/`)
//! - **Structural**: statements the tree builder cannot place (dangling or
//!   doubled `=`, `=` after a value list, `{` inside a value list,
//!   unmatched `}`)
//! - **Hierarchy**: the input ended while scopes were still open
//!
//! Lexical and structural errors carry the line and column of the token that
//! triggered them.
//!
//! ## Examples
//!
//! ```rust
//! use duct_script::parse_str;
//!
//! let err = parse_str("name = \"unterminated").unwrap_err();
//! assert!(err.is_lexical());
//! assert!(err.to_string().contains("line 1"));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents every failure the crate can report.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Malformed token content
    #[error("Lexical error at line {line}, column {column}: {msg}")]
    Lexical {
        line: usize,
        column: usize,
        msg: String,
    },

    /// Statement the tree builder cannot place
    #[error("Structural error at line {line}, column {column}: {msg}")]
    Structural {
        line: usize,
        column: usize,
        msg: String,
    },

    /// Scopes left open at end of input
    #[error("Hierarchy error: {msg}")]
    Hierarchy { msg: String },

    /// Type mismatch while deserializing a tree into a Rust value
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a lexical error at the given position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use duct_script::Error;
    ///
    /// let err = Error::lexical(3, 7, "unexpected quote");
    /// assert!(err.to_string().contains("line 3, column 7"));
    /// ```
    pub fn lexical(line: usize, column: usize, msg: &str) -> Self {
        Error::Lexical {
            line,
            column,
            msg: msg.to_string(),
        }
    }

    /// Creates a structural error at the given position.
    pub fn structural(line: usize, column: usize, msg: &str) -> Self {
        Error::Structural {
            line,
            column,
            msg: msg.to_string(),
        }
    }

    /// Creates a hierarchy error (scope opened but never closed).
    pub fn hierarchy(msg: &str) -> Self {
        Error::Hierarchy {
            msg: msg.to_string(),
        }
    }

    /// Creates a type mismatch error for the serde bridge.
    pub fn type_mismatch(expected: &str, found: &str) -> Self {
        Error::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for file reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns `true` for malformed-token errors.
    #[must_use]
    pub const fn is_lexical(&self) -> bool {
        matches!(self, Error::Lexical { .. })
    }

    /// Returns `true` for statement-placement errors.
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        matches!(self, Error::Structural { .. })
    }

    /// Returns `true` for unclosed-scope errors.
    #[must_use]
    pub const fn is_hierarchy(&self) -> bool {
        matches!(self, Error::Hierarchy { .. })
    }

    /// Line and column of the offending token, when the error has one.
    #[must_use]
    pub const fn position(&self) -> Option<(usize, usize)> {
        match self {
            Error::Lexical { line, column, .. } | Error::Structural { line, column, .. } => {
                Some((*line, *column))
            }
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
