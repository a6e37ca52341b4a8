//! # Duct script syntax
//!
//! A script is a sequence of statements separated by newlines. Each
//! statement starts with a name.
//!
//! ```text
//! // line comment
//! title = "Main window"        value statement
//! size 800 600                 identifier with two values
//! fullscreen                   identifier with no values
//! theme {                      node
//!     accent = 0.75
//!     /* block
//!        comment */
//!     fonts sans mono
//! }
//! ```
//!
//! ## Grammar
//!
//! ```text
//! script     = { statement } EOF
//! statement  = name "=" literal EOL
//!            | name { literal } EOL
//!            | name "{" { statement } "}"
//! name       = literal
//! literal    = number | double | string | quoted
//! ```
//!
//! Braces may sit on the same line as their contents: `a { b = 1 }` is one
//! node holding one value.
//!
//! ## Tokens
//!
//! | Token    | Form                                                      |
//! |----------|-----------------------------------------------------------|
//! | number   | an optional `+` or `-` followed by digits                 |
//! | double   | digits with exactly one `.`, optionally signed            |
//! | string   | a run of characters up to whitespace, `=`, `{`, `}`, or a comment |
//! | quoted   | `"` … `"` with backslash escapes                          |
//! | comment  | `//` to end of line, or `/*` … `*/` across lines          |
//!
//! A quote inside an unquoted string is an error. Inside quotes the escapes
//! `\n`, `\r`, `\t`, `\'`, `\"`, `\\`, `\{`, `\}` and `\=` are recognised;
//! anything else after a backslash is an error. Inside quotes a run of raw
//! line breaks becomes a single `\n` and the indentation of the following
//! line is dropped. Carriage returns are dropped everywhere.
//!
//! ## Values
//!
//! An unquoted string that reads `true` or `false` in any case becomes a
//! boolean. Integer literals must fit in 32 bits. Decimal literals are
//! stored as 32-bit floats and written back with at most four decimals.
//!
//! ## Errors
//!
//! Malformed tokens are lexical errors, misplaced tokens are structural
//! errors, and both carry the line and column where they were found. A
//! scope left open at the end of input is a hierarchy error. See
//! [`Error`](crate::Error).
