//! # duct_script
//!
//! A lexer, tree builder, formatter and template engine for duct script, a
//! small line-oriented configuration language.
//!
//! ## What is duct script?
//!
//! A script is a list of statements. A statement is a named value
//! (`port = 8080`), a named list of values (`size 800 600`) or a named
//! scope holding more statements (`server { ... }`). Values are 32-bit
//! integers, 32-bit floats, booleans or strings.
//!
//! ## Key Features
//!
//! - **Positioned errors**: lexical and structural errors carry the line and
//!   column they were found at
//! - **Round-trip formatting**: text written with the default options reads
//!   back into an equal tree
//! - **Templates**: validate, look up, rename and group statements by their
//!   name and type shape
//! - **Serde compatible**: deserialize a parsed tree straight into your own
//!   types, or serialize it to any serde format
//!
//! ## Quick Start
//!
//! ```rust
//! use duct_script::{parse_str, to_string, Collection};
//!
//! let source = "\
//! name = demo
//! server {
//! \thost = localhost
//! \tports 80 443
//! }
//! ";
//!
//! let root = parse_str(source).unwrap();
//! let server = root.get_node("server", true).unwrap();
//! assert_eq!(server.get_str("host", true), Some("localhost"));
//! assert_eq!(server.get_identifier("ports", true).unwrap().len(), 2);
//!
//! // Written back with a blank line around the scope
//! assert_eq!(
//!     to_string(&root).unwrap(),
//!     "name = demo\n\nserver {\n\thost = localhost\n\tports 80 443\n}\n\n"
//! );
//! ```
//!
//! ### Typed configuration
//!
//! ```rust
//! use duct_script::from_str;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Window { title: String, size: (u32, u32), fullscreen: bool }
//!
//! let window: Window = from_str("title = \"Main window\"\nsize 800 600\nfullscreen").unwrap();
//! assert_eq!(window, Window { title: "Main window".into(), size: (800, 600), fullscreen: true });
//! ```
//!
//! ### Building trees with the script! macro
//!
//! ```rust
//! use duct_script::{script, to_string};
//!
//! let root = script! {
//!     "depth" = 2,
//!     "origin" => [0, 0],
//! };
//! assert_eq!(to_string(&root).unwrap(), "depth = 2\norigin 0 0\n");
//! ```
//!
//! ## Modules
//!
//! - [`lexer`] and [`builder`]: text to tree, see [`syntax`] for the grammar
//! - [`value`]: the tree itself
//! - [`ser`] and [`options`]: tree to text
//! - [`template`]: shape matching and compaction
//! - [`de`]: tree to Rust types
//!
//! ## Logging
//!
//! Entry points emit `tracing` events at `debug` level and the tree builder
//! traces every token. Nothing is printed unless the application installs a
//! subscriber.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`roundtrip.rs`** - parse, edit and write a script
//! - **`templates.rs`** - validate and compact statements with templates
//! - **`typed_config.rs`** - deserialize a script into Rust structs
//!
//! Run any of them with: `cargo run --example <name>`

pub mod builder;
pub mod charset;
pub mod de;
pub mod error;
pub mod lexer;
pub mod macros;
pub mod options;
pub mod ser;
pub mod syntax;
pub mod template;
pub mod token;
pub mod value;

pub use builder::TreeBuilder;
pub use charset::{CharacterRange, CharacterSet};
pub use de::Deserializer;
pub use error::{Error, Result};
pub use lexer::{tokenize, Lexer, TokenHandler};
pub use options::{FormatOptions, Indent, ValueFormat};
pub use ser::Formatter;
pub use template::Template;
pub use token::{Token, TokenKind};
pub use value::{Collection, Identifier, Node, Value, ValueVariable, Variable, VariableType};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

/// Parses a script into its root node.
///
/// # Examples
///
/// ```rust
/// use duct_script::{parse_str, Collection};
///
/// let root = parse_str("port = 8080\nverbose").unwrap();
/// assert_eq!(root.get_int("port", true), Some(8080));
/// assert!(root.get_identifier("verbose", true).is_some());
/// ```
///
/// # Errors
///
/// Returns the first lexical, structural or hierarchy error in the input.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_str(input: &str) -> Result<Node> {
    debug!(bytes = input.len(), "parsing script");
    let root = TreeBuilder::parse(input)?;
    debug!(statements = root.len(), "parsed script");
    Ok(root)
}

/// Parses a script from UTF-8 bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8 or do not parse.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_slice(bytes: &[u8]) -> Result<Node> {
    let input = std::str::from_utf8(bytes).map_err(|e| Error::custom(e.to_string()))?;
    parse_str(input)
}

/// Reads a whole script from `reader` and parses it.
///
/// # Examples
///
/// ```rust
/// use duct_script::{parse_reader, Collection};
/// use std::io::Cursor;
///
/// let root = parse_reader(Cursor::new(b"x = 1\ny = 2")).unwrap();
/// assert_eq!(root.len(), 2);
/// ```
///
/// # Errors
///
/// Returns an error if reading fails or the text does not parse.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_reader<R>(mut reader: R) -> Result<Node>
where
    R: io::Read,
{
    let mut input = String::new();
    reader
        .read_to_string(&mut input)
        .map_err(|e| Error::io(&e.to_string()))?;
    parse_str(&input)
}

/// Reads and parses the script at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not parse.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Node> {
    let path = path.as_ref();
    debug!(path = %path.display(), "loading script");
    let input = fs::read_to_string(path).map_err(|e| Error::io(&e.to_string()))?;
    parse_str(&input)
}

/// Deserializes a `T` from a parsed tree.
///
/// String fields may borrow from `root`.
///
/// # Errors
///
/// Returns an error if the tree does not have the shape `T` expects.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_node<'a, T>(root: &'a Node) -> Result<T>
where
    T: Deserialize<'a>,
{
    T::deserialize(Deserializer::from_node(root))
}

/// Parses a script and deserializes a `T` from it.
///
/// # Examples
///
/// ```rust
/// use duct_script::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("x = 1\ny = 2").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns a parse error, or an error if the tree does not fit `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(input: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let root = parse_str(input)?;
    from_node(&root)
}

/// Formats a tree with the default options.
///
/// # Errors
///
/// Returns an error if formatting fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string(root: &Node) -> Result<String> {
    to_string_with_options(root, FormatOptions::default())
}

/// Formats a tree with custom options.
///
/// # Examples
///
/// ```rust
/// use duct_script::{script, to_string_with_options, FormatOptions};
///
/// let root = script! { "a" = 1, "b" => { "c" = "two words" } };
/// let text = to_string_with_options(&root, FormatOptions::compact()).unwrap();
/// assert_eq!(text, "a=1\n\nb {\n  c=\"two words\"\n}\n\n");
/// ```
///
/// # Errors
///
/// Returns an error if formatting fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options(root: &Node, options: FormatOptions) -> Result<String> {
    let mut formatter = Formatter::new(Vec::with_capacity(128), options);
    formatter.write_root(root)?;
    String::from_utf8(formatter.into_inner()).map_err(|e| Error::custom(e.to_string()))
}

/// Writes a tree to `writer` with the default options.
///
/// # Errors
///
/// Returns an error if writing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W>(writer: W, root: &Node) -> Result<()>
where
    W: io::Write,
{
    to_writer_with_options(writer, root, FormatOptions::default())
}

/// Writes a tree to `writer` with custom options.
///
/// # Errors
///
/// Returns an error if writing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W>(writer: W, root: &Node, options: FormatOptions) -> Result<()>
where
    W: io::Write,
{
    let mut formatter = Formatter::new(writer, options);
    formatter.write_root(root)?;
    formatter
        .into_inner()
        .flush()
        .map_err(|e| Error::io(&e.to_string()))
}

/// Writes a tree to the file at `path`, replacing its contents.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn write_to_file<P: AsRef<Path>>(path: P, root: &Node, options: FormatOptions) -> Result<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), "writing script");
    let file = fs::File::create(path).map_err(|e| Error::io(&e.to_string()))?;
    to_writer_with_options(io::BufWriter::new(file), root, options)
}
