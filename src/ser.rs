//! Text formatting.
//!
//! This module turns a variable tree back into duct script source. It is the
//! inverse of the lexer and tree builder: with the default options, text
//! written here parses back into an equal tree.
//!
//! ## Overview
//!
//! - [`format_name`] and [`format_value`] render a single name or scalar,
//!   choosing quotes by the first matching [`ValueFormat`] rule and then
//!   escaping
//! - [`format_identifier`] and [`format_value_statement`] render one
//!   statement line
//! - [`Formatter`] writes a whole tree to any [`io::Write`]
//!
//! Quoting rules, first match wins:
//!
//! 1. `VALUE_QUOTE_ALWAYS` (and `STRING_QUOTE_ALWAYS` for string values)
//! 2. `STRING_QUOTE_EMPTY` for empty text
//! 3. `STRING_QUOTE_WHITESPACE` for text with a tab, space or newline
//! 4. `STRING_SAFE_BOOL` / `STRING_SAFE_NUMBER` for string values that would
//!    read back as another type
//! 5. `STRING_QUOTE_CONTROL` for text with `{`, `}`, `=` or a comment marker
//!
//! ## Direct Formatter Usage
//!
//! ```rust
//! use duct_script::ser::Formatter;
//! use duct_script::{parse_str, FormatOptions};
//!
//! let root = parse_str("name = \"two words\"\nlist 1 2.5 yes").unwrap();
//!
//! let mut formatter = Formatter::new(Vec::new(), FormatOptions::new());
//! formatter.write_root(&root).unwrap();
//!
//! let text = String::from_utf8(formatter.into_inner()).unwrap();
//! assert_eq!(text, "name = \"two words\"\nlist 1 2.5 yes\n");
//! ```

use crate::lexer::unescape_char;
use crate::options::{FormatOptions, ValueFormat};
use crate::value::{
    format_float, parse_bool_flag, Collection, Identifier, Node, Value, ValueVariable, Variable,
};
use crate::Result;
use std::fmt;
use std::io;

fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    quoted.push_str(text);
    quoted.push('"');
    quoted
}

#[inline]
fn has_whitespace(text: &str) -> bool {
    text.contains(['\t', ' ', '\n'])
}

#[inline]
fn has_control(text: &str) -> bool {
    text.contains(['{', '}', '='])
        || text.contains("//")
        || text.contains("/*")
        || text.contains("*/")
}

/// Text starting and ending with a quote that is not itself escaped.
fn is_wrapped(text: &str) -> bool {
    if text.len() < 2 || !text.starts_with('"') || !text.ends_with('"') {
        return false;
    }
    let inner = &text[1..text.len() - 1];
    let backslashes = inner.chars().rev().take_while(|&c| c == '\\').count();
    backslashes % 2 == 0
}

/// Escapes `text` that will be written bare or, with `quoted`, between
/// quotes.
///
/// Carriage returns and line breaks the lexer would fold inside quotes are
/// always escaped; the flags govern everything else.
fn escape_content(text: &str, format: ValueFormat, quoted: bool) -> String {
    let escape_other = format.contains(ValueFormat::STRING_ESCAPE_OTHER);
    let escape_control = format.contains(ValueFormat::STRING_ESCAPE_CONTROL) && !quoted;
    let escape_newline = format.contains(ValueFormat::STRING_ESCAPE_NEWLINE) && !quoted;

    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 8);
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        i += 1;
        match c {
            '\r' => {
                out.push_str("\\r");
                continue;
            }
            '\n' if escape_newline
                || (quoted && matches!(chars.get(i), Some('\n' | ' ' | '\t'))) =>
            {
                out.push_str("\\n");
                continue;
            }
            _ => {}
        }
        if escape_other {
            match c {
                '\t' if !quoted => {
                    out.push_str("\\t");
                    continue;
                }
                '"' => {
                    out.push_str("\\\"");
                    continue;
                }
                '\\' => {
                    match chars.get(i) {
                        Some(&next) if next != '\\' && unescape_char(next).is_some() => {
                            out.push('\\');
                            out.push(next);
                        }
                        Some('\\') => out.push_str("\\\\"),
                        _ => {
                            out.push_str("\\\\");
                            continue;
                        }
                    }
                    i += 1;
                    continue;
                }
                _ => {}
            }
        }
        if escape_control && matches!(c, '{' | '}' | '=') {
            out.push('\\');
            out.push(c);
            continue;
        }
        out.push(c);
    }
    out
}

fn escape_and_wrap(text: &str, format: ValueFormat, quoted: bool) -> String {
    let body = escape_content(text, format, quoted);
    if quoted {
        quote(&body)
    } else {
        body
    }
}

/// Applies the escaping flags of `format` to text that may already be
/// wrapped in quotes.
///
/// Wrapped text keeps its quotes, tabs, newlines and control characters
/// literal. A backslash that already starts a valid escape pair is kept as
/// is instead of being doubled.
///
/// # Examples
///
/// ```rust
/// use duct_script::ser::escape_string;
/// use duct_script::ValueFormat;
///
/// assert_eq!(escape_string("a\tb", ValueFormat::STRING_ESCAPE_OTHER), "a\\tb");
/// assert_eq!(escape_string("x=1", ValueFormat::STRING_ESCAPE_CONTROL), "x\\=1");
/// assert_eq!(escape_string("\"x=1\"", ValueFormat::STRING_ESCAPE_CONTROL), "\"x=1\"");
/// ```
#[must_use]
pub fn escape_string(text: &str, format: ValueFormat) -> String {
    if is_wrapped(text) {
        escape_and_wrap(&text[1..text.len() - 1], format, true)
    } else {
        escape_content(text, format, false)
    }
}

/// Formats a variable name.
///
/// # Examples
///
/// ```rust
/// use duct_script::ser::format_name;
/// use duct_script::ValueFormat;
///
/// assert_eq!(format_name("plain", ValueFormat::NAME_DEFAULT), "plain");
/// assert_eq!(format_name("two words", ValueFormat::NAME_DEFAULT), "\"two words\"");
/// assert_eq!(format_name("", ValueFormat::NAME_DEFAULT), "\"\"");
/// ```
#[must_use]
pub fn format_name(name: &str, format: ValueFormat) -> String {
    let quoted = if format.contains(ValueFormat::VALUE_QUOTE_ALWAYS) {
        true
    } else if format.contains(ValueFormat::STRING_QUOTE_EMPTY) && name.is_empty() {
        return "\"\"".to_string();
    } else {
        (format.contains(ValueFormat::STRING_QUOTE_WHITESPACE) && has_whitespace(name))
            || (format.contains(ValueFormat::STRING_QUOTE_CONTROL) && has_control(name))
    };
    escape_and_wrap(name, format, quoted)
}

fn format_str(s: &str, format: ValueFormat) -> String {
    let quoted = if format
        .intersects(ValueFormat::VALUE_QUOTE_ALWAYS | ValueFormat::STRING_QUOTE_ALWAYS)
    {
        true
    } else if format.contains(ValueFormat::STRING_QUOTE_EMPTY) && s.is_empty() {
        return "\"\"".to_string();
    } else {
        (format.contains(ValueFormat::STRING_QUOTE_WHITESPACE) && has_whitespace(s))
            || (format.contains(ValueFormat::STRING_SAFE_BOOL) && parse_bool_flag(s).is_some())
            || (format.contains(ValueFormat::STRING_SAFE_NUMBER) && s.parse::<f64>().is_ok())
            || (format.contains(ValueFormat::STRING_QUOTE_CONTROL) && has_control(s))
    };
    escape_and_wrap(s, format, quoted)
}

/// Formats a scalar value.
///
/// # Examples
///
/// ```rust
/// use duct_script::ser::format_value;
/// use duct_script::{Value, ValueFormat};
///
/// let format = ValueFormat::ALL_DEFAULT;
/// assert_eq!(format_value(&Value::Int(-3), format), "-3");
/// assert_eq!(format_value(&Value::Float(2.0), format), "2.0");
/// assert_eq!(format_value(&Value::Str("true".into()), format), "\"true\"");
/// assert_eq!(format_value(&Value::Str("12".into()), format), "\"12\"");
/// assert_eq!(format_value(&Value::Bool(false), format), "false");
/// ```
#[must_use]
pub fn format_value(value: &Value, format: ValueFormat) -> String {
    let always = format.contains(ValueFormat::VALUE_QUOTE_ALWAYS);
    match value {
        Value::Str(s) => format_str(s, format),
        Value::Int(i) if always => quote(&i.to_string()),
        Value::Int(i) => i.to_string(),
        Value::Float(f) if always => quote(&format_float(*f)),
        Value::Float(f) => format_float(*f),
        Value::Bool(b) if always || format.contains(ValueFormat::BOOL_QUOTE) => {
            quote(&b.to_string())
        }
        Value::Bool(b) => b.to_string(),
    }
}

/// Formats `name v1 v2 …`; non-scalar children are skipped.
///
/// Returns `None` for an unnamed identifier, which has no source form.
#[must_use]
pub fn format_identifier(identifier: &Identifier, options: &FormatOptions) -> Option<String> {
    if identifier.name().is_empty() {
        return None;
    }
    let mut line = format_name(identifier.name(), options.name_format);
    for value in identifier.values() {
        line.push(' ');
        line.push_str(&format_value(value, options.value_format));
    }
    Some(line)
}

/// Formats `name = value`; `None` for an unnamed value.
#[must_use]
pub fn format_value_statement(variable: &ValueVariable, options: &FormatOptions) -> Option<String> {
    if variable.name().is_empty() {
        return None;
    }
    let separator = if options.spaced_equals { " = " } else { "=" };
    Some(format!(
        "{}{separator}{}",
        format_name(variable.name(), options.name_format),
        format_value(variable.value(), options.value_format)
    ))
}

/// Writes variable trees as duct script text.
///
/// The root's children are written without a wrapper. At the root level
/// every nested scope is followed by a blank line, and preceded by one when
/// a statement came right before it.
pub struct Formatter<W> {
    writer: W,
    options: FormatOptions,
    indent_unit: String,
}

impl<W: io::Write> Formatter<W> {
    pub fn new(writer: W, options: FormatOptions) -> Self {
        Formatter {
            indent_unit: options.indent.unit(),
            writer,
            options,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Writes the children of `root`.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the writer fails.
    pub fn write_root(&mut self, root: &Node) -> Result<()> {
        self.write_children(root, 0, true)
    }

    /// Writes `node` as a braced scope at `depth`.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the writer fails.
    pub fn write_scope(&mut self, node: &Node, depth: usize) -> Result<()> {
        self.write_indent(depth)?;
        if node.name().is_empty() {
            writeln!(self.writer, "{{")?;
        } else {
            let name = format_name(node.name(), self.options.name_format);
            writeln!(self.writer, "{name} {{")?;
        }
        self.write_children(node, depth + 1, false)?;
        self.write_indent(depth)?;
        writeln!(self.writer, "}}")?;
        Ok(())
    }

    fn write_indent(&mut self, depth: usize) -> Result<()> {
        for _ in 0..depth {
            self.writer.write_all(self.indent_unit.as_bytes())?;
        }
        Ok(())
    }

    fn write_line(&mut self, depth: usize, line: &str) -> Result<()> {
        self.write_indent(depth)?;
        writeln!(self.writer, "{line}")?;
        Ok(())
    }

    fn write_children(&mut self, node: &Node, depth: usize, at_root: bool) -> Result<()> {
        let mut wrote_statement = false;
        for child in node.children() {
            let line = match child {
                Variable::Value(v) => format_value_statement(v, &self.options),
                Variable::Identifier(id) => format_identifier(id, &self.options),
                Variable::Node(scope) => {
                    if at_root && wrote_statement {
                        writeln!(self.writer)?;
                    }
                    self.write_scope(scope, depth)?;
                    if at_root {
                        writeln!(self.writer)?;
                    }
                    wrote_statement = false;
                    continue;
                }
            };
            if let Some(line) = line {
                self.write_line(depth, &line)?;
                wrote_statement = true;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = format_identifier(self, &FormatOptions::default()).unwrap_or_default();
        f.write_str(&line)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut formatter = Formatter::new(Vec::new(), FormatOptions::default());
        formatter.write_root(self).map_err(|_| fmt::Error)?;
        let text = String::from_utf8(formatter.into_inner()).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}
