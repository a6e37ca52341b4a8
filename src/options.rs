//! Configuration options for writing duct scripts.
//!
//! This module provides types to customize formatter output:
//!
//! - [`FormatOptions`]: Main configuration struct
//! - [`ValueFormat`]: Quoting and escaping flags, applied separately to names
//!   and values
//! - [`Indent`]: Indentation used inside nested scopes
//!
//! ## Examples
//!
//! ```rust
//! use duct_script::{parse_str, to_string_with_options, FormatOptions, Indent, ValueFormat};
//!
//! let root = parse_str("server { port = 8080 }").unwrap();
//!
//! let options = FormatOptions::new()
//!     .with_indent(Indent::Spaces(2))
//!     .with_value_format(ValueFormat::ALL_DEFAULT | ValueFormat::VALUE_QUOTE_ALWAYS);
//! let text = to_string_with_options(&root, options).unwrap();
//! assert_eq!(text, "server {\n  port = \"8080\"\n}\n\n");
//! ```

use bitflags::bitflags;

bitflags! {
    /// Quoting and escaping flags for formatted names and values.
    ///
    /// Quoting rules are tried in a fixed order and the first match wins;
    /// escaping flags apply independently to whatever text was chosen.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ValueFormat: u32 {
        /// Quote every name and value, whatever its type.
        const VALUE_QUOTE_ALWAYS = 0x01;

        /// Quote text containing a tab, space or newline.
        const STRING_QUOTE_WHITESPACE = 0x10;
        /// Quote empty text.
        const STRING_QUOTE_EMPTY = 0x20;
        /// Quote text containing `{`, `}`, `=` or a comment marker.
        const STRING_QUOTE_CONTROL = 0x40;
        /// Quote every string value.
        const STRING_QUOTE_ALWAYS = 0x80;
        /// Quote string values that would read back as booleans.
        const STRING_SAFE_BOOL = 0x100;
        /// Quote string values that would read back as numbers.
        const STRING_SAFE_NUMBER = 0x200;

        /// Escape `\n` and `\r` outside quotes.
        const STRING_ESCAPE_NEWLINE = 0x1000;
        /// Escape `{`, `}` and `=` outside quotes.
        const STRING_ESCAPE_CONTROL = 0x2000;
        /// Escape tabs, inner quotes and backslashes.
        const STRING_ESCAPE_OTHER = 0x4000;

        /// Quote boolean values.
        const BOOL_QUOTE = 0x10000;

        const STRING_ESCAPE_ALL = Self::STRING_ESCAPE_NEWLINE.bits()
            | Self::STRING_ESCAPE_CONTROL.bits()
            | Self::STRING_ESCAPE_OTHER.bits();
        const STRING_SAFE = Self::STRING_SAFE_BOOL.bits()
            | Self::STRING_SAFE_NUMBER.bits()
            | Self::STRING_ESCAPE_OTHER.bits()
            | Self::STRING_QUOTE_CONTROL.bits();
        const STRING_DEFAULT = Self::STRING_SAFE.bits()
            | Self::STRING_QUOTE_WHITESPACE.bits()
            | Self::STRING_QUOTE_EMPTY.bits();
        const NAME_DEFAULT = Self::STRING_DEFAULT.bits();
        const ALL_DEFAULT = Self::STRING_DEFAULT.bits();
    }
}

impl Default for ValueFormat {
    fn default() -> Self {
        ValueFormat::ALL_DEFAULT
    }
}

/// Indentation for the contents of a nested scope.
///
/// # Examples
///
/// ```rust
/// use duct_script::Indent;
///
/// assert_eq!(Indent::Tab.unit(), "\t");
/// assert_eq!(Indent::Spaces(4).unit(), "    ");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Indent {
    #[default]
    Tab,
    Spaces(usize),
}

impl Indent {
    /// Returns one level of indentation.
    #[must_use]
    pub fn unit(&self) -> String {
        match self {
            Indent::Tab => "\t".to_string(),
            Indent::Spaces(n) => " ".repeat(*n),
        }
    }
}

/// Configuration options for the formatter.
///
/// # Examples
///
/// ```rust
/// use duct_script::{FormatOptions, ValueFormat};
///
/// // Defaults: safe quoting, tab indent, `name = value`
/// let options = FormatOptions::new();
/// assert!(options.spaced_equals);
///
/// // Smallest output that still reads back the same
/// let options = FormatOptions::compact();
/// assert!(!options.spaced_equals);
///
/// // Custom configuration
/// let options = FormatOptions::new()
///     .with_name_format(ValueFormat::NAME_DEFAULT | ValueFormat::STRING_ESCAPE_CONTROL)
///     .with_spaced_equals(false);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FormatOptions {
    pub name_format: ValueFormat,
    pub value_format: ValueFormat,
    pub indent: Indent,
    pub spaced_equals: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            name_format: ValueFormat::NAME_DEFAULT,
            value_format: ValueFormat::ALL_DEFAULT,
            indent: Indent::default(),
            spaced_equals: true,
        }
    }
}

impl FormatOptions {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Default quoting with two-space indentation and `name=value`.
    #[must_use]
    pub fn compact() -> Self {
        FormatOptions {
            indent: Indent::Spaces(2),
            spaced_equals: false,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_name_format(mut self, format: ValueFormat) -> Self {
        self.name_format = format;
        self
    }

    #[must_use]
    pub fn with_value_format(mut self, format: ValueFormat) -> Self {
        self.value_format = format;
        self
    }

    /// Sets the indentation used inside nested scopes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use duct_script::{FormatOptions, Indent};
    ///
    /// let options = FormatOptions::new().with_indent(Indent::Spaces(4));
    /// assert_eq!(options.indent, Indent::Spaces(4));
    /// ```
    #[must_use]
    pub fn with_indent(mut self, indent: Indent) -> Self {
        self.indent = indent;
        self
    }

    /// Chooses between `name = value` and `name=value`.
    #[must_use]
    pub fn with_spaced_equals(mut self, spaced: bool) -> Self {
        self.spaced_equals = spaced;
        self
    }
}
