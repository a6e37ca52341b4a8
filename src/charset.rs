//! Character classification by inclusive ranges.
//!
//! A [`CharacterSet`] is an ordered list of [`CharacterRange`]s; membership
//! is the OR across every range. The lexer builds its whitespace, digit and
//! sign classes from these.
//!
//! ## Examples
//!
//! ```rust
//! use duct_script::CharacterSet;
//!
//! let numbers = CharacterSet::from_pattern("0-9\\-+").unwrap();
//! assert!(numbers.contains('7'));
//! assert!(numbers.contains('-'));
//! assert!(!numbers.contains('.'));
//! ```

use crate::{Error, Result};

/// An inclusive range of characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharacterRange {
    start: char,
    end: char,
}

impl CharacterRange {
    /// Creates a range covering `start..=end`.
    ///
    /// # Errors
    ///
    /// Returns an error if `end` sorts before `start`.
    pub fn new(start: char, end: char) -> Result<Self> {
        if end < start {
            return Err(Error::custom(format!(
                "invalid character range: {start:?} > {end:?}"
            )));
        }
        Ok(CharacterRange { start, end })
    }

    /// Creates a range holding one character.
    #[must_use]
    pub const fn single(c: char) -> Self {
        CharacterRange { start: c, end: c }
    }

    #[inline]
    #[must_use]
    pub const fn start(&self) -> char {
        self.start
    }

    #[inline]
    #[must_use]
    pub const fn end(&self) -> char {
        self.end
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, c: char) -> bool {
        c >= self.start && c <= self.end
    }

    /// Returns `true` if the ranges overlap or touch end-to-start.
    #[must_use]
    pub fn intersects(&self, other: &CharacterRange) -> bool {
        let adjacent = |a: char, b: char| (a as u32) + 1 == b as u32;
        adjacent(self.end, other.start)
            || adjacent(other.end, self.start)
            || !(self.start > other.end || self.end < other.start)
    }
}

/// A set of character ranges.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CharacterSet {
    ranges: Vec<CharacterRange>,
}

impl CharacterSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a range pattern such as `"a-zA-Z_"` or `"0-9\\-+"`.
    ///
    /// `x-y` adds an inclusive range (reversed bounds are swapped), a
    /// backslash makes the next character literal, and everything else adds
    /// itself.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern ends inside a range (`"a-"`).
    pub fn from_pattern(pattern: &str) -> Result<Self> {
        let mut set = CharacterSet::new();
        let mut last: Option<char> = None;
        let mut in_range = false;
        let mut escape = false;

        for c in pattern.chars() {
            if escape {
                escape = false;
            } else if c == '\\' {
                escape = true;
                continue;
            } else if last.is_some() && c == '-' && !in_range {
                in_range = true;
                continue;
            }

            match last {
                Some(prev) if in_range => {
                    let (lo, hi) = if c < prev { (c, prev) } else { (prev, c) };
                    set.add_range(lo, hi)?;
                    last = None;
                    in_range = false;
                }
                Some(prev) => {
                    set.add_char(prev);
                    last = Some(c);
                }
                None => last = Some(c),
            }
        }

        if let Some(prev) = last {
            if in_range {
                return Err(Error::custom(format!(
                    "invalid range in pattern: {pattern:?}"
                )));
            }
            set.add_char(prev);
        }
        Ok(set)
    }

    /// Tab and space. Newlines are significant to the lexer and excluded.
    #[must_use]
    pub fn whitespace() -> Self {
        CharacterSet::new().with_char('\t').with_char(' ')
    }

    #[must_use]
    pub fn numbers() -> Self {
        CharacterSet::new().with_range('0', '9')
    }

    #[must_use]
    pub fn letters() -> Self {
        CharacterSet::new().with_range('A', 'Z').with_range('a', 'z')
    }

    #[must_use]
    pub fn alphanumeric() -> Self {
        CharacterSet::letters().with_range('0', '9')
    }

    #[must_use]
    pub fn newline() -> Self {
        CharacterSet::new().with_char('\n')
    }

    pub fn add_char(&mut self, c: char) {
        self.ranges.push(CharacterRange::single(c));
    }

    /// # Errors
    ///
    /// Returns an error if `end` sorts before `start`.
    pub fn add_range(&mut self, start: char, end: char) -> Result<()> {
        self.ranges.push(CharacterRange::new(start, end)?);
        Ok(())
    }

    #[must_use]
    pub fn with_char(mut self, c: char) -> Self {
        self.add_char(c);
        self
    }

    // Callers pass literal bounds in order; a reversed pair is normalized.
    fn with_range(mut self, start: char, end: char) -> Self {
        let (lo, hi) = if end < start { (end, start) } else { (start, end) };
        self.ranges.push(CharacterRange { start: lo, end: hi });
        self
    }

    pub fn clear(&mut self) {
        self.ranges.clear();
    }

    #[must_use]
    pub fn ranges(&self) -> &[CharacterRange] {
        &self.ranges
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, c: char) -> bool {
        self.ranges.iter().any(|r| r.contains(c))
    }

    /// Returns `true` if every character of `s` is in the set.
    ///
    /// An empty string is trivially contained.
    #[must_use]
    pub fn is_all_in(&self, s: &str) -> bool {
        s.chars().all(|c| self.contains(c))
    }

    /// Byte offset of the first character of `s` in the set.
    #[must_use]
    pub fn find_in(&self, s: &str) -> Option<usize> {
        s.char_indices()
            .find(|(_, c)| self.contains(*c))
            .map(|(i, _)| i)
    }

    /// Byte offset of the last character of `s` in the set.
    #[must_use]
    pub fn rfind_in(&self, s: &str) -> Option<usize> {
        s.char_indices()
            .rev()
            .find(|(_, c)| self.contains(*c))
            .map(|(i, _)| i)
    }
}
