//! The variable tree.
//!
//! A parsed script is a tree of [`Variable`]s rooted at an unnamed [`Node`].
//! Leaves are scalar [`Value`]s carried by a [`ValueVariable`]; containers
//! are [`Identifier`]s (`name v1 v2 …`) and [`Node`]s (`name { … }`).
//!
//! Containers own their children outright. There are no parent pointers:
//! detaching a child hands it back by value, so a detached variable can
//! never still point at its old container.
//!
//! ## Core Types
//!
//! - [`VariableType`]: the type-tag bitmask shared by templates and lookups
//! - [`Value`]: `Int`, `Str`, `Float` or `Bool`
//! - [`Variable`]: any tree element
//! - [`Collection`]: ordered child operations shared by both containers
//!
//! ## Usage Patterns
//!
//! ### Building a tree
//!
//! ```rust
//! use duct_script::{Collection, Identifier, Node, Variable};
//!
//! let mut flags = Identifier::new("flags");
//! flags.push(Variable::int("", 1));
//! flags.push(Variable::int("", 2));
//!
//! let mut server = Node::new("server");
//! server.push(Variable::string("host", "localhost"));
//! server.push(flags);
//!
//! assert_eq!(server.len(), 2);
//! assert_eq!(server.get_str("host", true), Some("localhost"));
//! ```
//!
//! ### Querying by type
//!
//! ```rust
//! use duct_script::{parse_str, Collection, VariableType};
//!
//! let root = parse_str("a = 1\nb = text\nc 1 2").unwrap();
//! assert!(root.find("a", true, VariableType::VALUE).is_some());
//! assert!(root.find("c", true, VariableType::VALUE).is_none());
//! assert!(root.find("C", false, VariableType::COLLECTION).is_some());
//! ```

use crate::{Error, Result};
use bitflags::bitflags;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;

bitflags! {
    /// Type tag of a variable.
    ///
    /// The bit values are part of the external contract and must not change.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct VariableType: u32 {
        const INTEGER = 0x1;
        const STRING = 0x2;
        const FLOAT = 0x4;
        const BOOL = 0x8;
        const IDENTIFIER = 0x40;
        const NODE = 0x80;

        const VALUE = Self::INTEGER.bits() | Self::STRING.bits() | Self::FLOAT.bits() | Self::BOOL.bits();
        const COLLECTION = Self::IDENTIFIER.bits() | Self::NODE.bits();
    }
}

impl VariableType {
    /// No type; an empty template tail.
    pub const NONE: Self = Self::empty();
    /// Every bit set.
    pub const ANY: Self = Self::from_bits_retain(u32::MAX);

    /// Returns the short name of a single type tag.
    #[must_use]
    pub fn type_name(self) -> &'static str {
        if self == Self::INTEGER {
            "int"
        } else if self == Self::STRING {
            "string"
        } else if self == Self::FLOAT {
            "float"
        } else if self == Self::BOOL {
            "bool"
        } else if self == Self::IDENTIFIER {
            "identifier"
        } else if self == Self::NODE {
            "node"
        } else if self.is_empty() {
            "none"
        } else {
            "mixed"
        }
    }

    /// Returns `true` when every bit of `self` is allowed by `mask`.
    ///
    /// This is the lookup rule: `ANY` admits everything, `VALUE` admits
    /// every scalar, and `NONE` admits nothing but itself.
    #[inline]
    #[must_use]
    pub fn is_subset_of(self, mask: Self) -> bool {
        mask.contains(self)
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Compares two names, optionally ignoring case.
#[must_use]
pub fn names_match(a: &str, b: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        a == b
    } else {
        a.chars()
            .flat_map(char::to_lowercase)
            .eq(b.chars().flat_map(char::to_lowercase))
    }
}

/// Reads `true`/`1` or `false`/`0` (case-insensitive words) as a boolean.
#[must_use]
pub fn parse_bool_flag(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") || text == "1" {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") || text == "0" {
        Some(false)
    } else {
        None
    }
}

/// Renders a float with one to four decimals, trailing zeros trimmed.
#[must_use]
pub fn format_float(value: f32) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let mut text = format!("{value:.4}");
    while text.ends_with('0') && !text.ends_with(".0") {
        text.pop();
    }
    if text == "-0.0" {
        text.remove(0);
    }
    text
}

/// A scalar value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i32),
    Str(String),
    Float(f32),
    Bool(bool),
}

impl Value {
    #[must_use]
    pub const fn variable_type(&self) -> VariableType {
        match self {
            Value::Int(_) => VariableType::INTEGER,
            Value::Str(_) => VariableType::STRING,
            Value::Float(_) => VariableType::FLOAT,
            Value::Bool(_) => VariableType::BOOL,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_int(&self) -> bool {
        matches!(self, Value::Int(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_str(&self) -> bool {
        matches!(self, Value::Str(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Reads the value as a boolean flag.
    ///
    /// Bools read as themselves, strings through [`parse_bool_flag`], and the
    /// integers `0` and `1` as `false` and `true`.
    #[must_use]
    pub fn as_bool_flag(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Str(s) => parse_bool_flag(s),
            Value::Int(1) => Some(true),
            Value::Int(0) => Some(false),
            _ => None,
        }
    }

    /// Plain text of the value, without quoting or escaping.
    #[must_use]
    pub fn as_text(&self) -> String {
        match self {
            Value::Int(i) => i.to_string(),
            Value::Str(s) => s.clone(),
            Value::Float(f) => format_float(*f),
            Value::Bool(b) => b.to_string(),
        }
    }

    /// Deduces a value from free text.
    ///
    /// Digits and signs make an integer, one decimal point among them a
    /// float. Anything else is a boolean when it reads as one, otherwise a
    /// string. Numeric text that fails to parse yields zero.
    ///
    /// ```rust
    /// use duct_script::Value;
    ///
    /// assert_eq!(Value::deduce("42"), Value::Int(42));
    /// assert_eq!(Value::deduce("-1.5"), Value::Float(-1.5));
    /// assert_eq!(Value::deduce("TRUE"), Value::Bool(true));
    /// assert_eq!(Value::deduce("1.2.3"), Value::Str("1.2.3".into()));
    /// ```
    #[must_use]
    pub fn deduce(text: &str) -> Value {
        if text.is_empty() {
            return Value::Str(String::new());
        }
        let mut deduced = VariableType::NONE;
        for c in text.chars() {
            match c {
                '0'..='9' | '+' | '-' => {
                    if deduced == VariableType::NONE {
                        deduced = VariableType::INTEGER;
                    }
                }
                '.' if deduced == VariableType::FLOAT => {
                    deduced = VariableType::STRING;
                    break;
                }
                '.' => deduced = VariableType::FLOAT,
                _ => {
                    deduced = VariableType::STRING;
                    break;
                }
            }
        }
        Value::parse_as(text, deduced).unwrap_or_else(|| Value::Str(text.to_string()))
    }

    /// Builds a value of type `ty` from text.
    ///
    /// Numeric text that fails to parse yields zero; booleans follow
    /// [`parse_bool_flag`] and default to `false`. A `STRING` request still
    /// turns boolean-looking text into `Bool`. Returns `None` when `ty` is
    /// not a single scalar type.
    #[must_use]
    pub fn parse_as(text: &str, ty: VariableType) -> Option<Value> {
        let value = if ty == VariableType::INTEGER {
            Value::Int(text.parse().unwrap_or(0))
        } else if ty == VariableType::FLOAT {
            Value::Float(text.parse().unwrap_or(0.0))
        } else if ty == VariableType::BOOL {
            Value::Bool(parse_bool_flag(text).unwrap_or(false))
        } else if ty == VariableType::STRING {
            match parse_bool_flag(text) {
                Some(b) => Value::Bool(b),
                None => Value::Str(text.to_string()),
            }
        } else {
            return None;
        };
        Some(value)
    }

    /// Replaces the value from text, keeping its type.
    pub fn set_from_str(&mut self, text: &str) {
        match self {
            Value::Int(i) => *i = text.parse().unwrap_or(0),
            Value::Str(s) => *s = text.to_string(),
            Value::Float(f) => *f = text.parse().unwrap_or(0.0),
            Value::Bool(b) => *b = parse_bool_flag(text) == Some(true),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Int(i) => serializer.serialize_i32(*i),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Float(f) => serializer.serialize_f32(*f),
            Value::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value)
    }
}

impl From<i16> for Value {
    fn from(value: i16) -> Self {
        Value::Int(value.into())
    }
}

impl From<u16> for Value {
    fn from(value: u16) -> Self {
        Value::Int(value.into())
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value)
    }
}

/// Narrows to `f32`, the only float width the language stores.
impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value as f32)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl TryFrom<Value> for i32 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Int(i) => Ok(i),
            other => Err(Error::type_mismatch("int", other.variable_type().type_name())),
        }
    }
}

impl TryFrom<Value> for f32 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Float(f) => Ok(f),
            #[allow(clippy::cast_precision_loss)]
            Value::Int(i) => Ok(i as f32),
            other => Err(Error::type_mismatch("float", other.variable_type().type_name())),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        value.as_bool_flag().ok_or_else(|| {
            Error::type_mismatch("bool", value.variable_type().type_name())
        })
    }
}

impl TryFrom<Value> for String {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(Error::type_mismatch("string", other.variable_type().type_name())),
        }
    }
}

/// A named scalar.
///
/// Values inside an [`Identifier`] are unnamed.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueVariable {
    name: String,
    value: Value,
}

impl ValueVariable {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        ValueVariable {
            name: name.into(),
            value: value.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    #[must_use]
    pub const fn variable_type(&self) -> VariableType {
        self.value.variable_type()
    }

    /// Replaces the value, returning the old one.
    ///
    /// # Errors
    ///
    /// Returns a type mismatch if `value` is a different scalar type; a
    /// variable's type never changes.
    pub fn set_value(&mut self, value: impl Into<Value>) -> Result<Value> {
        let value = value.into();
        if value.variable_type() != self.variable_type() {
            return Err(Error::type_mismatch(
                self.variable_type().type_name(),
                value.variable_type().type_name(),
            ));
        }
        Ok(std::mem::replace(&mut self.value, value))
    }

    pub fn set_from_str(&mut self, text: &str) {
        self.value.set_from_str(text);
    }
}

/// Ordered child operations shared by [`Identifier`] and [`Node`].
///
/// Lookups by name take a `case_sensitive` flag and, for [`find`], a type
/// mask that a child's type must be a subset of. Removal hands the child
/// back by value.
///
/// [`find`]: Collection::find
pub trait Collection {
    fn children(&self) -> &[Variable];

    fn children_mut(&mut self) -> &mut Vec<Variable>;

    fn len(&self) -> usize {
        self.children().len()
    }

    fn is_empty(&self) -> bool {
        self.children().is_empty()
    }

    fn clear(&mut self) {
        self.children_mut().clear();
    }

    fn push<V: Into<Variable>>(&mut self, variable: V)
    where
        Self: Sized,
    {
        self.children_mut().push(variable.into());
    }

    /// # Errors
    ///
    /// Returns an error if `index` is past the end.
    fn insert<V: Into<Variable>>(&mut self, index: usize, variable: V) -> Result<()>
    where
        Self: Sized,
    {
        let len = self.len();
        if index > len {
            return Err(Error::custom(format!(
                "insert index {index} out of range for {len} children"
            )));
        }
        self.children_mut().insert(index, variable.into());
        Ok(())
    }

    /// Inserts `variable` right after the child at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no child at `index`.
    fn insert_after<V: Into<Variable>>(&mut self, index: usize, variable: V) -> Result<()>
    where
        Self: Sized,
    {
        if index >= self.len() {
            return Err(Error::custom(format!("no child at index {index}")));
        }
        self.insert(index + 1, variable)
    }

    fn get_at(&self, index: usize) -> Option<&Variable> {
        self.children().get(index)
    }

    fn get_at_mut(&mut self, index: usize) -> Option<&mut Variable> {
        self.children_mut().get_mut(index)
    }

    fn remove_at(&mut self, index: usize) -> Option<Variable> {
        (index < self.len()).then(|| self.children_mut().remove(index))
    }

    /// Removes the first child equal to `variable`.
    fn remove_variable(&mut self, variable: &Variable) -> Option<Variable> {
        let index = self.children().iter().position(|c| c == variable)?;
        self.remove_at(index)
    }

    /// Removes the first child whose type fits `mask`.
    fn remove_type(&mut self, mask: VariableType) -> Option<Variable> {
        let index = self
            .children()
            .iter()
            .position(|c| c.variable_type().is_subset_of(mask))?;
        self.remove_at(index)
    }

    /// Removes the first child named `name` whose type fits `mask`.
    fn remove_named(
        &mut self,
        name: &str,
        case_sensitive: bool,
        mask: VariableType,
    ) -> Option<Variable> {
        let index = self.position(name, case_sensitive, mask)?;
        self.remove_at(index)
    }

    /// Index of the first child named `name` whose type fits `mask`.
    fn position(&self, name: &str, case_sensitive: bool, mask: VariableType) -> Option<usize> {
        self.children().iter().position(|c| {
            names_match(c.name(), name, case_sensitive) && c.variable_type().is_subset_of(mask)
        })
    }

    fn find(&self, name: &str, case_sensitive: bool, mask: VariableType) -> Option<&Variable> {
        let index = self.position(name, case_sensitive, mask)?;
        self.children().get(index)
    }

    fn find_mut(
        &mut self,
        name: &str,
        case_sensitive: bool,
        mask: VariableType,
    ) -> Option<&mut Variable> {
        let index = self.position(name, case_sensitive, mask)?;
        self.children_mut().get_mut(index)
    }

    /// Case-sensitive lookup of any child type.
    fn get(&self, name: &str) -> Option<&Variable> {
        self.find(name, true, VariableType::ANY)
    }

    fn get_int(&self, name: &str, case_sensitive: bool) -> Option<i32> {
        self.find(name, case_sensitive, VariableType::INTEGER)
            .and_then(Variable::as_int)
    }

    fn get_str(&self, name: &str, case_sensitive: bool) -> Option<&str> {
        self.find(name, case_sensitive, VariableType::STRING)
            .and_then(Variable::as_str)
    }

    fn get_float(&self, name: &str, case_sensitive: bool) -> Option<f32> {
        self.find(name, case_sensitive, VariableType::FLOAT)
            .and_then(Variable::as_float)
    }

    fn get_bool(&self, name: &str, case_sensitive: bool) -> Option<bool> {
        self.find(name, case_sensitive, VariableType::BOOL)
            .and_then(Variable::as_bool)
    }

    fn get_identifier(&self, name: &str, case_sensitive: bool) -> Option<&Identifier> {
        self.find(name, case_sensitive, VariableType::IDENTIFIER)
            .and_then(Variable::as_identifier)
    }

    fn get_identifier_mut(&mut self, name: &str, case_sensitive: bool) -> Option<&mut Identifier> {
        self.find_mut(name, case_sensitive, VariableType::IDENTIFIER)
            .and_then(Variable::as_identifier_mut)
    }

    fn get_node(&self, name: &str, case_sensitive: bool) -> Option<&Node> {
        self.find(name, case_sensitive, VariableType::NODE)
            .and_then(Variable::as_node)
    }

    fn get_node_mut(&mut self, name: &str, case_sensitive: bool) -> Option<&mut Node> {
        self.find_mut(name, case_sensitive, VariableType::NODE)
            .and_then(Variable::as_node_mut)
    }

    /// Plain text of the scalar at `index`.
    fn text_at(&self, index: usize) -> Option<String> {
        self.get_at(index).and_then(Variable::value).map(Value::as_text)
    }
}

/// A named list of values: `name v1 v2 …`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Identifier {
    name: String,
    children: Vec<Variable>,
}

impl Identifier {
    pub fn new(name: impl Into<String>) -> Self {
        Identifier {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Builds an identifier holding `values` as unnamed scalars.
    pub fn with_values<I, V>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Identifier {
            name: name.into(),
            children: values
                .into_iter()
                .map(|v| Variable::Value(ValueVariable::new("", v)))
                .collect(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Iterates over the scalar children, skipping anything else.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.children.iter().filter_map(Variable::value)
    }
}

impl Collection for Identifier {
    fn children(&self) -> &[Variable] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut Vec<Variable> {
        &mut self.children
    }
}

/// A named scope: `name { … }`. The root of a tree is an unnamed node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Node {
    name: String,
    children: Vec<Variable>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Node {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// An unnamed node.
    #[must_use]
    pub fn root() -> Self {
        Node::default()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}

impl Collection for Node {
    fn children(&self) -> &[Variable] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut Vec<Variable> {
        &mut self.children
    }
}

/// Any element of the tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Variable {
    Value(ValueVariable),
    Identifier(Identifier),
    Node(Node),
}

impl Variable {
    pub fn int(name: impl Into<String>, value: i32) -> Self {
        Variable::Value(ValueVariable::new(name, Value::Int(value)))
    }

    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Variable::Value(ValueVariable::new(name, Value::Str(value.into())))
    }

    pub fn float(name: impl Into<String>, value: f32) -> Self {
        Variable::Value(ValueVariable::new(name, Value::Float(value)))
    }

    pub fn bool(name: impl Into<String>, value: bool) -> Self {
        Variable::Value(ValueVariable::new(name, Value::Bool(value)))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Variable::Value(v) => v.name(),
            Variable::Identifier(id) => id.name(),
            Variable::Node(node) => node.name(),
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        match self {
            Variable::Value(v) => v.set_name(name),
            Variable::Identifier(id) => id.set_name(name),
            Variable::Node(node) => node.set_name(name),
        }
    }

    #[must_use]
    pub const fn variable_type(&self) -> VariableType {
        match self {
            Variable::Value(v) => v.variable_type(),
            Variable::Identifier(_) => VariableType::IDENTIFIER,
            Variable::Node(_) => VariableType::NODE,
        }
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.variable_type().type_name()
    }

    #[inline]
    #[must_use]
    pub const fn is_value(&self) -> bool {
        matches!(self, Variable::Value(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_identifier(&self) -> bool {
        matches!(self, Variable::Identifier(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_node(&self) -> bool {
        matches!(self, Variable::Node(_))
    }

    #[must_use]
    pub const fn value(&self) -> Option<&Value> {
        match self {
            Variable::Value(v) => Some(v.value()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_value_variable(&self) -> Option<&ValueVariable> {
        match self {
            Variable::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_value_variable_mut(&mut self) -> Option<&mut ValueVariable> {
        match self {
            Variable::Value(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i32> {
        self.value().and_then(Value::as_int)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.value().and_then(Value::as_str)
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f32> {
        self.value().and_then(Value::as_float)
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        self.value().and_then(Value::as_bool)
    }

    #[must_use]
    pub const fn as_identifier(&self) -> Option<&Identifier> {
        match self {
            Variable::Identifier(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_identifier_mut(&mut self) -> Option<&mut Identifier> {
        match self {
            Variable::Identifier(id) => Some(id),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_node(&self) -> Option<&Node> {
        match self {
            Variable::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_node_mut(&mut self) -> Option<&mut Node> {
        match self {
            Variable::Node(node) => Some(node),
            _ => None,
        }
    }
}

impl From<ValueVariable> for Variable {
    fn from(value: ValueVariable) -> Self {
        Variable::Value(value)
    }
}

impl From<Identifier> for Variable {
    fn from(value: Identifier) -> Self {
        Variable::Identifier(value)
    }
}

impl From<Node> for Variable {
    fn from(value: Node) -> Self {
        Variable::Node(value)
    }
}

impl Serialize for Variable {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Variable::Value(v) => v.value().serialize(serializer),
            Variable::Identifier(id) => id.serialize(serializer),
            Variable::Node(node) => node.serialize(serializer),
        }
    }
}

impl Serialize for Identifier {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.children.len()))?;
        for child in &self.children {
            seq.serialize_element(child)?;
        }
        seq.end()
    }
}

impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.children.len()))?;
        for child in &self.children {
            map.serialize_entry(child.name(), child)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        let mut node = Node::new("sample");
        node.push(Variable::int("count", 3));
        node.push(Variable::string("Title", "duct"));
        node.push(Identifier::with_values("list", [1, 2]));
        node.push(Node::new("inner"));
        node
    }

    #[test]
    fn test_type_tag_values() {
        assert_eq!(VariableType::INTEGER.bits(), 0x1);
        assert_eq!(VariableType::STRING.bits(), 0x2);
        assert_eq!(VariableType::FLOAT.bits(), 0x4);
        assert_eq!(VariableType::BOOL.bits(), 0x8);
        assert_eq!(VariableType::IDENTIFIER.bits(), 0x40);
        assert_eq!(VariableType::NODE.bits(), 0x80);
        assert_eq!(VariableType::VALUE.bits(), 0xF);
        assert_eq!(VariableType::COLLECTION.bits(), 0xC0);
        assert_eq!(VariableType::NONE.bits(), 0);
        assert_eq!(VariableType::ANY.bits(), u32::MAX);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(VariableType::FLOAT.type_name(), "float");
        assert_eq!(VariableType::NODE.to_string(), "node");
        assert_eq!(VariableType::VALUE.type_name(), "mixed");
        assert_eq!(Variable::bool("b", true).type_name(), "bool");
    }

    #[test]
    fn test_subset_rule() {
        assert!(VariableType::INTEGER.is_subset_of(VariableType::VALUE));
        assert!(VariableType::NODE.is_subset_of(VariableType::ANY));
        assert!(!VariableType::NODE.is_subset_of(VariableType::VALUE));
        assert!(!VariableType::INTEGER.is_subset_of(VariableType::NONE));
    }

    #[test]
    fn test_names_match() {
        assert!(names_match("Host", "host", false));
        assert!(!names_match("Host", "host", true));
        assert!(names_match("", "", true));
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(2.0), "2.0");
        assert_eq!(format_float(1.5), "1.5");
        assert_eq!(format_float(0.125), "0.125");
        assert_eq!(format_float(3.14159), "3.1416");
        assert_eq!(format_float(-0.00001), "0.0");
        assert_eq!(format_float(-7.25), "-7.25");
    }

    #[test]
    fn test_deduce() {
        assert_eq!(Value::deduce("-12"), Value::Int(-12));
        assert_eq!(Value::deduce(".5"), Value::Float(0.5));
        assert_eq!(Value::deduce("1"), Value::Int(1));
        assert_eq!(Value::deduce("False"), Value::Bool(false));
        assert_eq!(Value::deduce("word"), Value::Str("word".into()));
        assert_eq!(Value::deduce(""), Value::Str(String::new()));
        // Digits and signs that do not parse fall back to zero.
        assert_eq!(Value::deduce("1-2"), Value::Int(0));
    }

    #[test]
    fn test_parse_as() {
        assert_eq!(
            Value::parse_as("7", VariableType::FLOAT),
            Some(Value::Float(7.0))
        );
        assert_eq!(
            Value::parse_as("x", VariableType::INTEGER),
            Some(Value::Int(0))
        );
        assert_eq!(Value::parse_as("x", VariableType::NODE), None);
    }

    #[test]
    fn test_set_from_str_keeps_type() {
        let mut v = Value::Bool(false);
        v.set_from_str("TRUE");
        assert_eq!(v, Value::Bool(true));
        let mut v = Value::Int(5);
        v.set_from_str("nope");
        assert_eq!(v, Value::Int(0));
    }

    #[test]
    fn test_bool_flag() {
        assert_eq!(Value::Int(1).as_bool_flag(), Some(true));
        assert_eq!(Value::Int(2).as_bool_flag(), None);
        assert_eq!(Value::from("false").as_bool_flag(), Some(false));
        assert_eq!(Value::Float(1.0).as_bool_flag(), None);
    }

    #[test]
    fn test_try_from() {
        assert_eq!(i32::try_from(Value::Int(4)).unwrap(), 4);
        assert!(i32::try_from(Value::from("4")).is_err());
        assert_eq!(f32::try_from(Value::Int(2)).unwrap(), 2.0);
        assert!(bool::try_from(Value::from("1")).unwrap());
        assert_eq!(String::try_from(Value::from("s")).unwrap(), "s");
    }

    #[test]
    fn test_set_value_type_is_fixed() {
        let mut v = ValueVariable::new("n", 1);
        assert_eq!(v.set_value(2).unwrap(), Value::Int(1));
        assert!(v.set_value("two").is_err());
        assert_eq!(v.value(), &Value::Int(2));
    }

    #[test]
    fn test_find_and_getters() {
        let node = sample();
        assert_eq!(node.get_int("count", true), Some(3));
        assert_eq!(node.get_str("title", false), Some("duct"));
        assert_eq!(node.get_str("title", true), None);
        assert!(node.get_identifier("list", true).is_some());
        assert!(node.get_node("inner", true).is_some());
        assert!(node.find("count", true, VariableType::STRING).is_none());
        assert_eq!(node.text_at(0).as_deref(), Some("3"));
        assert_eq!(node.text_at(2), None);
    }

    #[test]
    fn test_mutable_getters() {
        let mut node = sample();
        node.get_identifier_mut("list", true)
            .unwrap()
            .push(Variable::int("", 3));
        assert_eq!(node.get_identifier("list", true).unwrap().len(), 3);
        node.get_node_mut("inner", true)
            .unwrap()
            .push(Variable::bool("on", true));
        assert_eq!(
            node.get_node("inner", true).unwrap().get_bool("on", true),
            Some(true)
        );
    }

    #[test]
    fn test_insert_and_insert_after() {
        let mut node = Node::root();
        node.push(Variable::int("a", 1));
        node.push(Variable::int("c", 3));
        node.insert_after(0, Variable::int("b", 2)).unwrap();
        node.insert(0, Variable::int("z", 0)).unwrap();
        let names: Vec<&str> = node.children().iter().map(Variable::name).collect();
        assert_eq!(names, vec!["z", "a", "b", "c"]);
        assert!(node.insert(9, Variable::int("x", 0)).is_err());
        assert!(node.insert_after(4, Variable::int("x", 0)).is_err());
    }

    #[test]
    fn test_removal() {
        let mut node = sample();
        let removed = node.remove_type(VariableType::COLLECTION).unwrap();
        assert_eq!(removed.name(), "list");
        let removed = node
            .remove_named("TITLE", false, VariableType::ANY)
            .unwrap();
        assert_eq!(removed.as_str(), Some("duct"));
        assert!(node.remove_named("count", true, VariableType::FLOAT).is_none());
        let count = Variable::int("count", 3);
        assert_eq!(node.remove_variable(&count), Some(count));
        assert_eq!(node.len(), 1);
        assert!(node.remove_at(1).is_none());
        assert!(node.remove_at(0).unwrap().is_node());
        assert!(node.is_empty());
    }

    #[test]
    fn test_clone_is_deep() {
        let original = sample();
        let mut copy = original.clone();
        copy.get_identifier_mut("list", true).unwrap().clear();
        assert_eq!(original.get_identifier("list", true).unwrap().len(), 2);
        assert_ne!(original, copy);
    }

    #[test]
    fn test_identifier_values() {
        let mut id = Identifier::with_values("mixed", [1, 2]);
        id.push(Node::new("odd"));
        let values: Vec<&Value> = id.values().collect();
        assert_eq!(values, vec![&Value::Int(1), &Value::Int(2)]);
    }
}
