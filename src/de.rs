//! Deserialization of parsed trees into Rust types.
//!
//! This module provides a [`Deserializer`] that walks a parsed [`Node`]
//! and feeds it to any `Deserialize` implementation.
//!
//! ## Mapping
//!
//! - A **node** is a map keyed by its children's names, in statement order
//! - An **identifier** is a sequence of its values. An identifier holding a
//!   single value also satisfies scalar requests, and an empty one reads as
//!   `true` for `bool` and as `()` for unit
//! - A **value** is its primitive. Any scalar satisfies a string request,
//!   and `0`/`1` satisfy a `bool` request
//! - A string value names a unit enum variant; a node with one child names
//!   a variant carrying that child's content
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use duct_script::from_str;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Server { host: String, ports: Vec<u16>, tls: bool }
//!
//! let server: Server = from_str("host = localhost\nports 80 443\ntls").unwrap();
//! assert_eq!(server, Server { host: "localhost".into(), ports: vec![80, 443], tls: true });
//! ```

use crate::value::{Collection, Identifier, Node, Value, Variable, VariableType};
use crate::{Error, Result};
use serde::de::value::BorrowedStrDeserializer;
use serde::de::{self, IntoDeserializer};
use serde::forward_to_deserialize_any;
use std::slice;

const INT: VariableType = VariableType::INTEGER;
const NUMBER: VariableType = VariableType::INTEGER.union(VariableType::FLOAT);

#[derive(Clone, Copy, Debug)]
enum Source<'de> {
    Node(&'de Node),
    Identifier(&'de Identifier),
    Value(&'de Value),
}

/// A deserializer reading from a borrowed tree.
///
/// Strings are handed out borrowed, so targets may hold `&str` fields
/// that point into the tree.
#[derive(Clone, Copy, Debug)]
pub struct Deserializer<'de> {
    source: Source<'de>,
}

impl<'de> Deserializer<'de> {
    pub fn from_node(node: &'de Node) -> Self {
        Deserializer {
            source: Source::Node(node),
        }
    }

    pub fn from_variable(variable: &'de Variable) -> Self {
        let source = match variable {
            Variable::Value(v) => Source::Value(v.value()),
            Variable::Identifier(id) => Source::Identifier(id),
            Variable::Node(node) => Source::Node(node),
        };
        Deserializer { source }
    }

    /// The scalar behind this source, looking through single-value
    /// identifiers.
    fn scalar(self) -> Option<&'de Value> {
        match self.source {
            Source::Value(v) => Some(v),
            Source::Identifier(id) if id.len() == 1 => id.children()[0].value(),
            _ => None,
        }
    }

    fn found(self) -> &'static str {
        match self.source {
            Source::Node(_) => "node",
            Source::Identifier(_) => "identifier",
            Source::Value(v) => v.variable_type().type_name(),
        }
    }

    fn mismatch(self, expected: &str) -> Error {
        Error::type_mismatch(expected, self.found())
    }

    fn deserialize_scalar<V>(
        self,
        accepted: VariableType,
        expected: &str,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.scalar() {
            Some(value) if accepted.intersects(value.variable_type()) => {
                visit_value(value, visitor)
            }
            _ => Err(self.mismatch(expected)),
        }
    }
}

fn visit_value<'de, V>(value: &'de Value, visitor: V) -> Result<V::Value>
where
    V: de::Visitor<'de>,
{
    match value {
        Value::Int(i) => visitor.visit_i32(*i),
        Value::Str(s) => visitor.visit_borrowed_str(s),
        Value::Float(f) => visitor.visit_f32(*f),
        Value::Bool(b) => visitor.visit_bool(*b),
    }
}

macro_rules! deserialize_numbers {
    ($($method:ident => $accepted:expr, $expected:literal),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                self.deserialize_scalar($accepted, $expected, visitor)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for Deserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.source {
            Source::Value(v) => visit_value(v, visitor),
            Source::Identifier(id) => visitor.visit_seq(SeqAccess::new(id.children())),
            Source::Node(node) => visitor.visit_map(MapAccess::new(node.children())),
        }
    }

    deserialize_numbers! {
        deserialize_i8 => INT, "int",
        deserialize_i16 => INT, "int",
        deserialize_i32 => INT, "int",
        deserialize_i64 => INT, "int",
        deserialize_i128 => INT, "int",
        deserialize_u8 => INT, "int",
        deserialize_u16 => INT, "int",
        deserialize_u32 => INT, "int",
        deserialize_u64 => INT, "int",
        deserialize_u128 => INT, "int",
        deserialize_f32 => NUMBER, "float",
        deserialize_f64 => NUMBER, "float",
        deserialize_char => VariableType::STRING, "string",
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if let Source::Identifier(id) = self.source {
            if id.is_empty() {
                return visitor.visit_bool(true);
            }
        }
        match self.scalar().and_then(Value::as_bool_flag) {
            Some(b) => visitor.visit_bool(b),
            None => Err(self.mismatch("bool")),
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.scalar() {
            Some(Value::Str(s)) => visitor.visit_borrowed_str(s),
            Some(other) => visitor.visit_string(other.as_text()),
            None => Err(self.mismatch("string")),
        }
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.source {
            Source::Identifier(id) if id.is_empty() => visitor.visit_unit(),
            _ => Err(self.mismatch("unit")),
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.source {
            Source::Identifier(id) => visitor.visit_seq(SeqAccess::new(id.children())),
            Source::Node(node) => visitor.visit_seq(SeqAccess::new(node.children())),
            Source::Value(_) => Err(self.mismatch("sequence")),
        }
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.source {
            Source::Node(node) => visitor.visit_map(MapAccess::new(node.children())),
            _ => Err(self.mismatch("node")),
        }
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.source {
            Source::Identifier(id) => visitor.visit_seq(SeqAccess::new(id.children())),
            _ => self.deserialize_map(visitor),
        }
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match (self.source, self.scalar()) {
            (_, Some(Value::Str(s))) => visitor.visit_enum(s.as_str().into_deserializer()),
            (Source::Node(node), _) if node.len() == 1 => visitor.visit_enum(EnumAccess {
                variant: &node.children()[0],
            }),
            _ => Err(self.mismatch("enum")),
        }
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        bytes byte_buf
    }
}

struct SeqAccess<'de> {
    iter: slice::Iter<'de, Variable>,
}

impl<'de> SeqAccess<'de> {
    fn new(children: &'de [Variable]) -> Self {
        SeqAccess {
            iter: children.iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqAccess<'de> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(child) => seed.deserialize(Deserializer::from_variable(child)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct MapAccess<'de> {
    iter: slice::Iter<'de, Variable>,
    value: Option<&'de Variable>,
}

impl<'de> MapAccess<'de> {
    fn new(children: &'de [Variable]) -> Self {
        MapAccess {
            iter: children.iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapAccess<'de> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(child) => {
                self.value = Some(child);
                seed.deserialize(BorrowedStrDeserializer::<Error>::new(child.name()))
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(child) => seed.deserialize(Deserializer::from_variable(child)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct EnumAccess<'de> {
    variant: &'de Variable,
}

impl<'de> de::EnumAccess<'de> for EnumAccess<'de> {
    type Error = Error;
    type Variant = VariantAccess<'de>;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant =
            seed.deserialize(BorrowedStrDeserializer::<Error>::new(self.variant.name()))?;
        Ok((
            variant,
            VariantAccess {
                content: Deserializer::from_variable(self.variant),
            },
        ))
    }
}

struct VariantAccess<'de> {
    content: Deserializer<'de>,
}

impl<'de> de::VariantAccess<'de> for VariantAccess<'de> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.content.source {
            Source::Identifier(id) if id.is_empty() => Ok(()),
            _ => Err(self.content.mismatch("unit variant")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(self.content)
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        de::Deserializer::deserialize_seq(self.content, visitor)
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        de::Deserializer::deserialize_map(self.content, visitor)
    }
}
