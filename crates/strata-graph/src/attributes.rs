//! Attribute definitions and typed attribute values.
//!
//! Attributes are addressed by a small dense index rather than by name once
//! defined; the [`AttributeManager`] owns the name to index mapping for a
//! single nodeset and is meaningless outside of it.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strata_core::errors::{codes, StrataError};
use strata_core::Payload;

use crate::errors::{attribute_not_found, constraint, invalid_argument, shape};

/// Upper bound on simultaneously defined attributes per nodeset.
pub const MAX_ATTRIBUTES: usize = 256;

/// Declared type of a node attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeType {
    /// Signed integer values.
    Integer,
    /// Floating point values.
    Float,
    /// Boolean values.
    Boolean,
    /// Single character values.
    Character,
}

impl AttributeType {
    /// Parses a textual value into a typed value of this kind.
    pub fn parse_value(&self, raw: &str) -> Result<AttributeValue, StrataError> {
        let trimmed = raw.trim();
        let parsed = match self {
            AttributeType::Integer => trimmed.parse::<i64>().ok().map(AttributeValue::Integer),
            AttributeType::Float => trimmed
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .map(AttributeValue::Float),
            AttributeType::Boolean => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "1" => Some(AttributeValue::Boolean(true)),
                "false" | "0" => Some(AttributeValue::Boolean(false)),
                _ => None,
            },
            AttributeType::Character => {
                let mut chars = trimmed.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => Some(AttributeValue::Character(ch)),
                    _ => None,
                }
            }
        };
        parsed.ok_or_else(|| {
            invalid_argument("value cannot be parsed for attribute type")
                .with_context("type", self)
                .with_context("value", raw)
        })
    }

    /// Returns whether the type is numeric (integer or float).
    pub fn is_numeric(&self) -> bool {
        matches!(self, AttributeType::Integer | AttributeType::Float)
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AttributeType::Integer => "int",
            AttributeType::Float => "float",
            AttributeType::Boolean => "bool",
            AttributeType::Character => "char",
        };
        f.write_str(label)
    }
}

impl FromStr for AttributeType {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "int" | "integer" => Ok(AttributeType::Integer),
            "float" => Ok(AttributeType::Float),
            "bool" | "boolean" => Ok(AttributeType::Boolean),
            "char" | "character" => Ok(AttributeType::Character),
            other => Err(invalid_argument("unknown attribute type")
                .with_context("type", other)
                .with_hint("expected one of: int, float, bool, char")),
        }
    }
}

/// Typed attribute value; its tag must match the attribute's declared type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    /// Integer value.
    Integer(i64),
    /// Floating point value.
    Float(f64),
    /// Boolean value.
    Boolean(bool),
    /// Character value.
    Character(char),
}

impl AttributeValue {
    /// Returns the type tag of the value.
    pub fn kind(&self) -> AttributeType {
        match self {
            AttributeValue::Integer(_) => AttributeType::Integer,
            AttributeValue::Float(_) => AttributeType::Float,
            AttributeValue::Boolean(_) => AttributeType::Boolean,
            AttributeValue::Character(_) => AttributeType::Character,
        }
    }

    /// Returns the value as a float for numeric kinds.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Integer(value) => Some(*value as f64),
            AttributeValue::Float(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Integer(value) => write!(f, "{value}"),
            AttributeValue::Float(value) => write!(f, "{value}"),
            AttributeValue::Boolean(value) => write!(f, "{value}"),
            AttributeValue::Character(value) => write!(f, "{value}"),
        }
    }
}

impl From<AttributeValue> for Payload {
    fn from(value: AttributeValue) -> Self {
        match value {
            AttributeValue::Integer(v) => Payload::Integer(v),
            AttributeValue::Float(v) => Payload::Float(v),
            AttributeValue::Boolean(v) => Payload::Boolean(v),
            AttributeValue::Character(v) => Payload::Text(v.to_string()),
        }
    }
}

/// Dense attribute index, stable for the lifetime of its definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AttributeIndex(u8);

impl AttributeIndex {
    /// Creates an index from its raw byte.
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    /// Returns the raw byte.
    pub const fn as_raw(&self) -> u8 {
        self.0
    }
}

/// A registered attribute: name, declared type and index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    /// Case-sensitive attribute name.
    pub name: String,
    /// Declared value type.
    pub kind: AttributeType,
    /// Index used for per-node storage.
    pub index: AttributeIndex,
}

/// Registry of attribute definitions for one nodeset.
///
/// Undefining an attribute frees its index; the lowest free index is handed out
/// to the next definition. The owning nodeset purges every stored value for an
/// index before it is released, so a recycled index never exposes stale values.
#[derive(Debug, Clone, Default)]
pub struct AttributeManager {
    by_name: BTreeMap<String, AttributeDefinition>,
    slots: Vec<Option<String>>,
}

impl AttributeManager {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines `name` with type `kind`, returning its index.
    ///
    /// Re-defining with the same type is idempotent; a different type fails with
    /// `AttributeTypeConflict`.
    pub fn define(
        &mut self,
        name: &str,
        kind: AttributeType,
    ) -> Result<AttributeIndex, StrataError> {
        if let Some(existing) = self.by_name.get(name) {
            if existing.kind != kind {
                return Err(shape(
                    codes::ATTRIBUTE_TYPE_CONFLICT,
                    "attribute already defined with a different type",
                )
                .with_context("attribute", name)
                .with_context("defined", existing.kind)
                .with_context("requested", kind));
            }
            return Ok(existing.index);
        }
        if name.trim().is_empty() {
            return Err(invalid_argument("attribute name must not be empty"));
        }
        let slot = match self.slots.iter().position(Option::is_none) {
            Some(free) => free,
            None if self.slots.len() < MAX_ATTRIBUTES => {
                self.slots.push(None);
                self.slots.len() - 1
            }
            None => {
                return Err(constraint(
                    codes::CONSTRAINT_ATTRIBUTE_LIMIT,
                    "nodeset attribute limit reached",
                )
                .with_context("limit", MAX_ATTRIBUTES))
            }
        };
        let index = AttributeIndex(slot as u8);
        self.slots[slot] = Some(name.to_string());
        self.by_name.insert(
            name.to_string(),
            AttributeDefinition {
                name: name.to_string(),
                kind,
                index,
            },
        );
        Ok(index)
    }

    /// Removes the definition for `name` and releases its index.
    pub fn undefine(&mut self, name: &str) -> Result<AttributeDefinition, StrataError> {
        let definition = self
            .by_name
            .remove(name)
            .ok_or_else(|| attribute_not_found(name))?;
        self.slots[definition.index.0 as usize] = None;
        Ok(definition)
    }

    /// Looks up a definition by name.
    pub fn get(&self, name: &str) -> Result<&AttributeDefinition, StrataError> {
        self.by_name.get(name).ok_or_else(|| attribute_not_found(name))
    }

    /// Looks up a definition by index.
    pub fn by_index(&self, index: AttributeIndex) -> Option<&AttributeDefinition> {
        self.slots
            .get(index.0 as usize)
            .and_then(Option::as_ref)
            .and_then(|name| self.by_name.get(name))
    }

    /// Returns whether `name` is defined.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Returns the number of defined attributes.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Returns whether no attributes are defined.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Returns all definitions ordered by index.
    pub fn definitions(&self) -> Vec<&AttributeDefinition> {
        self.slots
            .iter()
            .flatten()
            .filter_map(|name| self.by_name.get(name))
            .collect()
    }
}
