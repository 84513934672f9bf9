//! Record shapes
//!
//! - [`RawRecord`]: text input keyed by field name, owned by a form or edit session
//! - [`TypedRecord`]: coerced payload, only built after validation passes
//! - [`PersistedRecord`]: authoritative snapshot returned by the remote store

use crate::field::FieldSchema;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

/// Identifier assigned by the remote store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl RecordId {
    /// Raw numeric value
    #[inline]
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Unvalidated text input, keyed by field name in schema order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord {
    values: IndexMap<String, String>,
}

impl RawRecord {
    /// Create empty record
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(name, value)` pairs
    #[must_use]
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// Raw value of a field
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Replace one field, returning the previous value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.insert(name.into(), value.into())
    }

    /// Builder form of [`RawRecord::set`]
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Iterate `(name, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of fields present
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if no field is present
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, String)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Coerced field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypedValue {
    /// Whole number (credit score)
    Integer(i64),
    /// Decimal amount
    Float(f64),
    /// Enumerated value, passed through verbatim
    Text(String),
}

impl TypedValue {
    /// Convert to a JSON value
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Integer(i) => Value::from(*i),
            Self::Float(f) => serde_json::Number::from_f64(*f).map_or(Value::Null, Value::Number),
            Self::Text(s) => Value::String(s.clone()),
        }
    }
}

/// Validated payload ready for the remote store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypedRecord {
    values: IndexMap<String, TypedValue>,
}

impl TypedRecord {
    pub(crate) fn from_values(values: IndexMap<String, TypedValue>) -> Self {
        Self { values }
    }

    /// Typed value of a field
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.values.get(name)
    }

    /// Iterate `(name, value)` pairs in schema order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypedValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// JSON object form of the payload
    #[must_use]
    pub fn to_json_map(&self) -> Map<String, Value> {
        self.values
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect()
    }
}

/// Authoritative record snapshot from the remote store
///
/// Holds the schema fields and any server-derived attributes (credit rating,
/// timestamps). Derived attributes are never computed or validated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedRecord {
    /// Store-assigned identifier
    pub id: RecordId,
    #[serde(flatten)]
    attributes: Map<String, Value>,
}

impl PersistedRecord {
    /// Create from an id and raw attributes
    #[inline]
    #[must_use]
    pub fn new(id: RecordId, attributes: Map<String, Value>) -> Self {
        Self { id, attributes }
    }

    /// Create from a typed payload
    #[must_use]
    pub fn from_typed(id: RecordId, record: &TypedRecord) -> Self {
        Self::new(id, record.to_json_map())
    }

    /// Add or replace one attribute
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Store-assigned identifier
    #[inline]
    #[must_use]
    pub fn id(&self) -> RecordId {
        self.id
    }

    /// Attribute value by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// All attributes except the id
    #[inline]
    #[must_use]
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Attribute rendered as text, empty when absent
    #[must_use]
    pub fn display_value(&self, name: &str) -> String {
        self.get(name).map(stringify).unwrap_or_default()
    }

    /// Draft initialised from the current values of every schema field
    #[must_use]
    pub fn to_raw(&self, schema: &FieldSchema) -> RawRecord {
        schema
            .names()
            .map(|name| (name.to_string(), self.display_value(name)))
            .collect()
    }

    /// Attributes the schema does not declare
    pub fn derived<'a>(
        &'a self,
        schema: &'a FieldSchema,
    ) -> impl Iterator<Item = (&'a str, &'a Value)> + 'a {
        self.attributes
            .iter()
            .filter(move |(name, _)| !schema.contains(name))
            .map(|(name, value)| (name.as_str(), value))
    }
}

/// Render a JSON value the way a text input shows it
#[must_use]
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n
            .as_i64()
            .map(|i| i.to_string())
            .or_else(|| n.as_u64().map(|u| u.to_string()))
            .or_else(|| n.as_f64().map(|f| f.to_string()))
            .unwrap_or_else(|| n.to_string()),
        other => other.to_string(),
    }
}
