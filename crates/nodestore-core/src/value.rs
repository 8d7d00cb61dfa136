//! Value tree - the generic representation records cross the store boundary in
//!
//! A `Value` is a pure tree: every node owns its children and mapping keys are
//! unique. Records encode into a `Value::Mapping` and decode back out of one
//! through the typed [`FromValue`] extraction helpers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::errors::DecodeError;
use crate::identifier::Identifier;

/// Pseudo field name reported when the value being decoded is not a mapping
pub const ROOT_FIELD: &str = "$";

/// Generic, recursively-defined value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<Value>),
    Mapping(BTreeMap<String, Value>),
}

/// Numeric payload of a [`Value::Number`]
///
/// Integers are kept apart from floats so store-assigned row ids survive a
/// round trip without precision loss.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    /// Widen to `f64` regardless of representation
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Integer(i) => i as f64,
            Number::Float(f) => f,
        }
    }
}

/// Variant names used in type mismatch reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    Integer,
    Float,
    String,
    Sequence,
    Mapping,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::Sequence => "sequence",
            ValueKind::Mapping => "mapping",
        };
        f.write_str(name)
    }
}

impl Value {
    /// Build a mapping from key/value pairs
    ///
    /// Later pairs overwrite earlier ones with the same key.
    pub fn mapping<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Mapping(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// An empty mapping
    pub fn empty_mapping() -> Self {
        Value::Mapping(BTreeMap::new())
    }

    /// The variant of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(Number::Integer(_)) => ValueKind::Integer,
            Value::Number(Number::Float(_)) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::Sequence(_) => ValueKind::Sequence,
            Value::Mapping(_) => ValueKind::Mapping,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(Number::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a key on a mapping; `None` for absent keys and non-mappings
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Extract a typed field from a mapping
    ///
    /// # Errors
    ///
    /// - `TypeMismatch` on [`ROOT_FIELD`] if `self` is not a mapping
    /// - `MissingField` if the key is absent and `T` is not optional
    /// - `TypeMismatch` if the key is present with the wrong variant
    pub fn extract<T: FromValue>(&self, key: &str) -> Result<T, DecodeError> {
        let map = self.as_mapping().ok_or_else(|| DecodeError::TypeMismatch {
            field: ROOT_FIELD.to_string(),
            expected: ValueKind::Mapping,
            actual: self.kind(),
        })?;

        match map.get(key) {
            Some(value) => T::from_value(key, value),
            None => T::from_absent(key),
        }
    }
}

/// Typed conversion out of a [`Value`] field
pub trait FromValue: Sized {
    /// Convert a present field value
    fn from_value(field: &str, value: &Value) -> Result<Self, DecodeError>;

    /// Called when the field is absent; required by default
    fn from_absent(field: &str) -> Result<Self, DecodeError> {
        Err(DecodeError::MissingField(field.to_string()))
    }
}

fn mismatch(field: &str, expected: ValueKind, value: &Value) -> DecodeError {
    DecodeError::TypeMismatch {
        field: field.to_string(),
        expected,
        actual: value.kind(),
    }
}

impl FromValue for String {
    fn from_value(field: &str, value: &Value) -> Result<Self, DecodeError> {
        match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(mismatch(field, ValueKind::String, other)),
        }
    }
}

impl FromValue for bool {
    fn from_value(field: &str, value: &Value) -> Result<Self, DecodeError> {
        match value {
            Value::Bool(b) => Ok(*b),
            other => Err(mismatch(field, ValueKind::Bool, other)),
        }
    }
}

impl FromValue for i64 {
    fn from_value(field: &str, value: &Value) -> Result<Self, DecodeError> {
        match value {
            Value::Number(Number::Integer(i)) => Ok(*i),
            other => Err(mismatch(field, ValueKind::Integer, other)),
        }
    }
}

impl FromValue for f64 {
    fn from_value(field: &str, value: &Value) -> Result<Self, DecodeError> {
        match value {
            Value::Number(n) => Ok(n.as_f64()),
            other => Err(mismatch(field, ValueKind::Float, other)),
        }
    }
}

impl FromValue for Value {
    fn from_value(_field: &str, value: &Value) -> Result<Self, DecodeError> {
        Ok(value.clone())
    }
}

impl FromValue for Identifier {
    /// Integers become store-assigned ids, strings become tokens
    fn from_value(field: &str, value: &Value) -> Result<Self, DecodeError> {
        match value {
            Value::Number(Number::Integer(i)) => Ok(Identifier::Integer(*i)),
            Value::String(s) => Ok(Identifier::Token(s.clone())),
            other => Err(mismatch(field, ValueKind::String, other)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(field: &str, value: &Value) -> Result<Self, DecodeError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(field, other).map(Some),
        }
    }

    fn from_absent(_field: &str) -> Result<Self, DecodeError> {
        Ok(None)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Number(Number::Integer(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Number(Number::Float(f))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Mapping(map)
    }
}

impl From<Identifier> for Value {
    fn from(id: Identifier) -> Self {
        match id {
            Identifier::Integer(i) => Value::from(i),
            Identifier::Token(s) => Value::String(s),
        }
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}
