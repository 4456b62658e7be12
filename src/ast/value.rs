//! Typed argument values
//!
//! Values serialize untagged so that rendered output matches what the form layer expects:
//! plain numbers, plain strings and nested objects.

use indexmap::IndexMap;
use serde::Serialize;

/// Arguments of one annotation, in source order
pub type ArgumentMap = IndexMap<String, Value>;

/// A single coerced argument value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Text(String),
    Nested(ArgumentMap),
}

impl Value {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_nested(&self) -> Option<&ArgumentMap> {
        match self {
            Value::Nested(entries) => Some(entries),
            _ => None,
        }
    }

    /// Look up a key inside a nested value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_nested().and_then(|entries| entries.get(key))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<ArgumentMap> for Value {
    fn from(entries: ArgumentMap) -> Self {
        Value::Nested(entries)
    }
}
