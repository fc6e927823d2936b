//! A single typed property value

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::PropertyError;

/// Raw key/value output of a fetch wrapper, before validation.
pub type RawProperties = serde_json::Map<String, Value>;

/// The closed set of value shapes a property can hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int64(i64),
    Float64(f64),
    String(String),
}

impl PropertyValue {
    /// Validate a raw JSON value, rejecting shapes that have no typed form.
    pub fn from_json(key: &str, value: Value) -> Result<Self, PropertyError> {
        let unsupported =
            |kind: &'static str| PropertyError::UnsupportedValue { key: key.to_string(), kind };

        match value {
            Value::Bool(b) => Ok(Self::Bool(b)),
            Value::String(s) => Ok(Self::String(s)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Self::Int64(i))
                } else if n.is_u64() {
                    Err(unsupported("uint64"))
                } else {
                    match n.as_f64() {
                        Some(f) if f.is_finite() => Ok(Self::Float64(f)),
                        _ => Err(unsupported("number")),
                    }
                }
            }
            Value::Null => Err(unsupported("null")),
            Value::Array(_) => Err(unsupported("array")),
            Value::Object(_) => Err(unsupported("object")),
        }
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int64(_) => "int64",
            Self::Float64(_) => "float64",
            Self::String(_) => "string",
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(*b),
            Self::Int64(i) => Value::from(*i),
            Self::Float64(f) => Value::from(*f),
            Self::String(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int64(i) => write!(f, "{i}"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::String(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Int64(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        Self::Int64(i64::from(value))
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Float64(value)
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

/// One named, typed attribute of an entity. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    key: String,
    value: PropertyValue,
}

impl Property {
    pub fn new(key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        Self { key: key.into(), value: value.into() }
    }

    /// Build a property from an untyped wrapper value.
    ///
    /// # Errors
    /// Returns [`PropertyError::UnsupportedValue`] naming the key when the
    /// value is null, an array, an object or an out-of-range number.
    pub fn from_raw(key: impl Into<String>, value: Value) -> Result<Self, PropertyError> {
        let key = key.into();
        let value = PropertyValue::from_json(&key, value)?;
        Ok(Self { key, value })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub const fn value(&self) -> &PropertyValue {
        &self.value
    }

    pub fn as_str(&self) -> Result<&str, PropertyError> {
        match &self.value {
            PropertyValue::String(s) => Ok(s),
            other => Err(self.mismatch("string", other)),
        }
    }

    pub fn as_string(&self) -> Result<String, PropertyError> {
        self.as_str().map(str::to_string)
    }

    pub fn as_i64(&self) -> Result<i64, PropertyError> {
        match &self.value {
            PropertyValue::Int64(i) => Ok(*i),
            other => Err(self.mismatch("int64", other)),
        }
    }

    pub fn as_bool(&self) -> Result<bool, PropertyError> {
        match &self.value {
            PropertyValue::Bool(b) => Ok(*b),
            other => Err(self.mismatch("bool", other)),
        }
    }

    /// Integers are widened; every other shape is a mismatch.
    pub fn as_f64(&self) -> Result<f64, PropertyError> {
        match &self.value {
            PropertyValue::Float64(f) => Ok(*f),
            #[allow(clippy::cast_precision_loss)]
            PropertyValue::Int64(i) => Ok(*i as f64),
            other => Err(self.mismatch("float64", other)),
        }
    }

    fn mismatch(&self, expected: &'static str, actual: &PropertyValue) -> PropertyError {
        PropertyError::TypeMismatch { key: self.key.clone(), expected, actual: actual.kind() }
    }
}
