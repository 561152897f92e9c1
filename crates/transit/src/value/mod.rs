//! Tree-structured document values.
//!
//! A [`Value`] is a JSON-like tagged tree: null, boolean, number, string,
//! array or object. Objects are backed by a `BTreeMap`, so their keys
//! iterate in lexicographic order regardless of input order.
//!
//! Accessors are checked: asking a value for the wrong variant yields
//! [`TransitError::TypeMismatch`] instead of a bogus result.

pub mod parser;
pub mod writer;

use std::collections::BTreeMap;
use std::fmt;

use crate::models::{Result, TransitError};

pub use parser::{from_reader, parse};
pub use writer::WriteOptions;

pub type Object = BTreeMap<String, Value>;

#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(Object),
}

impl Value {
    /// Name of the variant, as used in type mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    fn mismatch(&self, expected: &'static str) -> TransitError {
        TransitError::TypeMismatch {
            expected,
            found: self.kind(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(other.mismatch("boolean")),
        }
    }

    pub fn as_f64(&self) -> Result<f64> {
        match self {
            Value::Number(n) => Ok(*n),
            other => Err(other.mismatch("number")),
        }
    }

    /// The number as an integer; fractional or out-of-range numbers are
    /// rejected.
    pub fn as_i64(&self) -> Result<i64> {
        let n = self.as_f64()?;
        if n.fract() != 0.0 || n.abs() > writer::MAX_EXACT_INTEGER {
            return Err(TransitError::InvalidData(format!("{} is not an integer", n)));
        }
        Ok(n as i64)
    }

    pub fn as_str(&self) -> Result<&str> {
        match self {
            Value::String(s) => Ok(s),
            other => Err(other.mismatch("string")),
        }
    }

    pub fn as_array(&self) -> Result<&[Value]> {
        match self {
            Value::Array(items) => Ok(items),
            other => Err(other.mismatch("array")),
        }
    }

    pub fn as_object(&self) -> Result<&Object> {
        match self {
            Value::Object(map) => Ok(map),
            other => Err(other.mismatch("object")),
        }
    }

    /// Look up `key` in an object value.
    ///
    /// Fails with `TypeMismatch` when `self` is not an object and with
    /// `MissingField` when the key is absent.
    pub fn field(&self, key: &'static str) -> Result<&Value> {
        self.as_object()?.get(key).ok_or(TransitError::MissingField(key))
    }

    /// Like [`Value::field`], but an absent key is `None`.
    pub fn optional_field(&self, key: &str) -> Result<Option<&Value>> {
        Ok(self.as_object()?.get(key))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Object> for Value {
    fn from(map: Object) -> Self {
        Value::Object(map)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::Array(iter.into_iter().collect())
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Value::Object(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Compact rendering; see [`writer`] for pretty output.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&writer::to_string(self, &WriteOptions::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_accessors() {
        assert_eq!(Value::Bool(true).as_bool().unwrap(), true);
        assert_eq!(Value::Number(3.5).as_f64().unwrap(), 3.5);
        assert_eq!(Value::from("Universam").as_str().unwrap(), "Universam");
        assert_eq!(Value::Array(vec![Value::Null]).as_array().unwrap().len(), 1);
        assert!(Value::Object(Object::new()).as_object().unwrap().is_empty());
        assert!(Value::Null.is_null());
    }

    #[test]
    fn test_type_mismatch() {
        let err = Value::Number(1.0).as_str().unwrap_err();
        assert!(matches!(
            err,
            TransitError::TypeMismatch {
                expected: "string",
                found: "number"
            }
        ));

        assert!(Value::from("true").as_bool().is_err());
        assert!(Value::Null.as_array().is_err());
        assert!(Value::Array(vec![]).as_object().is_err());
    }

    #[test]
    fn test_as_i64() {
        assert_eq!(Value::Number(1234.0).as_i64().unwrap(), 1234);
        assert_eq!(Value::Number(-7.0).as_i64().unwrap(), -7);
        assert!(matches!(Value::Number(1.5).as_i64(), Err(TransitError::InvalidData(_))));
        assert!(Value::from("1").as_i64().is_err());
    }

    #[test]
    fn test_field_lookup() {
        let value: Value = [("name", Value::from("750")), ("is_roundtrip", Value::Bool(false))]
            .into_iter()
            .collect();

        assert_eq!(value.field("name").unwrap().as_str().unwrap(), "750");
        assert!(matches!(value.field("stops"), Err(TransitError::MissingField("stops"))));
        assert!(value.optional_field("stops").unwrap().is_none());
        assert!(Value::Null.field("name").is_err());
    }

    #[test]
    fn test_object_keys_sorted() {
        let value: Value = [("type", Value::Null), ("name", Value::Null), ("id", Value::Null)]
            .into_iter()
            .collect();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();

        assert_eq!(keys, vec!["id", "name", "type"]);
    }
}
