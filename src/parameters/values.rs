//! Typed parameter values produced by validation.

use crate::types::{Error, Result};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// A concrete, typed parameter value.
///
/// Also the element type of bound statement arguments.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// Embedding vector substituted by `embed_params`.
    Vector(Vec<f32>),
    Array(Vec<ParamValue>),
}

impl ParamValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParamValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ParamValue::Null)
    }

    /// Runtime type name, matching the manifest vocabulary.
    pub fn type_name(&self) -> &'static str {
        match self {
            ParamValue::Null => "null",
            ParamValue::Boolean(_) => "boolean",
            ParamValue::Integer(_) => "integer",
            ParamValue::Float(_) => "float",
            ParamValue::String(_) => "string",
            ParamValue::Vector(_) => "vector",
            ParamValue::Array(_) => "array",
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ParamValue::Null => serde_json::Value::Null,
            ParamValue::Boolean(b) => serde_json::Value::Bool(*b),
            ParamValue::Integer(i) => serde_json::Value::from(*i),
            ParamValue::Float(f) => serde_json::Value::from(*f),
            ParamValue::String(s) => serde_json::Value::String(s.clone()),
            ParamValue::Vector(v) => v.iter().map(|f| serde_json::Value::from(*f)).collect(),
            ParamValue::Array(items) => items.iter().map(ParamValue::to_json).collect(),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::String(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::String(s)
    }
}

impl From<i64> for ParamValue {
    fn from(i: i64) -> Self {
        ParamValue::Integer(i)
    }
}

impl From<f64> for ParamValue {
    fn from(f: f64) -> Self {
        ParamValue::Float(f)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Boolean(b)
    }
}

/// Validated parameter values, in parameter declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamValues(Vec<(String, ParamValue)>);

impl ParamValues {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Set a value, replacing any existing value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: ParamValue) {
        let name = name.into();
        let existing = self.0.iter().position(|(n, _)| *n == name);
        match existing {
            Some(i) => self.0[i].1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// String value of a parameter, or a type mismatch naming it.
    pub fn string(&self, name: &str) -> Result<&str> {
        let value = self.require(name)?;
        value
            .as_str()
            .ok_or_else(|| Error::type_mismatch(name, "string", value.type_name()))
    }

    /// Integer value of a parameter, or a type mismatch naming it.
    pub fn integer(&self, name: &str) -> Result<i64> {
        let value = self.require(name)?;
        value
            .as_i64()
            .ok_or_else(|| Error::type_mismatch(name, "integer", value.type_name()))
    }

    fn require(&self, name: &str) -> Result<&ParamValue> {
        self.get(name)
            .ok_or_else(|| Error::MissingRequiredParameter(name.to_string()))
    }
}

impl Serialize for ParamValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_in_place() {
        let mut values = ParamValues::new();
        values.insert("a", ParamValue::Integer(1));
        values.insert("b", "x".into());
        values.insert("a", ParamValue::Integer(2));

        let names: Vec<&str> = values.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(values.get("a"), Some(&ParamValue::Integer(2)));
    }

    #[test]
    fn test_typed_accessors() {
        let mut values = ParamValues::new();
        values.insert("limit", "ten".into());

        let err = values.integer("limit").unwrap_err();
        assert!(matches!(err, Error::ParameterTypeMismatch { ref name, .. } if name == "limit"));
        assert!(matches!(
            values.string("missing"),
            Err(Error::MissingRequiredParameter(_))
        ));
        assert_eq!(values.string("limit").unwrap(), "ten");
    }

    #[test]
    fn test_serializes_in_declaration_order() {
        let mut values = ParamValues::new();
        values.insert("zeta", ParamValue::Null);
        values.insert("alpha", ParamValue::Vector(vec![0.5]));

        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"{"zeta":null,"alpha":[0.5]}"#);
    }
}
