//! Parameter kinds and raw-value coercion.

use super::ParamValue;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declared type of a tool parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    String,
    Integer,
    Float,
    Boolean,
    Array(Box<ParameterKind>),
}

impl ParameterKind {
    /// Coerce a raw JSON value into a typed value of this kind.
    ///
    /// On failure returns a description of what was actually supplied.
    pub fn coerce(&self, value: &Value) -> Result<ParamValue, String> {
        match self {
            ParameterKind::String => value
                .as_str()
                .map(|s| ParamValue::String(s.to_string()))
                .ok_or_else(|| value_type_name(value).to_string()),
            ParameterKind::Integer => coerce_integer(value),
            ParameterKind::Float => value
                .as_f64()
                .map(ParamValue::Float)
                .ok_or_else(|| value_type_name(value).to_string()),
            ParameterKind::Boolean => value
                .as_bool()
                .map(ParamValue::Boolean)
                .ok_or_else(|| value_type_name(value).to_string()),
            ParameterKind::Array(items) => {
                let arr = value
                    .as_array()
                    .ok_or_else(|| value_type_name(value).to_string())?;
                arr.iter()
                    .enumerate()
                    .map(|(i, item)| {
                        items
                            .coerce(item)
                            .map_err(|actual| format!("{} at index {}", actual, i))
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(ParamValue::Array)
            }
        }
    }

    /// Whether an already-typed value belongs to this kind.
    pub fn accepts(&self, value: &ParamValue) -> bool {
        match (self, value) {
            (ParameterKind::String, ParamValue::String(_))
            | (ParameterKind::Integer, ParamValue::Integer(_))
            | (ParameterKind::Float, ParamValue::Float(_))
            | (ParameterKind::Boolean, ParamValue::Boolean(_)) => true,
            (ParameterKind::Array(items), ParamValue::Array(values)) => {
                values.iter().all(|v| items.accepts(v))
            }
            _ => false,
        }
    }

    /// Type name used in the generic manifest.
    pub fn type_name(&self) -> &'static str {
        match self {
            ParameterKind::String => "string",
            ParameterKind::Integer => "integer",
            ParameterKind::Float => "float",
            ParameterKind::Boolean => "boolean",
            ParameterKind::Array(_) => "array",
        }
    }

    /// JSON Schema `type` keyword for this kind.
    pub fn json_schema_type(&self) -> &'static str {
        match self {
            ParameterKind::Float => "number",
            other => other.type_name(),
        }
    }

    /// Human-readable type name for error messages.
    pub fn display_name(&self) -> String {
        match self {
            ParameterKind::Array(items) => format!("array<{}>", items.display_name()),
            other => other.type_name().to_string(),
        }
    }
}

fn coerce_integer(value: &Value) -> Result<ParamValue, String> {
    if let Some(i) = value.as_i64() {
        return Ok(ParamValue::Integer(i));
    }
    if value.is_u64() {
        return Err("integer out of range".to_string());
    }
    // Decoders that only know f64 hand integers over as `5.0`.
    match value.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
            Ok(ParamValue::Integer(f as i64))
        }
        Some(_) => Err("non-integer number".to_string()),
        None => Err(value_type_name(value).to_string()),
    }
}

pub(crate) fn value_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
