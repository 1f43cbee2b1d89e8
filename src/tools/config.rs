//! Tool configuration documents: schema-driven decode into typed config.
//!
//! A raw document is checked against the JSON Schema generated from
//! [`SourceToolConfig`] before serde decoding, so missing fields, wrong types
//! and unknown keys are all reported as [`Error::ConfigDecode`].

use crate::types::{AuthServiceId, Error, Result, SourceName, ToolName};
use crate::validation::validate_non_empty;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Configuration of a tool backed by a named data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct SourceToolConfig {
    /// Tool name, unique per server.
    pub name: ToolName,

    /// Tool type used for registry lookup.
    #[serde(rename = "type")]
    pub kind: String,

    /// Name of a pre-configured data source.
    pub source: SourceName,

    /// Description surfaced to agents.
    pub description: String,

    /// Auth services of which the caller must hold at least one.
    #[serde(default)]
    pub auth_required: Vec<AuthServiceId>,
}

impl SourceToolConfig {
    /// JSON Schema of the configuration document.
    pub fn json_schema() -> Result<Value> {
        Ok(serde_json::to_value(schemars::schema_for!(SourceToolConfig))?)
    }

    /// Decode a raw document for a tool of type `expected_type`.
    ///
    /// `name` is the key the document was declared under; a document without
    /// a `name` field inherits it.
    pub fn decode(expected_type: &str, name: &ToolName, doc: Value) -> Result<Self> {
        let Value::Object(mut fields) = doc else {
            return Err(Error::config_decode(name.as_str(), "document must be a mapping"));
        };
        match fields.get("name") {
            None => {
                fields.insert("name".to_string(), Value::from(name.as_str()));
            }
            Some(Value::String(declared)) if declared != name.as_str() => {
                return Err(Error::config_decode(
                    name.as_str(),
                    format!("name {:?} does not match declared key", declared),
                ));
            }
            Some(_) => {}
        }
        // A bare `authRequired:` key means no requirement.
        if fields.get("authRequired").is_some_and(Value::is_null) {
            fields.remove("authRequired");
        }
        let doc = Value::Object(fields);

        let schema = Self::json_schema()?;
        let validator = jsonschema::validator_for(&schema)
            .map_err(|e| Error::config_decode(name.as_str(), e.to_string()))?;
        let violations: Vec<String> = validator.iter_errors(&doc).map(|e| e.to_string()).collect();
        if !violations.is_empty() {
            return Err(Error::config_decode(name.as_str(), violations.join("; ")));
        }

        let config: Self = serde_json::from_value(doc)
            .map_err(|e| Error::config_decode(name.as_str(), e.to_string()))?;
        config
            .check(expected_type)
            .map_err(|e| Error::config_decode(name.as_str(), e.to_string()))?;
        Ok(config)
    }

    fn check(&self, expected_type: &str) -> Result<()> {
        validate_non_empty(self.name.as_str(), "name")?;
        validate_non_empty(self.source.as_str(), "source")?;
        validate_non_empty(&self.description, "description")?;
        for service in &self.auth_required {
            validate_non_empty(service.as_str(), "authRequired entry")?;
        }
        if self.kind != expected_type {
            return Err(Error::validation(format!(
                "type {:?} does not match tool type {:?}",
                self.kind, expected_type
            )));
        }
        Ok(())
    }
}
