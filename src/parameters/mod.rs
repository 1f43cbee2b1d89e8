//! Parameter system: typed descriptors, validation, embedding.
//!
//! A tool declares its inputs as an ordered [`Parameters`] set. Untyped caller
//! input (a JSON object) is validated against the set into [`ParamValues`]
//! before any tool logic runs.

mod embed;
mod kind;
mod values;

pub use embed::{embed_params, EmbeddingModel, EmbeddingModels};
pub use kind::ParameterKind;
pub use values::{ParamValue, ParamValues};

use crate::types::{Error, Result};
use crate::validation::validate_non_empty;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;

// =============================================================================
// Parameter descriptor
// =============================================================================

/// A single parameter declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    name: String,
    kind: ParameterKind,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    default: Option<ParamValue>,
    required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    embedded_by: Option<String>,
}

impl Parameter {
    /// A required parameter with no default.
    pub fn new(
        name: impl Into<String>,
        kind: ParameterKind,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            description: description.into(),
            default: None,
            required: true,
            embedded_by: None,
        }
    }

    pub fn string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::String, description)
    }

    pub fn integer(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::Integer, description)
    }

    pub fn float(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::Float, description)
    }

    pub fn boolean(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::Boolean, description)
    }

    pub fn array(
        name: impl Into<String>,
        items: ParameterKind,
        description: impl Into<String>,
    ) -> Self {
        Self::new(name, ParameterKind::Array(Box::new(items)), description)
    }

    /// Attach a default. A parameter with a default is never required.
    pub fn with_default(mut self, default: impl Into<ParamValue>) -> Self {
        self.default = Some(default.into());
        self.required = false;
        self
    }

    /// Mark as optional without a default; absent input becomes `Null`.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Replace the validated text with a vector from the named model.
    pub fn embedded_by(mut self, model: impl Into<String>) -> Self {
        self.embedded_by = Some(model.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ParameterKind {
        &self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn default(&self) -> Option<&ParamValue> {
        self.default.as_ref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn embedding_model(&self) -> Option<&str> {
        self.embedded_by.as_deref()
    }

    /// Resolve this parameter from a raw input map.
    fn resolve(&self, raw: &Map<String, Value>) -> Result<ParamValue> {
        match raw.get(&self.name) {
            None | Some(Value::Null) => match &self.default {
                Some(default) => Ok(default.clone()),
                None if self.required => Err(Error::MissingRequiredParameter(self.name.clone())),
                None => Ok(ParamValue::Null),
            },
            Some(value) => self.kind.coerce(value).map_err(|actual| {
                Error::type_mismatch(&self.name, self.kind.display_name(), actual)
            }),
        }
    }
}

// =============================================================================
// Parameter set
// =============================================================================

/// Ordered parameter declarations of one tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Parameters(Vec<Parameter>);

impl Parameters {
    /// Build a parameter set, checking names are unique and defaults match
    /// their declared kinds.
    pub fn new(parameters: Vec<Parameter>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(parameters.len());
        for param in &parameters {
            validate_non_empty(&param.name, "parameter name")?;
            if !seen.insert(param.name.as_str()) {
                return Err(Error::validation(format!(
                    "duplicate parameter name: {}",
                    param.name
                )));
            }
            if let Some(default) = &param.default {
                if !param.kind.accepts(default) {
                    return Err(Error::validation(format!(
                        "default for parameter '{}' is {}, declared {}",
                        param.name,
                        default.type_name(),
                        param.kind.display_name()
                    )));
                }
            }
            if param.embedded_by.is_some() && param.kind != ParameterKind::String {
                return Err(Error::validation(format!(
                    "parameter '{}' is embedded but not a string",
                    param.name
                )));
            }
        }
        Ok(Self(parameters))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.0.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.0.iter().find(|p| p.name == name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Validate raw caller input into typed values.
    ///
    /// `raw` must be a JSON object (`null` counts as empty). Missing or null
    /// entries take the declared default; unknown keys are ignored.
    pub fn validate(&self, raw: &Value) -> Result<ParamValues> {
        let empty = Map::new();
        let raw_map = match raw {
            Value::Null => &empty,
            Value::Object(map) => map,
            other => {
                return Err(Error::validation(format!(
                    "parameters must be a JSON object, got {}",
                    kind::value_type_name(other)
                )))
            }
        };

        let mut values = ParamValues::with_capacity(self.0.len());
        for param in &self.0 {
            values.insert(param.name.clone(), param.resolve(raw_map)?);
        }
        Ok(values)
    }
}

// =============================================================================
// Tests
// =============================================================================
