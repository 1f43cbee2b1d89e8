//! Manifest generation: discovery schemas derived from parameters.
//!
//! Two projections of the same [`Parameters`]: the generic [`Manifest`]
//! consumed by toolbox clients and the MCP-shaped [`McpManifest`]. Both are
//! pure functions of their inputs; tools compute them once at construction.

use crate::parameters::{Parameter, ParameterKind, Parameters};
use crate::types::AuthServiceId;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::{Map, Value};

/// `_meta` key listing the auth services an MCP client must present.
pub const MCP_AUTH_INVOKE_META: &str = "toolbox/authInvoke";

// =============================================================================
// Generic manifest
// =============================================================================

/// One parameter as seen by toolbox clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterManifest {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub required: bool,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ParameterManifest>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl From<&Parameter> for ParameterManifest {
    fn from(param: &Parameter) -> Self {
        Self {
            name: param.name().to_string(),
            kind: param.kind().type_name().to_string(),
            required: param.is_required(),
            description: param.description().to_string(),
            items: item_manifest(param.kind()),
            default: param.default().map(|d| d.to_json()),
        }
    }
}

fn item_manifest(kind: &ParameterKind) -> Option<Box<ParameterManifest>> {
    match kind {
        ParameterKind::Array(items) => Some(Box::new(ParameterManifest {
            name: String::new(),
            kind: items.type_name().to_string(),
            required: true,
            description: String::new(),
            items: item_manifest(items),
            default: None,
        })),
        _ => None,
    }
}

/// Name-agnostic discovery schema of one tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Manifest {
    pub description: String,
    pub parameters: Vec<ParameterManifest>,
    #[serde(rename = "authRequired")]
    pub auth_required: Vec<String>,
}

impl Manifest {
    pub fn new(description: &str, auth_required: &[AuthServiceId], parameters: &Parameters) -> Self {
        Self {
            description: description.to_string(),
            parameters: parameters.iter().map(ParameterManifest::from).collect(),
            auth_required: auth_required.iter().map(|a| a.to_string()).collect(),
        }
    }
}

// =============================================================================
// MCP manifest
// =============================================================================

/// JSON Schema of one MCP input property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct McpPropertySchema {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<McpPropertySchema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl McpPropertySchema {
    fn for_kind(kind: &ParameterKind, description: &str) -> Self {
        let items = match kind {
            ParameterKind::Array(inner) => Some(Box::new(Self::for_kind(inner, ""))),
            _ => None,
        };
        Self {
            kind: kind.json_schema_type().to_string(),
            description: description.to_string(),
            items,
            default: None,
        }
    }
}

/// Properties in parameter declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct McpProperties(Vec<(String, McpPropertySchema)>);

impl McpProperties {
    pub fn get(&self, name: &str) -> Option<&McpPropertySchema> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }
}

impl Serialize for McpProperties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, schema) in &self.0 {
            map.serialize_entry(name, schema)?;
        }
        map.end()
    }
}

/// MCP `inputSchema` object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct McpToolsSchema {
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: McpProperties,
    pub required: Vec<String>,
}

/// MCP `tools/list` entry of one tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct McpManifest {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: McpToolsSchema,
    #[serde(rename = "outputSchema", skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<Value>,
    #[serde(rename = "_meta", skip_serializing_if = "Map::is_empty")]
    pub meta: Map<String, Value>,
}

impl McpManifest {
    pub fn new(
        name: &str,
        description: &str,
        auth_required: &[AuthServiceId],
        parameters: &Parameters,
        output_schema: Option<Value>,
    ) -> Self {
        let properties = parameters
            .iter()
            .map(|p| {
                let mut schema = McpPropertySchema::for_kind(p.kind(), p.description());
                schema.default = p.default().map(|d| d.to_json());
                (p.name().to_string(), schema)
            })
            .collect();
        let required = parameters
            .iter()
            .filter(|p| p.is_required())
            .map(|p| p.name().to_string())
            .collect();

        let mut meta = Map::new();
        if !auth_required.is_empty() {
            meta.insert(
                MCP_AUTH_INVOKE_META.to_string(),
                auth_required.iter().map(|a| Value::from(a.as_str())).collect(),
            );
        }

        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema: McpToolsSchema {
                kind: "object".to_string(),
                properties: McpProperties(properties),
                required,
            },
            output_schema,
            meta,
        }
    }
}
