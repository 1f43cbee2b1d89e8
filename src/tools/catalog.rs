//! Tool catalog: tools file loading, lookup, toolset manifests.
//!
//! The catalog owns every initialized tool for the process lifetime. It is
//! built once from a tools file and then shared read-only.

use super::manifest::{Manifest, McpManifest};
use super::registry::ToolRegistry;
use super::Tool;
use crate::types::{Error, Result, ToolName};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

// =============================================================================
// Tools file
// =============================================================================

/// The `tools` and `toolsets` sections of a tools file.
///
/// Other sections (sources, auth services, embedding models) belong to their
/// own collaborators and are ignored here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolsFile {
    #[serde(default)]
    pub tools: BTreeMap<String, Value>,

    #[serde(default)]
    pub toolsets: BTreeMap<String, Vec<String>>,
}

impl ToolsFile {
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(contents)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }
}

// =============================================================================
// Toolset manifest
// =============================================================================

/// Manifest of a toolset: every member tool's generic manifest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolsetManifest {
    #[serde(rename = "serverVersion")]
    pub server_version: String,
    pub tools: BTreeMap<String, Manifest>,
}

// =============================================================================
// Tool catalog
// =============================================================================

/// Initialized tools by name.
#[derive(Debug, Default)]
pub struct ToolCatalog {
    tools: HashMap<String, Arc<dyn Tool>>,
    toolsets: HashMap<String, Vec<ToolName>>,
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            toolsets: HashMap::new(),
        }
    }

    /// Decode and initialize every tool in `file`, then resolve toolsets.
    pub fn load(registry: &ToolRegistry, file: &ToolsFile) -> Result<Self> {
        let mut catalog = Self::new();

        for (key, doc) in &file.tools {
            let name = ToolName::from_string(key.clone())
                .map_err(|e| Error::config_decode(key.as_str(), e))?;
            let type_id = doc
                .get("type")
                .and_then(Value::as_str)
                .ok_or_else(|| Error::config_decode(key.as_str(), "missing string field `type`"))?;

            let config = registry.decode(type_id, &name, doc.clone())?;
            let tool = config.initialize()?;
            catalog.register(tool)?;
            tracing::info!(tool = %name, tool_type = type_id, "initialized tool");
        }

        for (toolset, members) in &file.toolsets {
            let names = members
                .iter()
                .map(|member| {
                    catalog
                        .tools
                        .get(member)
                        .map(|tool| tool.name().clone())
                        .ok_or_else(|| {
                            Error::validation(format!(
                                "toolset {} references unknown tool {}",
                                toolset, member
                            ))
                        })
                })
                .collect::<Result<Vec<_>>>()?;
            catalog.toolsets.insert(toolset.clone(), names);
        }

        Ok(catalog)
    }

    /// Add an initialized tool. Tool names are unique per catalog.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        let name = tool.name().as_str().to_string();
        if self.tools.contains_key(&name) {
            return Err(Error::validation(format!("duplicate tool name: {}", name)));
        }
        self.tools.insert(name, tool);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// All tool names, sorted.
    pub fn list_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Manifest of one toolset, or of every tool when `toolset` is `None`.
    pub fn toolset_manifest(&self, toolset: Option<&str>) -> Result<ToolsetManifest> {
        let tools = self
            .members(toolset)?
            .into_iter()
            .map(|tool| (tool.name().to_string(), tool.manifest().clone()))
            .collect();
        Ok(ToolsetManifest {
            server_version: env!("CARGO_PKG_VERSION").to_string(),
            tools,
        })
    }

    /// MCP manifests of a toolset's tools, sorted by name.
    pub fn mcp_manifests(&self, toolset: Option<&str>) -> Result<Vec<McpManifest>> {
        Ok(self
            .members(toolset)?
            .into_iter()
            .map(|tool| tool.mcp_manifest().clone())
            .collect())
    }

    fn members(&self, toolset: Option<&str>) -> Result<Vec<&Arc<dyn Tool>>> {
        let mut members: Vec<&Arc<dyn Tool>> = match toolset {
            None => self.tools.values().collect(),
            Some(name) => self
                .toolsets
                .get(name)
                .ok_or_else(|| Error::not_found(format!("Unknown toolset: {}", name)))?
                .iter()
                .filter_map(|tool| self.tools.get(tool.as_str()))
                .collect(),
        };
        members.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(members)
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const TOOLS_YAML: &str = r#"
sources:
  my-mysql:
    kind: mysql
    host: 127.0.0.1
tools:
  table_stats:
    type: mysql-list-table-stats
    source: my-mysql
    description: Lists table statistics
  secured_stats:
    type: mysql-list-table-stats
    source: my-mysql
    description: Lists table statistics behind auth
    authRequired:
      - my-google-auth
toolsets:
  ops:
    - table_stats
"#;

    fn catalog() -> ToolCatalog {
        let registry = ToolRegistry::with_builtin_tools().unwrap();
        let file = ToolsFile::from_yaml_str(TOOLS_YAML).unwrap();
        ToolCatalog::load(&registry, &file).unwrap()
    }

    #[test]
    fn test_load_tools_file() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.has_tool("table_stats"));
        assert_eq!(catalog.list_names(), vec!["secured_stats", "table_stats"]);
        assert!(!catalog.get("secured_stats").unwrap().authorized(&[]));
    }

    #[test]
    fn test_toolset_manifest() {
        let catalog = catalog();
        let all = catalog.toolset_manifest(None).unwrap();
        assert_eq!(all.tools.len(), 2);
        assert_eq!(all.server_version, env!("CARGO_PKG_VERSION"));

        let ops = catalog.toolset_manifest(Some("ops")).unwrap();
        assert_eq!(ops.tools.keys().collect::<Vec<_>>(), vec!["table_stats"]);
        assert!(matches!(
            catalog.toolset_manifest(Some("missing")),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_mcp_manifests_sorted() {
        let names: Vec<String> = catalog()
            .mcp_manifests(None)
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["secured_stats", "table_stats"]);
    }

    #[test]
    fn test_unknown_tool_type_fails() {
        let registry = ToolRegistry::with_builtin_tools().unwrap();
        let file = ToolsFile::from_yaml_str(
            "tools:\n  t:\n    type: nope\n    source: s\n    description: d\n",
        )
        .unwrap();
        assert!(matches!(
            ToolCatalog::load(&registry, &file),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_bare_auth_required_key_loads() {
        let registry = ToolRegistry::with_builtin_tools().unwrap();
        let file = ToolsFile::from_yaml_str(
            "tools:\n  t:\n    type: mysql-list-table-stats\n    source: s\n    description: d\n    authRequired:\n",
        )
        .unwrap();
        let catalog = ToolCatalog::load(&registry, &file).unwrap();
        assert!(catalog.get("t").unwrap().authorized(&[]));
    }

    #[test]
    fn test_missing_type_fails() {
        let registry = ToolRegistry::with_builtin_tools().unwrap();
        let file =
            ToolsFile::from_yaml_str("tools:\n  t:\n    source: s\n    description: d\n").unwrap();
        assert!(matches!(
            ToolCatalog::load(&registry, &file),
            Err(Error::ConfigDecode { .. })
        ));
    }

    #[test]
    fn test_toolset_with_unknown_member_fails() {
        let registry = ToolRegistry::with_builtin_tools().unwrap();
        let file = ToolsFile::from_yaml_str("toolsets:\n  ops:\n    - ghost\n").unwrap();
        let err = ToolCatalog::load(&registry, &file).unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn test_register_duplicate_name_fails() {
        let mut catalog = catalog();
        let tool = catalog.get("table_stats").unwrap().clone();
        assert!(catalog.register(tool).is_err());
    }

    #[test]
    fn test_from_path() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TOOLS_YAML.as_bytes()).unwrap();

        let tools_file = ToolsFile::from_path(file.path()).unwrap();
        assert_eq!(tools_file.tools.len(), 2);
        assert_eq!(tools_file.toolsets["ops"], vec!["table_stats"]);

        let missing = file.path().with_extension("missing");
        assert!(matches!(ToolsFile::from_path(missing), Err(Error::Io(_))));
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(
            ToolsFile::from_yaml_str("tools: [unclosed"),
            Err(Error::Yaml(_))
        ));
    }
}
