//! Tool registry: type id to config factory.
//!
//! Built once during startup and then shared read-only; registration needs
//! `&mut self`, so nothing can register after the registry is shared.

use super::{mysql, ToolConfig};
use crate::types::{Error, Result, ToolName};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Decodes a raw document declared under `name` into a typed config.
pub type DecodeFn = fn(&ToolName, Value) -> Result<Box<dyn ToolConfig>>;

/// Factory registered for one tool type.
#[derive(Clone, Copy)]
pub struct ToolFactory {
    pub decode: DecodeFn,
    /// JSON Schema of the configuration document.
    pub config_schema: fn() -> Result<Value>,
}

impl fmt::Debug for ToolFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolFactory").finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct ToolRegistry {
    factories: HashMap<String, ToolFactory>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registry with every tool type shipped in this crate.
    pub fn with_builtin_tools() -> Result<Self> {
        let mut registry = Self::new();
        registry.register_or_fail(
            mysql::list_table_stats::TOOL_TYPE,
            mysql::list_table_stats::factory(),
        )?;
        Ok(registry)
    }

    /// Register a factory. Returns false, keeping the existing factory, if
    /// `type_id` is already taken.
    pub fn register(&mut self, type_id: &str, factory: ToolFactory) -> bool {
        if self.factories.contains_key(type_id) {
            return false;
        }
        self.factories.insert(type_id.to_string(), factory);
        true
    }

    /// Like [`register`](Self::register), but a duplicate is an error.
    pub fn register_or_fail(&mut self, type_id: &str, factory: ToolFactory) -> Result<()> {
        if !self.register(type_id, factory) {
            return Err(Error::RegistrationConflict(type_id.to_string()));
        }
        tracing::debug!(tool_type = type_id, "registered tool type");
        Ok(())
    }

    /// Decode `doc` with the factory registered for `type_id`.
    pub fn decode(&self, type_id: &str, name: &ToolName, doc: Value) -> Result<Box<dyn ToolConfig>> {
        let factory = self
            .factories
            .get(type_id)
            .ok_or_else(|| Error::not_found(format!("Unknown tool type: {}", type_id)))?;
        (factory.decode)(name, doc)
    }

    /// JSON Schema of the config document for `type_id`.
    pub fn config_schema(&self, type_id: &str) -> Result<Value> {
        let factory = self
            .factories
            .get(type_id)
            .ok_or_else(|| Error::not_found(format!("Unknown tool type: {}", type_id)))?;
        (factory.config_schema)()
    }

    pub fn contains(&self, type_id: &str) -> bool {
        self.factories.contains_key(type_id)
    }

    /// All registered type ids, sorted.
    pub fn type_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.factories.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
