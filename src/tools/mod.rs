//! Tool infrastructure: registry, config, manifests, authorization, invocation.
//!
//! A tool type registers a factory under its type id. At startup every
//! configured document is decoded into a [`ToolConfig`] and initialized into
//! an immutable [`Tool`] shared across concurrent invocations.

pub mod auth;
pub mod catalog;
pub mod config;
pub mod invoker;
pub mod manifest;
pub mod mysql;
pub mod query;
pub mod registry;
pub mod source;

pub use auth::{is_authorized, AccessToken};
pub use catalog::{ToolCatalog, ToolsFile, ToolsetManifest};
pub use config::SourceToolConfig;
pub use invoker::{InvocationRequest, ToolInvoker};
pub use manifest::{Manifest, McpManifest};
pub use registry::{ToolFactory, ToolRegistry};
pub use source::{Source, SourceProvider, SqlDialect, SqlSource, StaticSourceProvider};

use crate::parameters::{EmbeddingModels, ParamValues, Parameters};
use crate::types::{AuthServiceId, Result, ToolName};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Decoded, immutable configuration of one tool instance.
pub trait ToolConfig: Debug + Send + Sync {
    /// Registry type id this config was decoded for.
    fn tool_config_type(&self) -> &'static str;

    fn name(&self) -> &ToolName;

    /// Build the tool: parameters, manifests and statement are fixed here.
    fn initialize(&self) -> Result<Arc<dyn Tool>>;
}

/// Uniform invocation contract shared by every tool type.
#[async_trait]
pub trait Tool: Debug + Send + Sync {
    fn name(&self) -> &ToolName;

    /// Execute with already-validated parameters.
    ///
    /// The source is resolved by name on every call. `cancel` is propagated
    /// into the source so a cancelled caller aborts the running operation.
    async fn invoke(
        &self,
        cancel: &CancellationToken,
        sources: &dyn SourceProvider,
        params: &ParamValues,
        access_token: &AccessToken,
    ) -> Result<Value>;

    /// Post-validation hook replacing embedding-eligible values with vectors.
    async fn embed_params(
        &self,
        params: ParamValues,
        models: &EmbeddingModels,
    ) -> Result<ParamValues>;

    fn manifest(&self) -> &Manifest;

    fn mcp_manifest(&self) -> &McpManifest;

    /// True iff no auth is required or a verified service satisfies it.
    fn authorized(&self, verified_auth_services: &[AuthServiceId]) -> bool;

    /// Whether the caller must run an interactive client-side auth flow.
    fn requires_client_authorization(&self, sources: &dyn SourceProvider) -> Result<bool>;

    /// Header carrying the client's token when client authorization applies.
    fn auth_token_header_name(&self, sources: &dyn SourceProvider) -> Result<String>;

    fn to_config(&self) -> Box<dyn ToolConfig>;

    fn parameters(&self) -> &Parameters;
}
