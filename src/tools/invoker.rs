//! Tool invocation pipeline.
//!
//! Lookup, authorization gate, parameter validation, embedding, then the
//! tool call under a deadline. Each request runs inside an `invoke_tool`
//! span carrying a fresh invocation id.

use super::auth::AccessToken;
use super::catalog::ToolCatalog;
use super::source::SourceProvider;
use crate::parameters::EmbeddingModels;
use crate::types::{AuthServiceId, Error, InvocationConfig, InvocationId, Result};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// One caller request against a named tool.
#[derive(Debug, Clone)]
pub struct InvocationRequest {
    pub tool: String,
    /// Raw caller parameters, a JSON object.
    pub params: Value,
    /// Auth services whose tokens the caller already verified.
    pub verified_auth_services: Vec<AuthServiceId>,
    pub access_token: AccessToken,
}

impl InvocationRequest {
    pub fn new(tool: impl Into<String>, params: Value) -> Self {
        Self {
            tool: tool.into(),
            params,
            verified_auth_services: Vec::new(),
            access_token: AccessToken::default(),
        }
    }

    pub fn with_verified_auth_services(mut self, services: Vec<AuthServiceId>) -> Self {
        self.verified_auth_services = services;
        self
    }

    pub fn with_access_token(mut self, token: AccessToken) -> Self {
        self.access_token = token;
        self
    }
}

/// Runs requests against a shared, read-only catalog.
#[derive(Debug, Clone)]
pub struct ToolInvoker {
    catalog: Arc<ToolCatalog>,
    sources: Arc<dyn SourceProvider>,
    embedding_models: EmbeddingModels,
    config: InvocationConfig,
}

impl ToolInvoker {
    pub fn new(
        catalog: Arc<ToolCatalog>,
        sources: Arc<dyn SourceProvider>,
        config: InvocationConfig,
    ) -> Self {
        Self {
            catalog,
            sources,
            embedding_models: EmbeddingModels::new(),
            config,
        }
    }

    pub fn with_embedding_models(mut self, models: EmbeddingModels) -> Self {
        self.embedding_models = models;
        self
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    /// Invoke a tool.
    ///
    /// Authorization and parameter errors are returned before any source is
    /// touched. Firing `cancel` aborts the in-flight source call; exceeding
    /// the configured timeout cancels it and returns [`Error::Timeout`].
    pub async fn invoke(
        &self,
        request: InvocationRequest,
        cancel: &CancellationToken,
    ) -> Result<Value> {
        let invocation_id = InvocationId::new();
        let span = tracing::info_span!(
            "invoke_tool",
            tool = %request.tool,
            invocation_id = %invocation_id
        );
        self.run(request, cancel).instrument(span).await
    }

    async fn run(&self, request: InvocationRequest, cancel: &CancellationToken) -> Result<Value> {
        let tool = self
            .catalog
            .get(&request.tool)
            .ok_or_else(|| Error::not_found(format!("Unknown tool: {}", request.tool)))?;

        if !tool.authorized(&request.verified_auth_services) {
            tracing::warn!("caller has no verified auth service accepted by the tool");
            return Err(Error::unauthorized(format!(
                "tool invocation not authorized: {}",
                request.tool
            )));
        }

        let sources = self.sources.as_ref();
        if tool.requires_client_authorization(sources)? && request.access_token.is_empty() {
            let header = tool.auth_token_header_name(sources)?;
            return Err(Error::unauthorized(format!(
                "missing access token in {} header",
                header
            )));
        }

        let params = tool.parameters().validate(&request.params)?;
        let params = tool.embed_params(params, &self.embedding_models).await?;

        let call_token = cancel.child_token();
        let started = Instant::now();
        let outcome = tokio::time::timeout(
            self.config.timeout,
            tool.invoke(&call_token, sources, &params, &request.access_token),
        )
        .await;

        match outcome {
            Ok(result) => {
                let elapsed_ms = started.elapsed().as_millis() as u64;
                match &result {
                    Ok(_) => tracing::debug!(elapsed_ms, "tool invocation finished"),
                    Err(err) => tracing::warn!(elapsed_ms, code = err.code(), error = %err, "tool invocation failed"),
                }
                result
            }
            Err(_) => {
                call_token.cancel();
                tracing::warn!(timeout = ?self.config.timeout, "tool invocation timed out");
                Err(Error::timeout(format!(
                    "tool {} exceeded {:?}",
                    request.tool, self.config.timeout
                )))
            }
        }
    }
}
