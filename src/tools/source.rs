//! Data source seam: capability-typed resolution of named sources.
//!
//! Sources are external collaborators. The toolbox only sees them through
//! [`Source`] and the capability traits it can be narrowed to.

use crate::parameters::ParamValue;
use crate::types::{Error, ExecutionError, Result, SourceName, ToolName};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// SQL dialect spoken by a source's native connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlDialect {
    MySql,
    Postgres,
    Sqlite,
}

/// A configured data source.
pub trait Source: Debug + Send + Sync {
    /// Source type tag, e.g. `mysql`.
    fn source_type(&self) -> &str;

    /// Narrow to the relational-query capability, if supported.
    fn into_sql(self: Arc<Self>) -> Option<Arc<dyn SqlSource>> {
        None
    }
}

/// Relational-query capability.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SqlSource: Send + Sync {
    /// Dialect of the underlying connection pool.
    fn dialect(&self) -> SqlDialect;

    /// Execute `statement` with positional `args`.
    ///
    /// Implementations should abort the running query when `cancel` fires.
    async fn run_sql(
        &self,
        cancel: &CancellationToken,
        statement: &str,
        args: &[ParamValue],
    ) -> std::result::Result<Value, ExecutionError>;
}

/// Looks up configured sources by name.
pub trait SourceProvider: Debug + Send + Sync {
    fn get_source(&self, name: &SourceName) -> Option<Arc<dyn Source>>;
}

/// A capability a tool can require of its source.
pub trait Capability {
    type Handle: ?Sized;

    /// Description used in resolution errors.
    const DESCRIPTION: &'static str;

    fn narrow(source: Arc<dyn Source>) -> Option<Arc<Self::Handle>>;
}

/// SQL capability over a MySQL connection.
#[derive(Debug)]
pub struct MySqlCapability;

impl Capability for MySqlCapability {
    type Handle = dyn SqlSource;
    const DESCRIPTION: &'static str = "a MySQL relational-query source";

    fn narrow(source: Arc<dyn Source>) -> Option<Arc<dyn SqlSource>> {
        source
            .into_sql()
            .filter(|sql| sql.dialect() == SqlDialect::MySql)
    }
}

/// Resolve `source_name` and narrow it to capability `C`.
pub fn compatible_source<C: Capability>(
    provider: &dyn SourceProvider,
    source_name: &SourceName,
    tool_name: &ToolName,
    tool_type: &str,
) -> Result<Arc<C::Handle>> {
    let source = provider.get_source(source_name).ok_or_else(|| {
        Error::source_resolution(source_name.as_str(), tool_name.as_str(), "source not found")
    })?;
    let source_type = source.source_type().to_string();
    C::narrow(source).ok_or_else(|| {
        Error::source_resolution(
            source_name.as_str(),
            tool_name.as_str(),
            format!(
                "source type {:?} is not compatible with tool type {:?}: requires {}",
                source_type,
                tool_type,
                C::DESCRIPTION
            ),
        )
    })
}

/// Run a statement, returning early with [`Error::Cancelled`] once `cancel`
/// fires. Dropping the source future aborts the in-flight call.
pub async fn run_sql(
    source: &dyn SqlSource,
    cancel: &CancellationToken,
    statement: &str,
    args: &[ParamValue],
) -> Result<Value> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Error::cancelled("query cancelled by caller")),
        result = source.run_sql(cancel, statement, args) => result.map_err(Error::Execution),
    }
}

/// Sources held in memory, keyed by name.
#[derive(Debug, Default)]
pub struct StaticSourceProvider {
    sources: std::collections::HashMap<SourceName, Arc<dyn Source>>,
}

impl StaticSourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: SourceName, source: Arc<dyn Source>) {
        self.sources.insert(name, source);
    }
}

impl SourceProvider for StaticSourceProvider {
    fn get_source(&self, name: &SourceName) -> Option<Arc<dyn Source>> {
        self.sources.get(name).cloned()
    }
}
