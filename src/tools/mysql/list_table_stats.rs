//! `mysql-list-table-stats`: size, row count and I/O latency per table.
//!
//! Joins `information_schema.tables` with `sys.x$schema_table_statistics`,
//! skipping the MySQL system schemas. Callers may filter by schema and table
//! name, pick a sort column from a fixed set and cap the row count.

use crate::parameters::{self, EmbeddingModels, ParamValue, ParamValues, Parameter, Parameters};
use crate::tools::auth::{is_authorized, AccessToken, DEFAULT_AUTH_TOKEN_HEADER};
use crate::tools::config::SourceToolConfig;
use crate::tools::manifest::{Manifest, McpManifest};
use crate::tools::query::{placeholder_count, EqualityFilter, SortKey, SortKeys};
use crate::tools::registry::ToolFactory;
use crate::tools::source::{compatible_source, run_sql, MySqlCapability, SourceProvider};
use crate::tools::{Tool, ToolConfig};
use crate::types::{AuthServiceId, Result, ToolName};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub const TOOL_TYPE: &str = "mysql-list-table-stats";

const SELECT_STATS: &str = "SELECT
  t.table_schema AS 'table_schema',
  t.table_name AS 'table_name',
  ROUND((t.data_length + t.index_length)/1024/1024,2) AS 'size_MB',
  t.TABLE_ROWS AS 'row_count',
  ROUND(ts.total_latency / 1000000000000, 2) AS 'total_latency_secs',
  ts.rows_fetched AS 'rows_fetched',
  ts.rows_inserted AS 'rows_inserted',
  ts.rows_updated AS 'rows_updated',
  ts.rows_deleted AS 'rows_deleted',
  ts.io_read_requests AS 'io_reads',
  ROUND(ts.io_read_latency / 1000000000000, 2) AS 'io_read_latency',
  ts.io_write_requests AS 'IO Writes',
  ROUND(ts.io_write_latency / 1000000000000, 2) AS 'io_write_latency',
  ts.io_misc_requests AS 'IO Misc',
  ROUND(ts.io_misc_latency / 1000000000000, 2) AS 'io_misc_latency'
FROM
  information_schema.tables AS t
  INNER JOIN
  sys.x$schema_table_statistics AS ts
  ON (t.table_schema = ts.table_schema AND t.table_name = ts.table_name)
WHERE
  t.table_schema NOT IN ('sys', 'information_schema', 'mysql', 'performance_schema')";

const SORT_KEYS: &[SortKey] = &[
    SortKey {
        key: "row_count",
        column: "row_count",
    },
    SortKey {
        key: "rows_fetched",
        column: "rows_fetched",
    },
    SortKey {
        key: "rows_inserted",
        column: "rows_inserted",
    },
    SortKey {
        key: "rows_updated",
        column: "rows_updated",
    },
    SortKey {
        key: "rows_deleted",
        column: "rows_deleted",
    },
];

const DEFAULT_SORT_COLUMN: &str = "total_latency_secs";
const DEFAULT_LIMIT: i64 = 10;

/// Registry entry for this tool type.
pub fn factory() -> ToolFactory {
    ToolFactory {
        decode: decode_config,
        config_schema: SourceToolConfig::json_schema,
    }
}

fn decode_config(name: &ToolName, doc: Value) -> Result<Box<dyn ToolConfig>> {
    let config = SourceToolConfig::decode(TOOL_TYPE, name, doc)?;
    Ok(Box::new(ListTableStatsConfig(config)))
}

fn parameters() -> Result<Parameters> {
    Parameters::new(vec![
        Parameter::string(
            "table_schema",
            "(Optional) The database where statistics is to be executed. Check all tables visible to the current user if not specified",
        )
        .with_default(""),
        Parameter::string(
            "table_name",
            "(Optional) Name of the table to be checked. Check all tables visible to the current user if not specified.",
        )
        .with_default(""),
        Parameter::string("sort_by", "(Optional) The column to sort by").with_default(""),
        Parameter::integer("limit", "(Optional) Max rows to return, default is 10")
            .with_default(ParamValue::Integer(DEFAULT_LIMIT)),
    ])
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListTableStatsConfig(pub SourceToolConfig);

impl ToolConfig for ListTableStatsConfig {
    fn tool_config_type(&self) -> &'static str {
        TOOL_TYPE
    }

    fn name(&self) -> &ToolName {
        &self.0.name
    }

    fn initialize(&self) -> Result<Arc<dyn Tool>> {
        Ok(Arc::new(ListTableStatsTool::new(self.clone())?))
    }
}

#[derive(Debug)]
pub struct ListTableStatsTool {
    config: ListTableStatsConfig,
    parameters: Parameters,
    manifest: Manifest,
    mcp_manifest: McpManifest,
    schema_filter: EqualityFilter,
    name_filter: EqualityFilter,
    sort: SortKeys,
    statement: String,
}

impl ListTableStatsTool {
    pub fn new(config: ListTableStatsConfig) -> Result<Self> {
        let parameters = parameters()?;
        let cfg = &config.0;
        let manifest = Manifest::new(&cfg.description, &cfg.auth_required, &parameters);
        let mcp_manifest = McpManifest::new(
            cfg.name.as_str(),
            &cfg.description,
            &cfg.auth_required,
            &parameters,
            None,
        );

        let schema_filter = EqualityFilter::new("t.table_schema")?;
        let name_filter = EqualityFilter::new("t.table_name")?;
        let sort = SortKeys::new(SORT_KEYS, DEFAULT_SORT_COLUMN)?;
        let statement = format!(
            "{}\n  AND {}\n  AND {}\nORDER BY\n  {} DESC\nLIMIT ?;",
            SELECT_STATS,
            schema_filter.clause(),
            name_filter.clause(),
            sort.case_expression(),
        );

        Ok(Self {
            config,
            parameters,
            manifest,
            mcp_manifest,
            schema_filter,
            name_filter,
            sort,
            statement,
        })
    }

    /// Statement text, fixed at construction.
    pub fn statement(&self) -> &str {
        &self.statement
    }

    pub fn sort_keys(&self) -> &SortKeys {
        &self.sort
    }

    /// Positional arguments for [`statement`](Self::statement):
    /// schema twice, table name twice, sort key once per branch, limit.
    pub fn bind_args(&self, params: &ParamValues) -> Result<Vec<ParamValue>> {
        let table_schema = params.string("table_schema")?;
        let table_name = params.string("table_name")?;
        let sort_by = params.string("sort_by")?;
        let limit = params.integer("limit")?;

        let mut args = Vec::with_capacity(placeholder_count(&self.statement));
        self.schema_filter.bind(table_schema, &mut args);
        self.name_filter.bind(table_name, &mut args);
        self.sort.bind(sort_by, &mut args);
        args.push(ParamValue::Integer(limit));
        Ok(args)
    }
}

#[async_trait]
impl Tool for ListTableStatsTool {
    fn name(&self) -> &ToolName {
        &self.config.0.name
    }

    async fn invoke(
        &self,
        cancel: &CancellationToken,
        sources: &dyn SourceProvider,
        params: &ParamValues,
        _access_token: &AccessToken,
    ) -> Result<Value> {
        let args = self.bind_args(params)?;
        let source = compatible_source::<MySqlCapability>(
            sources,
            &self.config.0.source,
            &self.config.0.name,
            TOOL_TYPE,
        )?;

        tracing::debug!(
            tool = %self.config.0.name,
            "executing `{}` tool query: {}",
            TOOL_TYPE,
            self.statement
        );
        run_sql(source.as_ref(), cancel, &self.statement, &args).await
    }

    async fn embed_params(
        &self,
        params: ParamValues,
        models: &EmbeddingModels,
    ) -> Result<ParamValues> {
        parameters::embed_params(&self.parameters, params, models).await
    }

    fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    fn mcp_manifest(&self) -> &McpManifest {
        &self.mcp_manifest
    }

    fn authorized(&self, verified_auth_services: &[AuthServiceId]) -> bool {
        is_authorized(&self.config.0.auth_required, verified_auth_services)
    }

    fn requires_client_authorization(&self, _sources: &dyn SourceProvider) -> Result<bool> {
        Ok(false)
    }

    fn auth_token_header_name(&self, _sources: &dyn SourceProvider) -> Result<String> {
        Ok(DEFAULT_AUTH_TOKEN_HEADER.to_string())
    }

    fn to_config(&self) -> Box<dyn ToolConfig> {
        Box::new(self.config.clone())
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::source::{MockSqlSource, Source, SqlDialect, SqlSource, StaticSourceProvider};
    use crate::types::{Error, SourceName};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tracing_test::traced_test;

    #[derive(Debug)]
    struct MockMySql(Arc<MockSqlSource>);

    impl Source for MockMySql {
        fn source_type(&self) -> &str {
            "mysql"
        }

        fn into_sql(self: Arc<Self>) -> Option<Arc<dyn SqlSource>> {
            Some(self.0.clone())
        }
    }

    fn config(auth_required: &[&str]) -> ListTableStatsConfig {
        let doc = json!({
            "type": TOOL_TYPE,
            "source": "my-mysql",
            "description": "Lists table statistics",
            "authRequired": auth_required,
        });
        let name = ToolName::from_string("table_stats".to_string()).unwrap();
        ListTableStatsConfig(SourceToolConfig::decode(TOOL_TYPE, &name, doc).unwrap())
    }

    fn tool() -> ListTableStatsTool {
        ListTableStatsTool::new(config(&[])).unwrap()
    }

    fn provider(mock: MockSqlSource) -> StaticSourceProvider {
        let mut provider = StaticSourceProvider::new();
        provider.insert(
            SourceName::from_string("my-mysql".to_string()).unwrap(),
            Arc::new(MockMySql(Arc::new(mock))),
        );
        provider
    }

    fn ids(names: &[&str]) -> Vec<AuthServiceId> {
        names
            .iter()
            .map(|n| AuthServiceId::from_string(n.to_string()).unwrap())
            .collect()
    }

    #[test]
    fn test_bind_args_order() {
        let tool = tool();
        let params = tool
            .parameters()
            .validate(&json!({"sort_by": "row_count", "limit": 5}))
            .unwrap();

        let args = tool.bind_args(&params).unwrap();
        let mut expected = vec![ParamValue::from(""); 4];
        expected.extend(std::iter::repeat(ParamValue::from("row_count")).take(5));
        expected.push(ParamValue::Integer(5));
        assert_eq!(args, expected);
        assert_eq!(placeholder_count(tool.statement()), args.len());
    }

    #[test]
    fn test_statement_is_fixed() {
        let tool = tool();
        assert!(tool
            .statement()
            .contains("AND (COALESCE(?, '') = '' OR t.table_schema = ?)"));
        assert!(tool
            .statement()
            .contains("AND (COALESCE(?, '') = '' OR t.table_name = ?)"));
        assert!(tool.statement().contains("WHEN ? = 'rows_deleted' THEN rows_deleted"));
        assert!(tool.statement().contains("ELSE total_latency_secs\n  END DESC\nLIMIT ?;"));

        let params = tool
            .parameters()
            .validate(&json!({"table_name": "x' OR 1=1 --", "sort_by": "1; DROP"}))
            .unwrap();
        tool.bind_args(&params).unwrap();
        assert_eq!(tool.statement(), self::tool().statement());
    }

    #[test]
    fn test_unknown_sort_key_uses_default_ordering() {
        let tool = tool();
        assert_eq!(tool.sort_keys().resolve("bogus"), DEFAULT_SORT_COLUMN);
        assert_eq!(tool.sort_keys().resolve(""), DEFAULT_SORT_COLUMN);
        assert_eq!(tool.sort_keys().resolve("rows_updated"), "rows_updated");
    }

    #[test]
    fn test_manifest_defaults() {
        let tool = tool();
        let manifest = serde_json::to_value(tool.manifest()).unwrap();
        let names: Vec<&str> = manifest["parameters"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["table_schema", "table_name", "sort_by", "limit"]);
        assert_eq!(manifest["parameters"][3]["default"], json!(10));
        assert_eq!(tool.mcp_manifest().name, "table_stats");
        assert!(tool.mcp_manifest().input_schema.required.is_empty());
    }

    #[test]
    fn test_authorization() {
        let tool = ListTableStatsTool::new(config(&["oauth"])).unwrap();
        assert!(!tool.authorized(&[]));
        assert!(tool.authorized(&ids(&["oauth"])));
        assert!(!tool.authorized(&ids(&["other"])));

        let provider = StaticSourceProvider::new();
        assert!(!tool.requires_client_authorization(&provider).unwrap());
        assert_eq!(tool.auth_token_header_name(&provider).unwrap(), "Authorization");
    }

    #[test]
    fn test_to_config_round_trips() {
        let tool = tool();
        let config = tool.to_config();
        assert_eq!(config.tool_config_type(), TOOL_TYPE);
        assert_eq!(config.name().as_str(), "table_stats");
        let rebuilt = config.initialize().unwrap();
        assert_eq!(rebuilt.manifest(), tool.manifest());
    }

    #[tokio::test]
    #[traced_test]
    async fn test_invoke_passes_result_through() {
        let tool = tool();
        let expected_statement = tool.statement().to_string();

        let mut mock = MockSqlSource::new();
        mock.expect_dialect().return_const(SqlDialect::MySql);
        mock.expect_run_sql()
            .withf(move |_, statement, args| {
                statement.to_string() == expected_statement
                    && args.len() == 10
                    && args[0] == ParamValue::from("shop")
                    && args[9] == ParamValue::Integer(10)
            })
            .times(1)
            .returning(|_, _, _| Ok(json!([{"table_name": "orders", "row_count": 42}])));

        let params = tool
            .parameters()
            .validate(&json!({"table_schema": "shop"}))
            .unwrap();
        let result = tool
            .invoke(
                &CancellationToken::new(),
                &provider(mock),
                &params,
                &AccessToken::default(),
            )
            .await
            .unwrap();

        assert_eq!(result, json!([{"table_name": "orders", "row_count": 42}]));
        assert!(logs_contain("executing `mysql-list-table-stats` tool query"));
    }

    #[tokio::test]
    async fn test_invoke_propagates_source_error_verbatim() {
        let tool = tool();
        let mut mock = MockSqlSource::new();
        mock.expect_dialect().return_const(SqlDialect::MySql);
        mock.expect_run_sql()
            .returning(|_, _, _| Err("Access denied for user 'app'".into()));

        let params = tool.parameters().validate(&json!({})).unwrap();
        let err = tool
            .invoke(
                &CancellationToken::new(),
                &provider(mock),
                &params,
                &AccessToken::default(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Execution(_)));
        assert_eq!(err.to_string(), "Access denied for user 'app'");
    }

    #[tokio::test]
    async fn test_invoke_rejects_mistyped_values_before_source_call() {
        let tool = tool();
        let mut mock = MockSqlSource::new();
        mock.expect_dialect().return_const(SqlDialect::MySql);
        mock.expect_run_sql().times(0);

        let mut params = tool.parameters().validate(&json!({})).unwrap();
        params.insert("limit", ParamValue::from("ten"));
        let err = tool
            .invoke(
                &CancellationToken::new(),
                &provider(mock),
                &params,
                &AccessToken::default(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ParameterTypeMismatch { ref name, .. } if name == "limit"));
    }

    #[tokio::test]
    async fn test_invoke_with_unknown_source() {
        let tool = tool();
        let params = tool.parameters().validate(&json!({})).unwrap();
        let err = tool
            .invoke(
                &CancellationToken::new(),
                &StaticSourceProvider::new(),
                &params,
                &AccessToken::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SourceResolution { .. }));
    }

    #[tokio::test]
    async fn test_embed_params_is_noop() {
        let tool = tool();
        let params = tool.parameters().validate(&json!({"limit": 3})).unwrap();
        let out = tool
            .embed_params(params.clone(), &EmbeddingModels::new())
            .await
            .unwrap();
        assert_eq!(out, params);
    }
}
