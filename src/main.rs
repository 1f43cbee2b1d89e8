//! Toolbox CLI - manifest and config schema export.
//!
//! - `toolbox manifest --tools-file tools.yaml [--toolset ops] [--mcp]`
//! - `toolbox schema mysql-list-table-stats`

use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use std::process::ExitCode;
use toolbox_core::observability::init_tracing;
use toolbox_core::tools::{ToolCatalog, ToolRegistry, ToolsFile};
use toolbox_core::{Config, Result};

#[derive(Debug, Parser)]
#[command(name = "toolbox", version, about = "Inspect configured toolbox tools.")]
struct Cli {
    /// Log level when RUST_LOG is unset.
    #[arg(long, env = "TOOLBOX_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the manifest of every tool, or of one toolset.
    Manifest {
        /// YAML file with `tools` and `toolsets` sections.
        #[arg(long, value_name = "PATH")]
        tools_file: PathBuf,

        #[arg(long)]
        toolset: Option<String>,

        /// Emit MCP tool definitions instead of the generic manifest.
        #[arg(long)]
        mcp: bool,
    },
    /// Print the JSON Schema of a tool type's config document.
    Schema {
        #[arg(value_name = "TYPE")]
        tool_type: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = Config::default();
    config.observability.log_level = cli.log_level.clone();
    init_tracing(&config.observability);

    match run(cli.command) {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(text) => {
                println!("{text}");
                ExitCode::SUCCESS
            }
            Err(err) => report_error(&err.into()),
        },
        Err(err) => report_error(&err),
    }
}

fn run(command: Command) -> Result<Value> {
    let registry = ToolRegistry::with_builtin_tools()?;
    match command {
        Command::Manifest {
            tools_file,
            toolset,
            mcp,
        } => {
            let file = ToolsFile::from_path(&tools_file)?;
            let catalog = ToolCatalog::load(&registry, &file)?;
            tracing::info!(tools = catalog.len(), path = %tools_file.display(), "loaded tools file");
            if mcp {
                Ok(serde_json::json!({
                    "tools": catalog.mcp_manifests(toolset.as_deref())?,
                }))
            } else {
                Ok(serde_json::to_value(catalog.toolset_manifest(toolset.as_deref())?)?)
            }
        }
        Command::Schema { tool_type } => registry.config_schema(&tool_type),
    }
}

fn report_error(err: &toolbox_core::Error) -> ExitCode {
    eprintln!("error [{}]: {err}", err.code());
    ExitCode::FAILURE
}
