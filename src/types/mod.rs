//! Core types for the toolbox.
//!
//! This module provides foundational types used throughout the system:
//! - **IDs**: Strongly-typed identifiers (ToolName, SourceName, etc.)
//! - **Errors**: Application error types with thiserror derives
//! - **Config**: Server configuration (observability, invocation limits)

mod config;
mod errors;
mod ids;

pub use config::{Config, InvocationConfig, ObservabilityConfig};
pub use errors::{Error, ExecutionError, Result};
pub use ids::{AuthServiceId, InvocationId, SourceName, ToolName};
