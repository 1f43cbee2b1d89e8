//! Configuration structures.
//!
//! Server-level configuration. Per-tool configuration lives in
//! [`crate::tools::config`].

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Global toolbox configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Tool invocation configuration.
    #[serde(default)]
    pub invocation: InvocationConfig,
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Tracing log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

/// Tool invocation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationConfig {
    /// Upper bound on a single tool call, including the source round-trip.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for InvocationConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}
