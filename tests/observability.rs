//! Tracing initialization installs a process-global subscriber, so it runs in
//! its own test binary.

use toolbox_core::observability::init_tracing;
use toolbox_core::types::ObservabilityConfig;

#[test]
fn test_init_tracing_is_idempotent() {
    let config = ObservabilityConfig::default();
    init_tracing(&config);
    init_tracing(&config);
    tracing::info!("subscriber installed once");
}

#[test]
fn test_init_tracing_accepts_json_config() {
    let config = ObservabilityConfig {
        log_level: "debug".to_string(),
        json_logs: true,
    };
    init_tracing(&config);
}
