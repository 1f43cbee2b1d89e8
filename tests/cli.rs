//! CLI integration tests: run the `toolbox` binary end to end.
#![cfg(feature = "cli")]

use std::process::Command;

fn toolbox(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_toolbox"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_schema_prints_config_schema() {
    let output = toolbox(&["schema", "mysql-list-table-stats"]);
    assert!(output.status.success());

    let schema: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(schema["properties"].get("source").is_some());
}

#[test]
fn test_unknown_tool_type_reports_error_code() {
    let output = toolbox(&["schema", "no-such-type"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error [NOT_FOUND]"), "{stderr}");
    assert!(stderr.contains("no-such-type"), "{stderr}");
}
