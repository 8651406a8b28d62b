//! Robot-mode end-to-end tests.

use std::fs;

use regex::Regex;
use serde_json::{Value, json};

use crate::common::cli::CliRunner;
use crate::common::init_test_logging;

#[test]
fn robot_quick_start_outputs_json() {
    init_test_logging();
    let cli = CliRunner::new();
    let result = cli.run(&["--robot"]);
    result.assert_success();

    let json = result.json();
    assert_eq!(json.get("tool").and_then(Value::as_str), Some("kvg-rgb"));
    assert!(json.get("discovery").is_some());
    assert!(json.get("lighting").is_some());
    assert!(json.get("output_modes").is_some());
}

#[test]
fn robot_version_outputs_json() {
    let cli = CliRunner::new();
    cli.run(&["version", "--format=json"])
        .assert_success()
        .assert_json_field("/version", &json!(env!("CARGO_PKG_VERSION")))
        .assert_json_field_exists("/git_sha");
}

#[test]
fn robot_version_reports_rustc_semver() {
    let cli = CliRunner::new();
    let result = cli.run(&["version", "--robot"]);
    result.assert_success();

    let semver = Regex::new(r"^(unknown|\d+\.\d+\.\d+\S*)$").unwrap();
    let rustc = result.json()["rustc_version"].as_str().unwrap_or_default().to_string();
    assert!(semver.is_match(&rustc), "unexpected rustc version: {rustc}");
}

#[test]
fn compact_json_is_one_line() {
    let cli = CliRunner::new();
    let result = cli.run(&["version", "--format=json-compact"]);
    result.assert_success();
    assert_eq!(result.stdout.trim().lines().count(), 1);
    assert!(result.json().get("version").is_some());
}

#[test]
fn format_env_var_selects_json() {
    let cli = CliRunner::new().with_env("KVG_FORMAT", "json");
    let result = cli.run(&["version"]);
    result.assert_success();
    assert!(result.json().get("version").is_some());
}

#[test]
fn unreachable_gateway_exits_with_code_4() {
    let cli = CliRunner::new();
    let result = cli.run_robot(&["list"]);
    result.assert_exit_code(4);
    assert!(result.stdout.trim().is_empty());

    let error = result.stderr_json();
    assert_eq!(error["error"], json!(true));
    assert_eq!(error["kind"], json!("gateway_unavailable"));
    assert_eq!(error["recoverable"], json!(true));
    assert!(error["suggestion"].is_string());
    assert!(error["message"].as_str().unwrap().contains("127.0.0.1"));
}

#[test]
fn every_gateway_command_reports_unavailable() {
    let cli = CliRunner::new();
    for args in [
        vec!["zones"],
        vec!["color", "ff0000"],
        vec!["resize", "0", "1", "40"],
        vec!["reset-modes"],
        vec!["exclude", "0"],
    ] {
        cli.run_robot(&args).assert_exit_code(4);
    }
}

#[test]
fn invalid_color_is_a_validation_error() {
    let cli = CliRunner::new();
    let result = cli.run_robot(&["color", "300", "0", "0"]);
    result.assert_exit_code(2);
    assert_eq!(result.stderr_json()["kind"], json!("validation"));

    let result = cli.run_robot(&["color", "#12345"]);
    result.assert_exit_code(2);
}

#[test]
fn invalid_flash_cycles_fail_before_connecting() {
    let cli = CliRunner::new();
    let result = cli.run_robot(&["flash", "0", "0", "--cycles", "0"]);
    result.assert_exit_code(2);
    assert_eq!(result.stderr_json()["kind"], json!("validation"));
}

#[test]
fn invalid_effect_speed_fails_before_connecting() {
    let cli = CliRunner::new();
    let result = cli.run_robot(&["rainbow", "--speed", "0", "--duration", "1"]);
    result.assert_exit_code(2);

    let result = cli.run_robot(&["breathe", "ff0000", "--duration", "0"]);
    result.assert_exit_code(2);
}

#[test]
fn store_commands_work_without_gateway() {
    let cli = CliRunner::new();
    cli.run_robot(&["recent"])
        .assert_success()
        .assert_json_field("", &json!([]));
    cli.run_robot(&["excluded"])
        .assert_success()
        .assert_json_field("", &json!([]));
}

#[test]
fn config_reflects_flags_and_defaults() {
    let cli = CliRunner::new();
    cli.run_robot(&["--port", "7000", "--host", "10.0.0.5", "config"])
        .assert_success()
        .assert_json_field("/settings/gateway/port", &json!(7000))
        .assert_json_field("/settings/gateway/host", &json!("10.0.0.5"))
        .assert_json_field("/settings/web/port", &json!(5000))
        .assert_json_field("/settings/effects/tick_ms", &json!(50));
}

#[test]
fn config_file_is_read() {
    let cli = CliRunner::new();
    let path = cli.home().join("custom.toml");
    fs::write(&path, "[web]\nport = 8123\n\n[store]\nrecent_colors_limit = 4\n").unwrap();
    let path = path.display().to_string();

    cli.run_robot(&["--config", &path, "config"])
        .assert_success()
        .assert_json_field("/settings/web/port", &json!(8123))
        .assert_json_field("/settings/store/recent_colors_limit", &json!(4))
        .assert_json_field("/path", &json!(path));
}

#[test]
fn missing_explicit_config_is_an_error() {
    let cli = CliRunner::new();
    let missing = cli.home().join("nope.toml").display().to_string();
    let result = cli.run_robot(&["--config", &missing, "config"]);
    result.assert_exit_code(1);
    assert_eq!(result.stderr_json()["kind"], json!("config_not_found"));
}

#[test]
fn bad_port_env_is_a_config_error() {
    let cli = CliRunner::new().with_env("KVG_PORT", "not-a-port");
    let result = cli.run_robot(&["list"]);
    result.assert_exit_code(1);
    assert_eq!(result.stderr_json()["kind"], json!("config_parse"));
}
