//! Human-mode end-to-end tests.

use assert_cmd::Command;
use predicates::prelude::*;

use crate::common::cli::{CliRunner, closed_port};

/// `kvg-rgb` with an isolated home, a temporary database and a closed port.
fn kvg(runner: &CliRunner) -> Command {
    let home = runner.home();
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_kvg-rgb"));
    cmd.env("RUST_LOG", "off")
        .env("NO_COLOR", "1")
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env("KVG_DB", home.join("prefs.db"))
        .env("KVG_PORT", closed_port().to_string())
        .env_remove("KVG_HOST")
        .env_remove("KVG_FORMAT")
        .env_remove("KVG_CONFIG");
    cmd
}

#[test]
fn quick_start_is_shown_without_command() {
    let runner = CliRunner::new();
    kvg(&runner)
        .assert()
        .success()
        .stdout(predicate::str::contains("QUICK START"))
        .stdout(predicate::str::contains("kvg-rgb color"));
}

#[test]
fn version_is_plain_text() {
    let runner = CliRunner::new();
    kvg(&runner)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!(
            "kvg-rgb {}",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn help_lists_commands() {
    let runner = CliRunner::new();
    kvg(&runner)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("reset-modes"))
        .stdout(predicate::str::contains("breathe"))
        .stdout(predicate::str::contains("serve"));
}

#[test]
fn unreachable_gateway_prints_error_and_hint() {
    let runner = CliRunner::new();
    kvg(&runner)
        .arg("list")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Error: OpenRGB server unavailable"))
        .stderr(predicate::str::contains("Hint:"));
}

#[test]
fn zone_requires_device_flag() {
    let runner = CliRunner::new();
    kvg(&runner)
        .args(["color", "ff0000", "--zone", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--device"));
}

#[test]
fn empty_recent_colors_message() {
    let runner = CliRunner::new();
    kvg(&runner)
        .arg("recent")
        .assert()
        .success()
        .stdout(predicate::str::contains("No recent colors"));
}

#[test]
fn config_path_points_at_kvg_rgb_dir() {
    let runner = CliRunner::new();
    kvg(&runner)
        .args(["config", "--path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kvg-rgb").and(predicate::str::contains("config.toml")));
}

#[test]
fn completions_are_generated() {
    let runner = CliRunner::new();
    kvg(&runner)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kvg-rgb"));
}
