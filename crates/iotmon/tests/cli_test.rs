//! Integration tests for the `iotmon` CLI binary.
//!
//! Argument parsing, help output and completions run without a backend;
//! the device commands run against a wiremock server.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `iotmon` binary with env isolation.
///
/// Clears all `IOTMON_*` env vars and points config directories at `home`
/// so tests never touch the user's real configuration.
fn iotmon_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("iotmon");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("IOTMON_API_URL")
        .env_remove("IOTMON_OUTPUT")
        .env_remove("IOTMON_COLOR")
        .env_remove("IOTMON_INSECURE")
        .env_remove("IOTMON_TIMEOUT")
        .env_remove("IOTMON_REFRESH_INTERVAL")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

fn reading(id: &str, minute: u32, temperature: f64) -> serde_json::Value {
    json!({
        "deviceId": id,
        "deviceName": format!("{id} room"),
        "temperature": temperature,
        "humidity": 45.0,
        "timestamp": format!("2024-06-15T10:{minute:02}:00Z")
    })
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = iotmon_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_flag() {
    let home = tempfile::tempdir().unwrap();
    iotmon_cmd(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("devices")
                .and(predicate::str::contains("watch"))
                .and(predicate::str::contains("config")),
        );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    iotmon_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("iotmon"));
}

#[test]
fn test_completions_zsh() {
    let home = tempfile::tempdir().unwrap();
    iotmon_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_invalid_output_format() {
    let home = tempfile::tempdir().unwrap();
    let output = iotmon_cmd(home.path())
        .args(["--output", "invalid", "devices", "latest"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_add_requires_device() {
    let home = tempfile::tempdir().unwrap();
    let output = iotmon_cmd(home.path())
        .args(["devices", "add", "-t", "20", "-H", "50"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_defaults() {
    let home = tempfile::tempdir().unwrap();
    iotmon_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://localhost:5001"));
}

#[test]
fn test_config_set_then_get() {
    let home = tempfile::tempdir().unwrap();
    iotmon_cmd(home.path())
        .args(["config", "set", "refresh_interval", "15"])
        .assert()
        .success();

    iotmon_cmd(home.path())
        .args(["config", "get", "refresh_interval"])
        .assert()
        .success()
        .stdout(predicate::str::diff("15\n"));
}

#[test]
fn test_config_set_rejects_zero_interval() {
    let home = tempfile::tempdir().unwrap();
    let output = iotmon_cmd(home.path())
        .args(["config", "set", "refresh_interval", "0"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("refresh_interval"));
}

#[test]
fn test_env_overrides_config_get() {
    let home = tempfile::tempdir().unwrap();
    iotmon_cmd(home.path())
        .env("IOTMON_API_URL", "http://sensors.local:5001")
        .args(["config", "get", "api_url"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://sensors.local:5001"));
}

// ── Devices against a mock backend ──────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_devices_latest_plain() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/devices/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            reading("DEV1", 2, 21.0),
            reading("DEV2", 1, 19.5),
        ])))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let mut cmd = iotmon_cmd(home.path());
    cmd.args(["--api-url", &server.uri(), "-o", "plain", "devices", "latest"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "DEV1\nDEV2\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_devices_history_json_filters_device() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/devices/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            reading("DEV1", 3, 21.0),
            reading("DEV2", 2, 19.5),
            reading("DEV1", 1, 20.0),
        ])))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let mut cmd = iotmon_cmd(home.path());
    cmd.env("IOTMON_API_URL", server.uri())
        .args(["-o", "json", "devices", "history", "--device", "DEV1"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let ids: Vec<&str> = parsed
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["device_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["DEV1", "DEV1"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_devices_show_summary() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/devices/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            reading("DEV1", 3, 21.5),
            reading("DEV1", 1, 20.0),
        ])))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let mut cmd = iotmon_cmd(home.path());
    cmd.args(["--api-url", &server.uri(), "-o", "json", "devices", "show"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["summary"]["device_id"], "DEV1");
    assert_eq!(parsed["summary"]["temperature_change"], 1.5);
    assert_eq!(parsed["series"].as_array().unwrap().len(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_devices_add_new_device() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/devices"))
        .and(body_partial_json(json!({ "deviceId": "DEV42", "deviceName": "Cellar" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(reading("DEV42", 5, 12.0)))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let mut cmd = iotmon_cmd(home.path());
    cmd.args([
        "--api-url",
        &server.uri(),
        "-o",
        "plain",
        "devices",
        "add",
        "--new",
        "42",
        "--name",
        "Cellar",
        "-t",
        "12",
        "-H",
        "45",
    ]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "DEV42");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_devices_add_reports_device_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "deviceId": "DEV42",
            "deviceName": "Cellar",
            "temperature": 12.0,
            "humidity": 45.0,
            "timestamp": "2024-06-15T10:05:00Z"
        })))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let mut cmd = iotmon_cmd(home.path());
    cmd.args([
        "--api-url",
        &server.uri(),
        "devices",
        "add",
        "--device",
        "DEV42",
        "-t",
        "12",
        "-H",
        "45",
    ]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Added reading for Cellar"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_devices_add_rejects_non_numeric_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let mut cmd = iotmon_cmd(home.path());
    cmd.args([
        "--api-url",
        &server.uri(),
        "devices",
        "add",
        "--new",
        "4x",
        "-t",
        "12",
        "-H",
        "45",
    ]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Device ID must contain only numbers"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_devices_delete_requires_yes_without_tty() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let mut cmd = iotmon_cmd(home.path());
    cmd.args(["--api-url", &server.uri(), "devices", "delete", "DEV1"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("--yes"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_devices_delete_not_found_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/devices/DEV9"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "Device not found" })),
        )
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let mut cmd = iotmon_cmd(home.path());
    cmd.args(["--api-url", &server.uri(), "-y", "devices", "delete", "DEV9"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("DEV9"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_failure_reports_fixed_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let mut cmd = iotmon_cmd(home.path());
    cmd.args(["--api-url", &server.uri(), "devices", "latest"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("Failed to fetch device data"));
}

#[test]
fn test_connection_refused_exit_code() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let home = tempfile::tempdir().unwrap();
    let output = iotmon_cmd(home.path())
        .args(["--api-url", &format!("http://127.0.0.1:{port}"), "devices", "latest"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7));
}

// ── Watch ───────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_watch_prints_first_update_and_exits() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/devices/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            reading("DEV2", 3, 23.0),
            reading("DEV1", 2, 19.0),
        ])))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let mut cmd = iotmon_cmd(home.path());
    cmd.args([
        "--api-url",
        &server.uri(),
        "-o",
        "json",
        "watch",
        "--device",
        "DEV1",
        "--count",
        "1",
    ]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let line = String::from_utf8_lossy(&output.stdout);
    let update: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
    assert_eq!(update["devices"], 2);
    assert_eq!(update["selected"], "DEV1");
    assert_eq!(update["summary"]["temperature"], 19.0);
    assert!(update["data_age_secs"].is_i64());
    assert!(update["refreshing"].is_boolean());
}
