//! Integration tests for the `daisy` CLI binary.
//!
//! Argument parsing, help output, completions and error exit codes run
//! without a network; the end-to-end cases drive the binary against a
//! wiremock server standing in for the cloud.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `daisy` binary with env isolation.
///
/// Clears all `DAISY_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn daisy_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("daisy");
    cmd.env("HOME", "/tmp/daisy-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/daisy-cli-test-nonexistent")
        .env_remove("DAISY_PROFILE")
        .env_remove("DAISY_EMAIL")
        .env_remove("DAISY_BASE_URL")
        .env_remove("DAISY_OUTPUT")
        .env_remove("DAISY_INSECURE")
        .env_remove("DAISY_TIMEOUT")
        .env_remove("DAISY_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

/// A command already pointed at `server` with flag-only credentials.
fn daisy_against(server: &MockServer) -> assert_cmd::Command {
    let mut cmd = daisy_cmd();
    cmd.env("DAISY_PASSWORD", "pw")
        .args(["--email", "me@example.com", "--base-url", &server.uri()]);
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Run a prepared command off the async runtime so the mock server keeps
/// serving while the binary blocks.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

fn svc(suffix: &str) -> String {
    format!("/teleco/services/{suffix}")
}

fn ok(val: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "codEsito": "S", "valRisultato": val }))
}

async fn mount_directory(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(svc("account-login")))
        .and(body_partial_json(json!({ "email": "me@example.com", "pwd": "pw" })))
        .respond_with(ok(json!({ "idAccount": 11, "idSession": "sess-1" })))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path(svc("account-installation-list")))
        .respond_with(ok(json!({
            "installationList": [
                { "idInstallation": 7, "instCode": "INST7", "instDescription": "Home" }
            ]
        })))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path(svc("room-list")))
        .respond_with(ok(json!({
            "roomList": [{
                "idInstallationRoom": 1,
                "roomDescription": "Garden",
                "deviceList": [
                    { "idInstallationDevice": 101, "idDevicetype": 21, "deviceIndex": 1, "label": "Spots" },
                    { "idInstallationDevice": 102, "idDevicetype": 22, "deviceIndex": 2, "label": "Zip" },
                    { "idInstallationDevice": 105, "idDevicetype": 99, "deviceIndex": 5, "label": "Heater" }
                ]
            }]
        })))
        .mount(server)
        .await;
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = daisy_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    daisy_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Teleco Daisy")
            .and(predicate::str::contains("lights"))
            .and(predicate::str::contains("covers"))
            .and(predicate::str::contains("installations")),
    );
}

#[test]
fn test_version_flag() {
    daisy_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("daisy"));
}

#[test]
fn test_covers_open_help_mentions_steps() {
    daisy_cmd()
        .args(["covers", "open", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("33, 66 or 100"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    daisy_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_invalid_shell() {
    daisy_cmd()
        .args(["completions", "tcsh"])
        .assert()
        .failure()
        .code(2);
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_prints_toml_file() {
    daisy_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_set_and_show_round_trip() {
    let home = tempfile::tempdir().unwrap();
    let run_in_home = |args: &[&str]| {
        let mut cmd = daisy_cmd();
        cmd.env("HOME", home.path())
            .env("XDG_CONFIG_HOME", home.path())
            .args(args);
        cmd
    };

    run_in_home(&["config", "set", "email", "me@example.com"])
        .assert()
        .success();
    run_in_home(&["config", "set", "white_led", "legacy"])
        .assert()
        .success();
    run_in_home(&["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("me@example.com")
                .and(predicate::str::contains("white_led = \"legacy\"")),
        );
    run_in_home(&["config", "set", "colour", "red"])
        .assert()
        .failure()
        .code(2);
}

// ── Error handling ──────────────────────────────────────────────────

#[test]
fn test_missing_config_is_reported() {
    let output = daisy_cmd().args(["devices", "list"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let text = combined_output(&output);
    assert!(text.contains("config init"), "Expected setup hint:\n{text}");
}

#[test]
fn test_unknown_profile_is_reported() {
    let output = daisy_cmd()
        .args(["-p", "nope", "devices", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("nope"));
}

#[test]
fn test_invalid_output_format() {
    daisy_cmd()
        .args(["-o", "xml", "devices", "list"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_bad_color_rejected_before_network() {
    // Port 9 (discard) is never reached: validation fails first.
    let output = daisy_cmd()
        .env("DAISY_PASSWORD", "pw")
        .args([
            "--email",
            "me@example.com",
            "--base-url",
            "http://127.0.0.1:9/",
            "lights",
            "color",
            "Spots",
            "--rgb",
            "300,0,0",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("red channel"));
}

// ── End to end ──────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_login_prints_account() {
    let server = MockServer::start().await;
    mount_directory(&server).await;

    let mut cmd = daisy_against(&server);
    cmd.args(["-o", "plain", "login"]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "11");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_login_exits_with_auth_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(svc("account-login")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "codEsito": "E" })))
        .mount(&server)
        .await;

    let mut cmd = daisy_against(&server);
    cmd.arg("login");
    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(3));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_devices_list_json_skips_unknown_types() {
    let server = MockServer::start().await;
    mount_directory(&server).await;

    let mut cmd = daisy_against(&server);
    cmd.args(["-o", "json", "devices", "list"]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let devices: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let labels: Vec<&str> = devices
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["Spots", "Zip"]);
    assert_eq!(devices[0]["kind"], "light");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_light_on_waits_for_ack() {
    let server = MockServer::start().await;
    mount_directory(&server).await;
    Mock::given(method("POST"))
        .and(path(svc("tmate20/feedthecommands/")))
        .and(body_partial_json(json!({
            "idInstallation": "INST7",
            "commandsList": [{ "commandId": 146, "commandParam": "ON", "lowlevelCommand": "CH1" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "MessageID": "WS-000",
            "ActionReference": "ref-1"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(svc("tmate20/getackcommand/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "MessageID": "WS-300",
            "MessageText": "PROC"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = daisy_against(&server);
    cmd.args(["-o", "plain", "lights", "on", "spots"]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "succeeded");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_no_wait_skips_ack() {
    let server = MockServer::start().await;
    mount_directory(&server).await;
    Mock::given(method("POST"))
        .and(path(svc("tmate20/feedthecommands/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "MessageID": "WS-000",
            "ActionReference": "ref-2"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(svc("tmate20/getackcommand/")))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let mut cmd = daisy_against(&server);
    cmd.args(["--no-wait", "-o", "plain", "covers", "close", "102"]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "pending");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cover_command_on_light_is_usage_error() {
    let server = MockServer::start().await;
    mount_directory(&server).await;

    let mut cmd = daisy_against(&server);
    cmd.args(["covers", "stop", "Spots"]);
    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(2));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_device_is_not_found() {
    let server = MockServer::start().await;
    mount_directory(&server).await;

    let mut cmd = daisy_against(&server);
    cmd.args(["lights", "off", "Heater"]);
    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(4));
}
