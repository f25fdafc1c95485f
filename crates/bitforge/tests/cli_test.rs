//! Integration tests for the `bitforge` CLI binary.
//!
//! Argument parsing, offline commands and error exit codes run without
//! any network; the end-to-end cases point a profile at wiremock.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `bitforge` binary with env isolation.
///
/// Clears every `BITBUCKET_*` / `BITFORGE_*` variable and points config
/// directories at a nonexistent path so tests never read real settings.
fn bitforge_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("bitforge");
    cmd.env("HOME", "/tmp/bitforge-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/bitforge-cli-test-nonexistent")
        .env_remove("RUST_LOG");
    for var in [
        "BITBUCKET_AUTH_METHOD",
        "BITBUCKET_USERNAME",
        "BITBUCKET_PASSWORD",
        "BITBUCKET_OAUTH_CLIENT_ID",
        "BITBUCKET_OAUTH_CLIENT_SECRET",
        "BITFORGE_PROFILE",
        "BITFORGE_CONFIG",
        "BITFORGE_OUTPUT",
        "BITFORGE_TIMEOUT",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// Command with basic credentials in the environment.
fn authed_cmd() -> assert_cmd::Command {
    let mut cmd = bitforge_cmd();
    cmd.env("BITBUCKET_USERNAME", "alice")
        .env("BITBUCKET_PASSWORD", "s3cret");
    cmd
}

/// Write a config whose default profile targets `server`.
fn write_profile(dir: &Path, server: &MockServer) -> std::path::PathBuf {
    let path = dir.join("config.toml");
    let toml = format!(
        "default_profile = \"mock\"\n\n\
         [profiles.mock]\n\
         username = \"alice\"\n\
         password = \"s3cret\"\n\
         api_url = \"{uri}/2.0/\"\n\
         legacy_url = \"{uri}/1.0/\"\n",
        uri = server.uri()
    );
    std::fs::write(&path, toml).unwrap();
    path
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = bitforge_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_verbs() {
    bitforge_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("create")
            .and(predicate::str::contains("read"))
            .and(predicate::str::contains("import"))
            .and(predicate::str::contains("resources")),
    );
}

#[test]
fn test_version_flag() {
    bitforge_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bitforge"));
}

#[test]
fn test_completions_bash() {
    bitforge_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Offline commands ────────────────────────────────────────────────

#[test]
fn test_resources_lists_import_formats() {
    bitforge_cmd()
        .args(["resources", "-o", "json-compact"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#""type":"bitbucket_group""#)
                .and(predicate::str::contains("<workspace>/<slug>"))
                .and(predicate::str::contains("bitbucket_deployment_variable")),
        );
}

#[test]
fn test_config_path_honours_flag() {
    bitforge_cmd()
        .args(["config", "path", "--config", "/tmp/elsewhere/bitforge.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/tmp/elsewhere/bitforge.toml"));
}

// ── Input errors ────────────────────────────────────────────────────

#[test]
fn test_unknown_resource_type_is_usage_error() {
    bitforge_cmd()
        .args(["import", "bitbucket_branch", "W/main"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("bitforge resources"));
}

#[test]
fn test_malformed_import_id_fails_before_network() {
    authed_cmd()
        .args(["import", "bitbucket_group", "W"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("<workspace>/<slug>"));
}

#[test]
fn test_missing_credentials_exit_code() {
    bitforge_cmd()
        .args(["read", "bitbucket_group", "--set", "workspace=W", "--set", "slug=g1"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("BITBUCKET_USERNAME"));
}

#[test]
fn test_unreadable_ca_is_not_a_credentials_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(
        &config,
        "default_profile = \"corp\"\n\n\
         [profiles.corp]\n\
         username = \"alice\"\n\
         password = \"s3cret\"\n\
         ca_cert = \"/nonexistent/bitforge-ca.pem\"\n",
    )
    .unwrap();

    bitforge_cmd()
        .args(["import", "bitbucket_group", "W/g1", "--config"])
        .arg(&config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("ca_cert"));
}

#[test]
fn test_unknown_profile_is_usage_error() {
    authed_cmd()
        .args(["read", "bitbucket_group", "--profile", "nope", "-s", "workspace=W"])
        .assert()
        .code(2);
}

// ── Against a mock Bitbucket ────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_import_group_prints_descriptor() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1.0/groups"))
        .and(query_param("group", "W/g1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "name": "g1",
            "slug": "g1",
            "auto_add": false,
            "permission": null,
            "owner": { "uuid": "{ws-1}" }
        }])))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = write_profile(dir.path(), &server);

    let output = tokio::task::spawn_blocking(move || {
        bitforge_cmd()
            .args(["import", "bitbucket_group", "W/g1", "-o", "json-compact", "--config"])
            .arg(config)
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let descriptor: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(descriptor["permission"], "none");
    assert_eq!(descriptor["id"], "{ws-1}-g1");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_import_ghost_exits_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1.0/groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = write_profile(dir.path(), &server);

    let output = tokio::task::spawn_blocking(move || {
        bitforge_cmd()
            .args(["import", "bitbucket_group", "W/ghost", "--config"])
            .arg(config)
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert_eq!(output.status.code(), Some(4), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_read_absent_is_success_with_note() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1.0/groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = write_profile(dir.path(), &server);

    let output = tokio::task::spawn_blocking(move || {
        bitforge_cmd()
            .args([
                "read",
                "bitbucket_group",
                "-d",
                r#"{"workspace":"W","slug":"g1","id":"{ws-1}-g1"}"#,
                "--config",
            ])
            .arg(config)
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("absent remotely"), "{stderr}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("\"id\""), "id should be cleared:\n{stdout}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_create_reports_import_id() {
    let server = MockServer::start().await;
    let key = json!({ "id": 7, "key": "ssh-ed25519 AAAAC3", "label": "ci" });
    Mock::given(method("POST"))
        .and(path("/2.0/repositories/W/app/deploy-keys"))
        .respond_with(ResponseTemplate::new(201).set_body_json(key.clone()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/2.0/repositories/W/app/deploy-keys/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(key))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = write_profile(dir.path(), &server);

    let output = tokio::task::spawn_blocking(move || {
        bitforge_cmd()
            .args([
                "create",
                "bitbucket_deploy_key",
                "-d",
                r#"{"workspace":"W","repository":"app","label":"ci","key":"ssh-ed25519 AAAAC3"}"#,
                "--config",
            ])
            .arg(config)
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("import ID: W/app/7"), "{stderr}");
}
