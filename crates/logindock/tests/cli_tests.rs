//! CLI integration tests.
//!
//! These tests exercise the CLI commands end-to-end against a temporary data
//! directory.

use std::path::Path;
use std::process::{Command, Output};

fn logindock(data_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_logindock"))
        .args(args)
        .env("LOGINDOCK_DATA_DIR", data_dir)
        .env("LOGINDOCK_CONFIG_CONTENT", r#"{ "notifications": { "enabled": false } }"#)
        .output()
        .expect("Failed to execute command")
}

fn add(data_dir: &Path, env: &str, login_id: &str) -> Output {
    logindock(
        data_dir,
        &[
            "add",
            "--env",
            env,
            "--domain",
            "acme",
            "--login-id",
            login_id,
            "--password",
            "s3cret",
            "--url",
            "https://staging.example.com",
        ],
    )
}

#[test]
fn test_version_command() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output = logindock(temp_dir.path(), &["version"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("logindock"));
}

#[test]
fn test_help_command() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output = logindock(temp_dir.path(), &["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Credential launcher"));
    assert!(stdout.contains("serve"));
    assert!(stdout.contains("login"));
}

#[test]
fn test_list_empty() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output = logindock(temp_dir.path(), &["list"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No credentials stored"));
}

#[test]
fn test_add_then_list() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    assert!(add(temp_dir.path(), "staging", "admin").status.success());

    let output = logindock(temp_dir.path(), &["list"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("staging"));
    assert!(stdout.contains("acme-admin-staging"));

    assert!(temp_dir
        .path()
        .join("storage")
        .join("loginAccounts.json")
        .exists());
}

#[test]
fn test_add_duplicate_fails() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    assert!(add(temp_dir.path(), "staging", "admin").status.success());

    let output = add(temp_dir.path(), "staging", "admin");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("already exists"));
}

#[test]
fn test_delete_last_record_removes_group() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    assert!(add(temp_dir.path(), "staging", "admin").status.success());

    let output = logindock(
        temp_dir.path(),
        &["delete", "--env", "staging", "--domain", "acme", "--login-id", "admin"],
    );
    assert!(output.status.success());

    let output = logindock(temp_dir.path(), &["export", "--stdout"]);
    let exported: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(exported, serde_json::json!([]));
}

#[test]
fn test_edit_moves_record_to_new_env() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    assert!(add(temp_dir.path(), "staging", "admin").status.success());

    let output = logindock(
        temp_dir.path(),
        &[
            "edit", "--env", "staging", "--domain", "acme", "--login-id", "admin", "--new-env",
            "prod",
        ],
    );
    assert!(output.status.success());

    let output = logindock(temp_dir.path(), &["export", "--stdout"]);
    let exported: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let groups = exported.as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["env"], "prod");
    assert_eq!(groups[0]["children"][0]["env"], "prod");
}

#[test]
fn test_export_import_round_trip() {
    let source = tempfile::tempdir().expect("Failed to create temp dir");
    assert!(add(source.path(), "staging", "admin").status.success());
    assert!(add(source.path(), "prod", "ops").status.success());

    let export_file = source.path().join("export.json");
    let output = logindock(
        source.path(),
        &["export", "--file", export_file.to_str().unwrap()],
    );
    assert!(output.status.success());

    let target = tempfile::tempdir().expect("Failed to create temp dir");
    let output = logindock(
        target.path(),
        &["import", "--file", export_file.to_str().unwrap()],
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Imported 2 credentials"));

    // Importing again only finds duplicates
    let output = logindock(
        target.path(),
        &["import", "--file", export_file.to_str().unwrap()],
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Imported 0 credentials"));
    assert!(stdout.contains("2 duplicates skipped"));

    let first_export = std::fs::read_to_string(&export_file).unwrap();
    let output = logindock(target.path(), &["export", "--stdout"]);
    let copied = String::from_utf8_lossy(&output.stdout);
    assert_eq!(copied.trim_end(), first_export.trim_end());
}

#[test]
fn test_import_rejects_invalid_json() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let bad = temp_dir.path().join("bad.json");
    std::fs::write(&bad, "not json").unwrap();

    let output = logindock(temp_dir.path(), &["import", "--file", bad.to_str().unwrap()]);
    assert!(!output.status.success());
}

#[test]
fn test_config_command_shows_effective_values() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output = logindock(temp_dir.path(), &["config"]);

    assert!(output.status.success());
    let config: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["server"]["address"], "127.0.0.1:4815");
    assert_eq!(config["login"]["timeout_secs"], 30);
    assert_eq!(config["notifications"]["enabled"], false);
}

#[test]
fn test_login_without_bridge_fails() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    assert!(add(temp_dir.path(), "staging", "admin").status.success());

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap().to_string();
    drop(listener);

    let output = Command::new(env!("CARGO_BIN_EXE_logindock"))
        .args(["login", "--env", "staging", "--domain", "acme", "--login-id", "admin"])
        .env("LOGINDOCK_DATA_DIR", temp_dir.path())
        .env("LOGINDOCK_ADDRESS", &address)
        .env("LOGINDOCK_CONFIG_CONTENT", r#"{ "notifications": { "enabled": false } }"#)
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("logindock serve"));
}
