//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against the dev data
//! directory and verify exit codes and output shape.

use std::process::Command;

use uuid::Uuid;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "healthykong-cli", "--"])
        .args(args)
        .env("HEALTHYKONG_ENV", "dev")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_badges_catalog() {
    let (stdout, _, code) = run_cli(&["badges", "catalog"]);
    assert_eq!(code, 0, "Badges catalog failed");

    let parsed: serde_json::Value =
        serde_json::from_str(&stdout).expect("catalog output is not JSON");
    let entries = parsed.as_array().expect("catalog is not an array");
    assert!(!entries.is_empty());
    assert!(entries.iter().any(|e| e["id"] == "first-record"));
}

#[test]
fn test_config_show() {
    let (stdout, _, code) = run_cli(&["config", "show"]);
    assert_eq!(code, 0, "Config show failed");
    assert!(stdout.contains("day_offset_hours"));
    assert!(stdout.contains("[donation]"));
}

#[test]
fn test_config_get() {
    let (stdout, _, code) = run_cli(&["config", "get", "donation.monthly_cap"]);
    assert_eq!(code, 0, "Config get failed");
    assert!(!stdout.trim().is_empty());
}

#[test]
fn test_config_get_unknown_key_fails() {
    let (_, stderr, code) = run_cli(&["config", "get", "no.such.key"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_status_unknown_user_fails() {
    let user = Uuid::new_v4().to_string();
    let (_, stderr, code) = run_cli(&["status", &user]);
    assert_eq!(code, 1, "Status for unknown user should fail");
    assert!(stderr.contains("error:"));
}

#[test]
fn test_provision_log_and_status() {
    let user = Uuid::new_v4().to_string();

    let (stdout, _, code) = run_cli(&["user", "provision", &user]);
    assert_eq!(code, 0, "User provision failed");
    assert!(stdout.contains("User provisioned:"));

    let (stdout, _, code) = run_cli(&["log", "glucose", &user, "105"]);
    assert_eq!(code, 0, "Log glucose failed");
    assert!(stdout.contains("First log of the day!"));

    let (stdout, _, code) = run_cli(&["status", &user]);
    assert_eq!(code, 0, "Status failed");
    let parsed: serde_json::Value =
        serde_json::from_str(&stdout).expect("status output is not JSON");
    assert_eq!(parsed["total_donation"], 100);
    assert_eq!(parsed["total_records"], 1);
}

#[test]
fn test_log_rejects_zero_reading() {
    let user = Uuid::new_v4().to_string();
    let _ = run_cli(&["user", "provision", &user]);
    let (_, stderr, code) = run_cli(&["log", "glucose", &user, "0"]);
    assert_eq!(code, 1, "Zero reading should be rejected");
    assert!(stderr.contains("error:"));
}

#[test]
fn test_log_list() {
    let user = Uuid::new_v4().to_string();
    let _ = run_cli(&["user", "provision", &user]);
    let _ = run_cli(&["log", "bp", &user, "120", "80"]);

    let (stdout, _, code) = run_cli(&["log", "list", &user]);
    assert_eq!(code, 0, "Log list failed");
    let parsed: serde_json::Value =
        serde_json::from_str(&stdout).expect("log list output is not JSON");
    assert_eq!(parsed.as_array().map(Vec::len), Some(1));
}
