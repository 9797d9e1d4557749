//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs. Only
//! commands that need no network access or stored credentials are covered.

use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "daybrief-cli", "--"])
        .args(args)
        .env("DAYBRIEF_ENV", "dev")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn help_lists_subcommands() {
    let (stdout, _, code) = run_cli(&["--help"]);
    assert_eq!(code, 0);
    for subcommand in ["today", "analyze", "rank", "focus", "commute", "decline", "reschedule"] {
        assert!(stdout.contains(subcommand), "help missing '{subcommand}'");
    }
}

#[test]
fn config_path_points_at_toml() {
    let (stdout, _, code) = run_cli(&["config", "path"]);
    assert_eq!(code, 0);
    assert!(stdout.trim().ends_with("config.toml"));
}

#[test]
fn config_list_is_valid_json() {
    let (stdout, _, code) = run_cli(&["config", "list"]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("config list not JSON");
    assert!(parsed.get("hours").is_some());
    assert!(parsed.get("ranking").is_some());
}

#[test]
fn config_get_known_key() {
    let (stdout, _, code) = run_cli(&["config", "get", "hours.work_start"]);
    assert_eq!(code, 0);
    assert!(!stdout.trim().is_empty());
}

#[test]
fn config_get_unknown_key_fails() {
    let (_, stderr, code) = run_cli(&["config", "get", "hours.nonexistent"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn completions_generate_for_bash() {
    let (stdout, _, code) = run_cli(&["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("daybrief"));
}

#[test]
fn invalid_date_is_rejected_before_any_network_call() {
    let (_, stderr, code) = run_cli(&["analyze", "--date", "not-a-date"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("invalid date"));
}
