//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary home so no
//! state leaks between tests or into the user's config.

use std::process::Command;

use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &TempDir, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_dailynote"))
        .args(args)
        .env("DAILYNOTE_HOME", home.path())
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_ok(home: &TempDir, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(home, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    stdout
}

fn run_json(home: &TempDir, args: &[&str]) -> serde_json::Value {
    let stdout = run_ok(home, args);
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_status_on_fresh_home() {
    let home = TempDir::new().unwrap();
    let status = run_json(&home, &["status", "--json"]);
    assert_eq!(status["tasks"]["total"], 0);
    assert_eq!(status["water"]["intake"], 0);
    assert_eq!(status["water"]["goal"], 2000);
    assert_eq!(status["onboarded"], false);
    assert!(home.path().join("config.toml").exists());
}

#[test]
fn test_task_lifecycle() {
    let home = TempDir::new().unwrap();
    let out = run_ok(&home, &["task", "add", "Write changelog"]);
    assert!(out.contains("Task added:"));

    let tasks = run_json(&home, &["task", "list", "--json"]);
    let tasks = tasks.as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "Write changelog");
    let id = tasks[0]["id"].as_str().unwrap().to_string();

    let out = run_ok(&home, &["task", "done", &id[..8]]);
    assert!(out.contains("Task completed"));
    let tasks = run_json(&home, &["task", "list", "--json"]);
    assert_eq!(tasks[0]["is_completed"], true);

    run_ok(&home, &["task", "rename", &id, "Write release notes"]);
    let tasks = run_json(&home, &["task", "list", "--json"]);
    assert_eq!(tasks[0]["title"], "Write release notes");

    run_ok(&home, &["task", "delete", &id]);
    let tasks = run_json(&home, &["task", "list", "--json"]);
    assert!(tasks.as_array().unwrap().is_empty());
}

#[test]
fn test_blank_task_is_rejected() {
    let home = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(&home, &["task", "add", "   "]);
    assert_ne!(code, 0);
    assert!(stderr.contains("must not be empty"));
}

#[test]
fn test_water_log_and_goals() {
    let home = TempDir::new().unwrap();
    let out = run_ok(&home, &["water", "log", "250"]);
    assert!(out.contains("250 / 2000 ml"));

    let (_, _, code) = run_cli(&home, &["water", "log", "0"]);
    assert_ne!(code, 0);

    let goals = run_json(&home, &["water", "goals", "--json"]);
    let goals = goals.as_array().unwrap();
    assert_eq!(goals.len(), 7);
    let id = goals[0]["id"].as_str().unwrap().to_string();

    run_ok(&home, &["water", "check", &id]);
    let status = run_json(&home, &["status", "--json"]);
    assert_eq!(status["water"]["intake"], 550);

    // Reopening keeps the logged amount
    run_ok(&home, &["water", "check", &id]);
    let status = run_json(&home, &["status", "--json"]);
    assert_eq!(status["water"]["intake"], 550);
}

#[test]
fn test_onboard_and_profile() {
    let home = TempDir::new().unwrap();
    let out = run_ok(
        &home,
        &["onboard", "--nickname", "Jo", "--start", "8", "--end", "17", "--tone", "gentle"],
    );
    assert!(out.contains("Welcome, Jo!"));

    let profile = run_json(&home, &["profile", "show", "--json"]);
    assert_eq!(profile["work_start_hour"], 8);
    assert_eq!(profile["tone"], "gentle");
    let settings = run_json(&home, &["settings", "show", "--json"]);
    assert_eq!(settings["work_end_hour"], 17);

    let (_, _, code) = run_cli(&home, &["profile", "set", "--start", "18", "--end", "9"]);
    assert_ne!(code, 0);
    let (_, _, code) = run_cli(&home, &["profile", "set", "--tone", "sarcastic"]);
    assert_ne!(code, 0);
}

#[test]
fn test_routines_apply_once() {
    let home = TempDir::new().unwrap();
    run_ok(&home, &["routine", "add", "Stretch", "--at", "23:59"]);
    let out = run_ok(&home, &["routine", "apply"]);
    assert!(out.contains("Added 1"));
    let out = run_ok(&home, &["routine", "apply"]);
    assert!(out.contains("Added 0"));

    let tasks = run_json(&home, &["task", "list", "--json"]);
    assert_eq!(tasks[0]["title"], "Stretch");
    assert!(tasks[0]["routine_id"].is_string());
}

#[test]
fn test_notes_roundtrip() {
    let home = TempDir::new().unwrap();
    run_ok(&home, &["notes", "set", "call", "the", "vet"]);
    assert_eq!(run_ok(&home, &["notes", "show"]).trim(), "call the vet");
}

#[test]
fn test_config_get_set() {
    let home = TempDir::new().unwrap();
    assert_eq!(run_ok(&home, &["config", "get", "day.boundary_hour"]).trim(), "0");
    run_ok(&home, &["config", "set", "day.boundary_hour", "4"]);
    assert_eq!(run_ok(&home, &["config", "get", "day.boundary_hour"]).trim(), "4");

    let (_, _, code) = run_cli(&home, &["config", "set", "day.boundary_hour", "30"]);
    assert_ne!(code, 0);
    let (_, _, code) = run_cli(&home, &["config", "get", "nope"]);
    assert_ne!(code, 0);
}

#[test]
fn test_settings_set() {
    let home = TempDir::new().unwrap();
    run_ok(&home, &["settings", "set", "daily_water_goal", "2500"]);
    let status = run_json(&home, &["status", "--json"]);
    assert_eq!(status["water"]["goal"], 2500);
    let (_, _, code) = run_cli(&home, &["settings", "set", "colour", "blue"]);
    assert_ne!(code, 0);
}

#[test]
fn test_notifications_list_json() {
    let home = TempDir::new().unwrap();
    run_ok(&home, &["task", "add", "Late call", "--at", "23:59"]);
    let pending = run_json(&home, &["notifications", "list", "--json"]);
    assert!(pending
        .as_array()
        .unwrap()
        .iter()
        .any(|r| r["title"].is_string() && r["id"].as_str().unwrap().starts_with("task-")));

    let (_, _, code) = run_cli(&home, &["notifications", "act", "task-missing", "snooze"]);
    assert_ne!(code, 0);
}

#[test]
fn test_run_once() {
    let home = TempDir::new().unwrap();
    run_ok(&home, &["run", "--once"]);
}

#[test]
fn test_completions() {
    let home = TempDir::new().unwrap();
    let out = run_ok(&home, &["completions", "bash"]);
    assert!(out.contains("dailynote"));
}
