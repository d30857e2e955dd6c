//! Smoke tests for the `tripmate` binary, run against the built-in backend

use std::path::Path;
use std::process::{Command, Output};

fn tripmate(session_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tripmate"))
        .arg("--config")
        .arg(session_dir.join("absent.toml"))
        .arg("--session-dir")
        .arg(session_dir.join("session"))
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("TRIPMATE_PASSWORD")
        .output()
        .expect("Failed to execute tripmate")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_help_describes_tool() {
    let dir = tempfile::tempdir().unwrap();
    let output = tripmate(dir.path(), &["--help"]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("travel companions"));
    assert!(text.contains("vacancies"));
}

#[test]
fn test_list_vacancies_offline() {
    let dir = tempfile::tempdir().unwrap();
    let output = tripmate(dir.path(), &["--mock", "vacancies", "list"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("Lisbon long weekend"));
    assert!(text.contains("Dolomites hut to hut"));
}

#[test]
fn test_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let output = tripmate(dir.path(), &["--mock", "--json", "options", "languages"]);

    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert!(parsed.as_array().is_some_and(|items| !items.is_empty()));
}

#[test]
fn test_protected_command_asks_for_login() {
    let dir = tempfile::tempdir().unwrap();
    let output = tripmate(dir.path(), &["--mock", "whoami"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("tripmate login"));
}

#[test]
fn test_login_with_demo_account() {
    let dir = tempfile::tempdir().unwrap();
    let output = tripmate(
        dir.path(),
        &[
            "--mock",
            "login",
            "--email",
            "demo@tripmate.test",
            "--password",
            "tripmate123",
        ],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Signed in as Alex Demo"));
}

#[test]
fn test_wrong_password_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let output = tripmate(
        dir.path(),
        &["--mock", "login", "--email", "demo@tripmate.test", "--password", "nope"],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Invalid email or password"));
}

#[test]
fn test_invalid_form_is_rejected_before_sending() {
    let dir = tempfile::tempdir().unwrap();
    let output = tripmate(
        dir.path(),
        &[
            "--mock",
            "vacancies",
            "create",
            "--title",
            "Past trip",
            "--destination",
            "Rome",
            "--start",
            "2020-01-10",
            "--end",
            "2020-01-05",
            "--budget-min",
            "500",
            "--budget-max",
            "100",
        ],
    );

    assert_eq!(output.status.code(), Some(1));
    let text = stderr(&output);
    assert!(text.contains("Please correct the following"));
    assert!(text.contains("start_date"));
}
