//! CLI integration tests

use std::process::Command;

fn run_cli(args: &[&str]) -> std::process::Output {
    let mut full_args = vec!["run", "-p", "ontosync-cli", "--"];
    full_args.extend_from_slice(args);
    Command::new("cargo")
        .args(&full_args)
        .output()
        .expect("Failed to execute command")
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = run_cli(&["--help"]);

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("sync"), "Should show sync command");
    assert!(stdout.contains("get"), "Should show get command");
    assert!(stdout.contains("learn"), "Should show learn command");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = run_cli(&["--version"]);

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("ontosync"), "Should show binary name");
}

/// Test sync command help
#[test]
fn test_sync_help() {
    let output = run_cli(&["sync", "--help"]);

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Sync help should succeed");
    assert!(stdout.contains("--dry-run"), "Should show dry-run option");
    assert!(stdout.contains("--one-by-one"), "Should show one-by-one option");
    assert!(
        stdout.contains("--min-confidence"),
        "Should show min-confidence option"
    );
    assert!(stdout.contains("--building"), "Should show building option");
    assert!(stdout.contains("--types"), "Should show types option");
    assert!(stdout.contains("--all"), "Should show all option");
    assert!(stdout.contains("--yes"), "Should show yes option");
}

/// Test get subcommand help
#[test]
fn test_get_help() {
    let output = run_cli(&["get", "--help"]);

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Get help should succeed");
    assert!(stdout.contains("buildings"), "Should show buildings command");
    assert!(stdout.contains("devices"), "Should show devices command");
    assert!(stdout.contains("points"), "Should show points command");
    assert!(
        stdout.contains("datasources"),
        "Should show datasources command"
    );
    assert!(stdout.contains("entities"), "Should show entities command");
}

/// Test get points subcommand help
#[test]
fn test_get_points_help() {
    let output = run_cli(&["get", "points", "--help"]);

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Get points help should succeed");
    assert!(stdout.contains("--device"), "Should show device option");
}

/// Test learn correct subcommand help
#[test]
fn test_learn_correct_help() {
    let output = run_cli(&["learn", "correct", "--help"]);

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Learn correct help should succeed");
    assert!(stdout.contains("POINT"), "Should show point argument");
    assert!(stdout.contains("FIELD"), "Should show field argument");
    assert!(
        stdout.contains("--equipment"),
        "Should show equipment option"
    );
}

/// Test learn subcommand list
#[test]
fn test_learn_help() {
    let output = run_cli(&["learn", "--help"]);

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Learn help should succeed");
    assert!(stdout.contains("stats"), "Should show stats command");
    assert!(stdout.contains("correct"), "Should show correct command");
    assert!(stdout.contains("train"), "Should show train command");
    assert!(stdout.contains("mappings"), "Should show mappings command");
}

/// Test format option
#[test]
fn test_format_option() {
    let output = run_cli(&["--help"]);

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("--format"), "Should show format option");
    assert!(stdout.contains("table"), "Should show table format");
    assert!(stdout.contains("json"), "Should show json format");
}

/// Test token option and its env fallback
#[test]
fn test_token_option() {
    let output = run_cli(&["--help"]);

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("--token"), "Should show token option");
    assert!(stdout.contains("ACCESS_TOKEN"), "Should show env var");
}

/// Test invalid command error handling
#[test]
fn test_invalid_command() {
    let output = run_cli(&["invalid-command"]);

    assert!(!output.status.success(), "Invalid command should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error") || stderr.contains("invalid"),
        "Should show error message"
    );
}

/// Test missing required argument error handling
#[test]
fn test_missing_argument() {
    let output = run_cli(&["learn", "correct"]);

    assert!(!output.status.success(), "Missing argument should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("required") || stderr.contains("error"),
        "Should show error about missing argument"
    );
}
