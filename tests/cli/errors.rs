//! Tests for error handling and CLI flags.

use crate::support::*;

#[test]
fn test_help_lists_commands() {
    let t = Test::new();

    let output = t.cmd().arg("--help").output().unwrap();
    assert_success(&output);
    let out = stdout(&output);
    assert!(out.contains("insert") && out.contains("show"));
}

#[test]
fn test_unknown_command_is_usage_error() {
    let t = Test::new();

    let output = t.cmd().arg("unknown-command").output().unwrap();
    assert_exit_code(&output, exit::USAGE);
}

#[test]
fn test_version_flag() {
    let t = Test::new();

    let output = t.cmd().arg("--version").output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "coffer");
}

#[test]
fn test_completions_bash_outputs_script() {
    let t = Test::new();

    let output = t.cmd().args(["completions", "bash"]).output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "_coffer");
}

#[test]
fn test_completions_fish() {
    let t = Test::new();

    let output = t.cmd().args(["completions", "fish"]).output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "coffer");
}

#[test]
fn test_broken_config_is_config_error() {
    let t = Test::new();
    t.write_config("auto_clip = [not toml\n");

    let output = t.init_cmd("alice");
    assert_exit_code(&output, exit::CONFIG);
}

#[test]
fn test_invalid_config_value() {
    let t = Test::new();
    t.write_config("concurrency = 0\n");

    let output = t.init_cmd("alice");
    assert_exit_code(&output, exit::CONFIG);
    assert_stderr_contains(&output, "concurrency");
}

#[test]
fn test_global_flags_accepted_after_command() {
    let t = Test::init("alice");

    let output = t.insert_piped(&["email", "--no-confirm", "--no-interactive", "--no-sync"], "pw\n");
    assert_success(&output);
}
