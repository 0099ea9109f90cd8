//! Tests for `coffer show`.

use crate::support::*;

#[test]
fn test_show_prints_secret() {
    let t = Test::with_secrets("alice", &[("web", FULL_SECRET)]);

    let output = t.show("web");
    assert_success(&output);
    assert_eq!(stdout(&output), FULL_SECRET);
}

#[test]
fn test_show_json() {
    let t = Test::with_secrets("alice", &[("web", FULL_SECRET)]);

    let json = t.show_json("web");
    assert_eq!(json["name"], "web");
    assert_eq!(json["password"], "hunter2");
    assert_eq!(json["notes"], "security question: first pet\n");
    assert_eq!(json["fields"]["user"], "alice");
}

#[test]
fn test_safe_content_hides_password() {
    let t = Test::with_secrets("alice", &[("web", FULL_SECRET)]);
    t.write_config("safe_content = true\n");

    let output = t.show("web");
    assert_success(&output);
    assert_stdout_excludes(&output, "hunter2");
    assert_stdout_contains(&output, "user: alice");

    let json = t.show_json("web");
    assert!(json.get("password").is_none());
}

#[test]
fn test_show_missing_secret() {
    let t = Test::init("alice");

    let output = t.show("nope");
    assert_exit_code(&output, exit::NOT_FOUND);
    assert_stderr_contains(&output, "nope");
}

#[test]
fn test_show_without_identity() {
    let t = Test::with_secrets("alice", &[("web", "pw\n")]);
    std::fs::remove_file(t.identity()).unwrap();

    let output = t.show("web");
    assert_exit_code(&output, exit::NOT_INITIALIZED);
}
