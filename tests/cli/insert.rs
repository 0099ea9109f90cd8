//! Tests for `coffer insert`.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_piped_insert_roundtrip() {
    let t = Test::init("alice");
    assert_roundtrip(&t, "web/example.com", FULL_SECRET);
}

#[test]
fn test_piped_insert_records_commit() {
    let t = Test::init("alice");
    assert_success(&t.insert_piped(&["email"], "pw\n"));

    let log = t.commit_log();
    assert!(log.contains("\temail\tRead secret from STDIN"), "{}", log);
}

#[test]
fn test_secret_is_encrypted_on_disk() {
    let t = Test::init("alice");
    assert_success(&t.insert_piped(&["email"], "hunter2\n"));

    let raw = std::fs::read_to_string(t.store().join("email.age")).unwrap();
    assert!(raw.contains("BEGIN AGE ENCRYPTED FILE"));
    assert!(!raw.contains("hunter2"));
}

#[test]
fn test_existing_secret_is_not_overwritten() {
    let t = Test::with_secrets("alice", &[("email", "old\n")]);

    t.cmd()
        .args(["insert", "email"])
        .write_stdin("new\n")
        .assert()
        .code(exit::ABORTED)
        .stderr(predicate::str::contains("not overwriting your current secret"));

    assert_eq!(stdout(&t.show("email")), "old\n");
}

#[test]
fn test_force_overwrites() {
    let t = Test::with_secrets("alice", &[("email", "old\n")]);

    assert_success(&t.insert_piped(&["--force", "email"], "new\n"));
    assert_eq!(stdout(&t.show("email")), "new\n");
}

#[test]
fn test_append_adds_after_existing() {
    let t = Test::with_secrets("alice", &[("email", "pw\nfirst\n")]);

    assert_success(&t.insert_piped(&["--append", "email"], "second\n"));
    assert_eq!(stdout(&t.show("email")), "pw\nfirst\nsecond\n");
}

#[test]
fn test_key_sets_structured_field() {
    let t = Test::with_secrets("alice", &[("web", "pw\n")]);

    assert_success(&t.insert_piped(&["web", "user", "url=example.com"], "alice"));

    let json = t.show_json("web");
    assert_eq!(json["password"], "pw");
    assert_eq!(json["fields"]["user"], "alice");
    assert_eq!(json["fields"]["url"], "example.com");
    assert!(t.commit_log().contains("Inserted YAML value from STDIN"));
}

#[test]
fn test_key_on_new_secret() {
    let t = Test::init("alice");

    assert_success(&t.insert_piped(&["api", "token"], "abc123"));
    assert_eq!(t.show_json("api")["fields"]["token"], "abc123");
}

#[test]
fn test_malformed_yaml_is_stored_with_warning() {
    let t = Test::init("alice");

    let output = t.insert_piped(&["web"], MALFORMED_SECRET);
    assert_success(&output);
    assert_stderr_contains(&output, "Invalid YAML");

    assert_eq!(stdout(&t.show("web")), MALFORMED_SECRET);
}

#[test]
fn test_missing_name() {
    let t = Test::init("alice");

    let output = t.insert(&[]);
    assert_exit_code(&output, exit::NO_NAME);
    assert!(t.commit_log().is_empty());
}

#[test]
fn test_password_prompt_needs_terminal() {
    let t = Test::init("alice");

    let output = t.insert(&["email"]);
    assert_exit_code(&output, exit::IO);
    assert_stderr_contains(&output, "non-interactive");
}

#[test]
fn test_uninitialized_store() {
    let t = Test::new();

    let output = t.insert_piped(&["email"], "pw\n");
    assert_exit_code(&output, exit::NOT_INITIALIZED);
    assert_stderr_contains(&output, "coffer init");
}

#[test]
fn test_invalid_recipient_blocks_write() {
    let t = Test::init("alice");
    let recipients = t.store().join(".age-recipients");
    let mut contents = std::fs::read_to_string(&recipients).unwrap();
    contents.push_str(INVALID_PUBLIC_KEY);
    contents.push('\n');
    std::fs::write(&recipients, contents).unwrap();

    let output = t.insert_piped(&["email"], "pw\n");
    assert_exit_code(&output, exit::ENCRYPT);
    assert!(!t.store().join("email.age").exists());

    assert_success(&t.insert_piped(&["--force", "email"], "pw\n"));
    assert_eq!(stdout(&t.show("email")), "pw\n");
}

#[test]
fn test_additional_recipient() {
    let t = Test::init("alice");
    let recipients = t.store().join(".age-recipients");
    let mut contents = std::fs::read_to_string(&recipients).unwrap();
    contents.push_str(BOB_PUBLIC_KEY);
    contents.push('\n');
    std::fs::write(&recipients, contents).unwrap();

    assert_roundtrip(&t, "shared", "pw\n");
}

#[test]
fn test_invalid_name_is_rejected() {
    let t = Test::init("alice");

    let output = t.insert_piped(&["../escape"], "pw\n");
    assert_exit_code(&output, exit::UNKNOWN);
    assert_stderr_contains(&output, "invalid secret name");
    assert!(!t.home.path().join("escape.age").exists());
}
