//! Tests for `coffer init`.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_init_creates_store_and_identity() {
    let t = Test::new();

    t.cmd()
        .args(["init", "--name", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("initialized"))
        .stdout(predicate::str::contains("age1"));

    assert!(t.identity().is_file());
    let recipients = std::fs::read_to_string(t.store().join(".age-recipients")).unwrap();
    assert!(recipients.contains("# alice"));
    assert!(recipients.lines().any(|l| l.starts_with("age1")));
}

#[test]
fn test_init_exports_public_key() {
    let t = Test::init("alice");
    let exported = std::fs::read_to_string(t.store().join(".public-keys/alice.pub")).unwrap();
    assert!(exported.trim().starts_with("age1"));
}

#[test]
fn test_init_without_key_export() {
    let t = Test::new();
    t.write_config("export_keys = false\n");

    assert_success(&t.init_cmd("alice"));
    assert!(!t.store().join(".public-keys").exists());
}

#[test]
fn test_init_twice_fails() {
    let t = Test::init("alice");

    t.cmd()
        .args(["init", "--name", "alice"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already initialized"));
}

#[cfg(unix)]
#[test]
fn test_identity_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let t = Test::init("alice");
    let mode = std::fs::metadata(t.identity()).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o600);
}

#[test]
fn test_init_rejects_name_with_slash() {
    let t = Test::new();
    let output = t.init_cmd("a/b");
    assert_exit_code(&output, exit::UNKNOWN);
    assert!(!t.store().exists());
}
