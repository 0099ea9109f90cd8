//! Test support utilities for coffer integration tests.
//!
//! Provides reusable test environment setup and helper commands.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::path::PathBuf;

use tempfile::TempDir;

/// Test environment with isolated temp directories.
///
/// Each test gets its own working dir and home dir. The store, identity and
/// config all live below the temp home and are passed to the binary through
/// environment variables, so tests can run in parallel.
pub struct Test {
    /// Working directory for the child process
    pub dir: TempDir,
    /// Temporary home directory
    pub home: TempDir,
}

impl Test {
    /// Create a new empty test environment.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let home = TempDir::new().expect("failed to create temp home");

        Self { dir, home }
    }

    /// Create a test environment with an initialized store.
    pub fn init(name: &str) -> Self {
        let t = Self::new();
        let output = t.init_cmd(name);
        assert!(
            output.status.success(),
            "Failed to initialize store: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        t
    }

    /// Create an initialized store holding the given secrets, inserted from stdin.
    pub fn with_secrets(name: &str, secrets: &[(&str, &str)]) -> Self {
        let t = Self::init(name);
        for (secret, content) in secrets {
            let output = t.insert_piped(&[*secret], content);
            assert!(
                output.status.success(),
                "Failed to insert {}: {}",
                secret,
                String::from_utf8_lossy(&output.stderr)
            );
        }
        t
    }

    /// Store root used by the binary.
    pub fn store(&self) -> PathBuf {
        self.home.path().join("store")
    }

    /// Identity file used by the binary.
    pub fn identity(&self) -> PathBuf {
        self.home.path().join("identity.key")
    }

    /// Config file used by the binary.
    pub fn config(&self) -> PathBuf {
        self.home.path().join("config.toml")
    }

    /// Write the config file.
    pub fn write_config(&self, contents: &str) {
        std::fs::write(self.config(), contents).expect("failed to write config");
    }

    /// Commit log contents, empty if nothing was written yet.
    pub fn commit_log(&self) -> String {
        std::fs::read_to_string(self.store().join(".commits")).unwrap_or_default()
    }
}
