//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::{Output, Stdio};

impl Test {
    /// Create a coffer command with correct environment variables.
    ///
    /// Returns a Command configured with:
    /// - HOME set to the temporary home directory
    /// - store, identity and config paths below that home
    /// - editor and log settings from the parent environment removed
    pub fn std_cmd(&self) -> std::process::Command {
        #[allow(deprecated)]
        let mut cmd = std::process::Command::new(assert_cmd::cargo::cargo_bin("coffer"));
        cmd.env("HOME", self.home.path());
        // Windows uses USERPROFILE instead of HOME for home directory
        cmd.env("USERPROFILE", self.home.path());
        cmd.env("COFFER_STORE", self.store());
        cmd.env("COFFER_IDENTITY", self.identity());
        cmd.env("COFFER_CONFIG", self.config());
        cmd.env_remove("COFFER_LOG");
        cmd.env_remove("COFFER_LOG_FORMAT");
        cmd.env_remove("EDITOR");
        cmd.env("NO_COLOR", "1");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Same as [`Test::std_cmd`], wrapped for assert_cmd.
    ///
    /// assert_cmd always gives the child a stdin pipe, so the binary sees
    /// piped (possibly empty) input.
    pub fn cmd(&self) -> Command {
        Command::from_std(self.std_cmd())
    }

    /// Shortcut for `coffer init --name`.
    pub fn init_cmd(&self, name: &str) -> Output {
        self.cmd()
            .args(["init", "--name", name])
            .output()
            .expect("failed to run coffer init")
    }

    /// Run `coffer insert <args>` with `content` on stdin.
    pub fn insert_piped(&self, args: &[&str], content: &str) -> Output {
        self.cmd()
            .arg("insert")
            .args(args)
            .write_stdin(content)
            .output()
            .expect("failed to run coffer insert")
    }

    /// Run `coffer insert <args>` with stdin connected to the null device.
    pub fn insert(&self, args: &[&str]) -> Output {
        self.std_cmd()
            .arg("insert")
            .args(args)
            .stdin(Stdio::null())
            .output()
            .expect("failed to run coffer insert")
    }

    /// Shortcut for `coffer show`.
    pub fn show(&self, name: &str) -> Output {
        self.cmd()
            .args(["show", name])
            .output()
            .expect("failed to run coffer show")
    }

    /// Shortcut for `coffer show --json`.
    pub fn show_json(&self, name: &str) -> serde_json::Value {
        let output = self
            .cmd()
            .args(["show", "--json", name])
            .output()
            .expect("failed to run coffer show --json");
        super::assert_success(&output);
        serde_json::from_slice(&output.stdout).expect("show --json printed invalid JSON")
    }
}
