//! External editor integration.
//!
//! Multi-line input is collected by writing the seed content to a private temp
//! file, running the user's editor on it, and reading the file back.

use std::cell::RefCell;
use std::io::{self, Write};
use std::path::Path;
use std::process::Command;

use tracing::{debug, warn};

use crate::core::constants;
use crate::error::Result;

/// Something that lets the user edit a buffer.
pub trait Editor {
    /// Name used in commit messages.
    fn name(&self) -> &str;

    /// Edit `seed` and return the result. Blocks until the editor exits.
    fn edit(&self, seed: &[u8]) -> Result<Vec<u8>>;
}

/// Runs an editor command on a temp file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct External {
    command: String,
}

impl External {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Pick the editor: config first, then `$EDITOR`, then `editor` if it is on
    /// `PATH`, then `vi`.
    pub fn resolve(configured: Option<&str>) -> Self {
        if let Some(cmd) = configured.filter(|c| !c.trim().is_empty()) {
            return Self::new(cmd);
        }
        if let Ok(cmd) = std::env::var("EDITOR") {
            if !cmd.trim().is_empty() {
                return Self::new(cmd);
            }
        }
        if which::which("editor").is_ok() {
            return Self::new("editor");
        }
        Self::new(constants::DEFAULT_EDITOR)
    }
}

impl Editor for External {
    fn name(&self) -> &str {
        &self.command
    }

    fn edit(&self, seed: &[u8]) -> Result<Vec<u8>> {
        let mut parts = self.command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty editor command"))?;
        let program = which::which(program).map_err(|e| {
            io::Error::new(io::ErrorKind::NotFound, format!("{}: {}", program, e))
        })?;

        let mut file = tempfile::Builder::new()
            .prefix("coffer-")
            .suffix(".txt")
            .tempfile()?;
        file.write_all(seed)?;
        file.flush()?;

        debug!(editor = %program.display(), path = %file.path().display(), "launching editor");

        let status = Command::new(&program)
            .args(parts)
            .arg(file.path())
            .status()?;
        if !status.success() {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("editor exited with {}", status),
            )
            .into());
        }

        let content = std::fs::read(file.path())?;

        scrub(file.path(), content.len());

        Ok(content)
    }
}

/// Overwrite `len` bytes of plaintext at `path` with zeros before the temp
/// file is unlinked.
fn scrub(path: &Path, len: usize) -> bool {
    match std::fs::write(path, vec![0u8; len]) {
        Ok(()) => true,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to scrub editor buffer");
            false
        }
    }
}

/// Returns a fixed buffer and records every seed it was given.
#[derive(Debug)]
pub struct Canned {
    name: String,
    output: Option<Vec<u8>>,
    seeds: RefCell<Vec<Vec<u8>>>,
}

impl Canned {
    /// Editor that "saves" `output`.
    pub fn new(name: impl Into<String>, output: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            output: Some(output.into()),
            seeds: RefCell::new(Vec::new()),
        }
    }

    /// Editor that fails to launch.
    pub fn failing(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            output: None,
            seeds: RefCell::new(Vec::new()),
        }
    }

    /// Seeds passed to `edit`, in call order.
    pub fn seeds(&self) -> Vec<Vec<u8>> {
        self.seeds.borrow().clone()
    }
}

impl Editor for Canned {
    fn name(&self) -> &str {
        &self.name
    }

    fn edit(&self, seed: &[u8]) -> Result<Vec<u8>> {
        self.seeds.borrow_mut().push(seed.to_vec());
        self.output.clone().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{} not found", self.name)).into()
        })
    }
}
