//! In-memory store.

use std::collections::{BTreeMap, BTreeSet};

use super::{validate_name, Commit, Store};
use crate::core::domain::Secret;
use crate::error::{CipherError, Result, StoreError};

/// A write recorded by [`Memory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub name: String,
    pub message: String,
    pub recipients: Vec<String>,
}

/// Store holding serialized secrets in a map.
///
/// Secrets are kept in their serialized form so reads go through the same
/// lenient parse as the filesystem store.
#[derive(Debug, Default)]
pub struct Memory {
    entries: BTreeMap<String, Vec<u8>>,
    recipients: Vec<String>,
    unreadable: BTreeSet<String>,
    commits: Vec<Recorded>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recipients handed to the resolver on each write.
    pub fn with_recipients(mut self, recipients: Vec<String>) -> Self {
        self.recipients = recipients;
        self
    }

    /// Put raw content under `name` without a commit.
    pub fn insert_raw(&mut self, name: &str, content: impl Into<Vec<u8>>) {
        self.entries.insert(name.to_string(), content.into());
    }

    /// Raw serialized content of `name`.
    pub fn raw(&self, name: &str) -> Option<&[u8]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    /// Make reads of `name` fail as if decryption failed.
    pub fn unreadable(mut self, name: &str) -> Self {
        self.unreadable.insert(name.to_string());
        self
    }

    /// Writes so far, oldest first.
    pub fn commits(&self) -> &[Recorded] {
        &self.commits
    }
}

impl Store for Memory {
    fn exists(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    fn get(&self, name: &str) -> Result<Secret> {
        if self.unreadable.contains(name) {
            return Err(CipherError::DecryptionFailed(format!("{} is unreadable", name)).into());
        }
        let raw = self
            .entries
            .get(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        Ok(Secret::parse(raw).unwrap_or_else(|malformed| malformed.best_effort))
    }

    fn set(&mut self, name: &str, secret: &Secret, commit: &Commit<'_>) -> Result<()> {
        validate_name(name)?;
        let recipients = commit.recipients.resolve(name, self.recipients.clone())?;
        let bytes = secret.bytes()?;

        self.entries.insert(name.to_string(), bytes);
        self.commits.push(Recorded {
            name: name.to_string(),
            message: commit.message.clone(),
            recipients,
        });
        Ok(())
    }
}
