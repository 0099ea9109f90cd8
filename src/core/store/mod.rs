//! Secret storage.
//!
//! The insert logic only needs three operations from a store, captured by the
//! [`Store`] trait. Every write travels with a [`Commit`]: a message for the
//! store's history and the recipient strategy chosen by the caller.
//!
//! ## Implementations
//!
//! - [`Filesystem`]: one age-armored file per secret plus a commit log
//! - [`Memory`]: in-process map, for tests and dry runs

use crate::core::domain::Secret;
use crate::core::recipient::ResolveRecipients;
use crate::error::{Result, StoreError};

mod fs;
mod memory;

pub use fs::{CommitRecord, Filesystem};
pub use memory::{Memory, Recorded};

/// Metadata accompanying a single write.
pub struct Commit<'a> {
    /// History message describing how the secret was produced.
    pub message: String,
    /// Strategy deciding who the secret is encrypted for.
    pub recipients: &'a dyn ResolveRecipients,
}

impl std::fmt::Debug for Commit<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Commit")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// Secret store gateway.
pub trait Store {
    /// Whether a secret named `name` exists.
    fn exists(&self, name: &str) -> bool;

    /// Load and decrypt a secret.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for unknown names and `CipherError` when
    /// decryption fails.
    fn get(&self, name: &str) -> Result<Secret>;

    /// Encrypt and persist a secret. Must be atomic per name.
    ///
    /// # Errors
    ///
    /// Returns an error if recipient resolution, encryption or the write fails.
    fn set(&mut self, name: &str, secret: &Secret, commit: &Commit<'_>) -> Result<()>;
}

/// Validate a secret name.
///
/// Names are `/`-separated relative paths. Components may not be empty, `.`,
/// `..`, or start with a dot (dot files are reserved for store metadata).
///
/// # Errors
///
/// Returns `StoreError::InvalidName` describing the first problem found.
pub fn validate_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| -> crate::error::Error {
        StoreError::InvalidName {
            name: name.to_string(),
            reason: reason.to_string(),
        }
        .into()
    };

    if name.trim().is_empty() {
        return Err(invalid("name cannot be empty"));
    }
    if name.starts_with('/') {
        return Err(invalid("name must be relative"));
    }
    for component in name.split('/') {
        if component.is_empty() {
            return Err(invalid("empty path component"));
        }
        if component.starts_with('.') {
            return Err(invalid("components cannot start with '.'"));
        }
        if component.contains('\\') || component.contains('\0') {
            return Err(invalid("invalid character in name"));
        }
    }
    Ok(())
}
