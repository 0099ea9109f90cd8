//! Recipient resolution.
//!
//! Before a secret is encrypted, the store hands the recipient list to a
//! [`ResolveRecipients`] strategy. The insert command picks the strategy: the
//! checked one normally, [`AcceptAll`] when `--force` is given.

use tracing::debug;

use crate::core::cipher;
use crate::core::prompt::Prompter;
use crate::error::{Result, StoreError};

/// Decide which recipients a secret is encrypted for.
pub trait ResolveRecipients {
    /// Return the recipients to encrypt for.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is rejected.
    fn resolve(&self, name: &str, recipients: Vec<String>) -> Result<Vec<String>>;
}

/// Accept every requested recipient unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl ResolveRecipients for AcceptAll {
    fn resolve(&self, name: &str, recipients: Vec<String>) -> Result<Vec<String>> {
        debug!(name, count = recipients.len(), "accepting recipients unchecked");
        Ok(recipients)
    }
}

/// Require every recipient to be a valid age public key, optionally asking the
/// user to confirm the list.
pub struct CheckedRecipients<'a> {
    confirm: Option<&'a dyn Prompter>,
}

impl<'a> CheckedRecipients<'a> {
    /// Validate without asking.
    pub fn new() -> Self {
        Self { confirm: None }
    }

    /// Validate and ask the prompter to confirm the list.
    pub fn confirming(prompter: &'a dyn Prompter) -> Self {
        Self {
            confirm: Some(prompter),
        }
    }

    /// Whether the list is shown for confirmation.
    pub fn confirms(&self) -> bool {
        self.confirm.is_some()
    }
}

impl Default for CheckedRecipients<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolveRecipients for CheckedRecipients<'_> {
    fn resolve(&self, name: &str, recipients: Vec<String>) -> Result<Vec<String>> {
        if recipients.is_empty() {
            return Err(StoreError::NoRecipients.into());
        }
        for recipient in &recipients {
            cipher::parse_recipient(recipient)?;
        }

        if let Some(prompter) = self.confirm {
            let prompt = format!(
                "Encrypt '{}' for {} recipient(s)?\n  {}",
                name,
                recipients.len(),
                recipients.join("\n  ")
            );
            if !prompter.confirm(&prompt)? {
                return Err(StoreError::RecipientsRejected.into());
            }
        }

        debug!(name, count = recipients.len(), "recipients checked");
        Ok(recipients)
    }
}
