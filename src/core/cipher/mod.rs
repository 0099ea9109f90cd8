//! Cryptographic operations.
//!
//! Secrets are encrypted with age x25519 keys and stored ASCII-armored. The
//! [`Cipher`] trait keeps the store independent of the backend.

use crate::error::Result;

mod age;

pub use self::age::{parse_identity, parse_recipient, Age};

/// Cryptographic backend trait.
pub trait Cipher {
    /// Type representing a recipient public key.
    type Recipient;

    /// Type representing a private identity/key.
    type Identity;

    /// Encrypt plaintext for every recipient.
    ///
    /// # Errors
    ///
    /// Returns `CipherError` if encryption fails.
    fn encrypt(&self, plaintext: &[u8], recipients: &[Self::Recipient]) -> Result<String>;

    /// Decrypt armored ciphertext with a private identity.
    ///
    /// # Errors
    ///
    /// Returns `CipherError` if decryption fails.
    fn decrypt(&self, encrypted: &str, identity: &Self::Identity) -> Result<Vec<u8>>;
}
