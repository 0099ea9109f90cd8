//! Secret mutations shared by the insert paths.

use std::collections::BTreeMap;

use tracing::warn;

use crate::core::domain::Secret;
use crate::error::SecretError;

/// Overwrite every metadata key on `secret`.
///
/// # Errors
///
/// Returns the offending key with the secret's error, for an empty key or a
/// body whose structured section did not parse.
pub fn apply_metadata<'m>(
    secret: &mut Secret,
    metadata: &'m BTreeMap<String, String>,
) -> Result<(), (&'m str, SecretError)> {
    for (key, value) in metadata {
        secret
            .set_value(key, value.clone())
            .map_err(|e| (key.as_str(), e))?;
    }
    Ok(())
}

/// Serialized `existing` followed by `content`, unmerged.
///
/// # Errors
///
/// Returns `SecretError::Encode` if `existing` cannot be serialized.
pub fn append_content(existing: &Secret, content: &[u8]) -> Result<Vec<u8>, SecretError> {
    let mut bytes = existing.bytes()?;
    bytes.extend_from_slice(content);
    Ok(bytes)
}

/// Parse `bytes`, falling back to the best-effort secret.
///
/// A parse failure is pushed onto `warnings` and logged; it never fails.
pub fn parse_lenient(bytes: &[u8], warnings: &mut Vec<String>) -> Secret {
    match Secret::parse(bytes) {
        Ok(secret) => secret,
        Err(malformed) => {
            warn!(error = %malformed.error, "invalid YAML in secret body");
            warnings.push(format!("Invalid YAML: {}", malformed.error));
            malformed.best_effort
        }
    }
}

/// Set structured field `key` from raw bytes.
///
/// Bytes are taken as-is, including any trailing newline; invalid UTF-8 is
/// replaced.
///
/// # Errors
///
/// Returns the secret's error for invalid keys or an unparsed body.
pub fn set_key(secret: &mut Secret, key: &str, value: &[u8]) -> Result<(), SecretError> {
    secret.set_value(key, String::from_utf8_lossy(value).into_owned())
}
