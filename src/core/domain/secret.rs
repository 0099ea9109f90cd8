//! Secret type.
//!
//! A secret is stored as UTF-8 text:
//!
//! ```text
//! <password>
//! <free-form notes>
//! ---
//! <YAML mapping of scalar fields>
//! ```
//!
//! Notes and fields are both optional. Parsing is lenient: malformed input is
//! reported through [`Malformed`], which still carries a usable secret.

use serde_yaml::{Mapping, Value};
use thiserror::Error;
use zeroize::Zeroize;

use crate::error::SecretError;

/// Line separating free-form notes from structured fields.
const SEPARATOR: &str = "---";

/// A decrypted secret.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secret {
    password: String,
    notes: Option<String>,
    fields: Vec<(String, String)>,
}

/// Parse failure that still produced a usable secret.
///
/// The best-effort secret keeps the first line as password and the complete
/// remainder as notes, so it serializes back to the original text.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct Malformed {
    pub best_effort: Secret,
    pub error: SecretError,
}

impl Secret {
    /// Create an empty secret.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a secret holding only a password.
    pub fn with_password(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            notes: None,
            fields: Vec::new(),
        }
    }

    /// Parse a secret from its byte representation.
    ///
    /// # Errors
    ///
    /// Returns [`Malformed`] when the bytes are not UTF-8 or the structured
    /// section is not a YAML mapping of scalars. The error carries a best-effort
    /// secret that callers may persist anyway.
    pub fn parse(bytes: &[u8]) -> std::result::Result<Self, Malformed> {
        let text = match std::str::from_utf8(bytes) {
            Ok(text) => text,
            Err(_) => {
                let lossy = String::from_utf8_lossy(bytes);
                return Err(Malformed {
                    best_effort: Self::best_effort(&lossy),
                    error: SecretError::InvalidUtf8,
                });
            }
        };

        Self::parse_str(text).map_err(|error| Malformed {
            best_effort: Self::best_effort(text),
            error,
        })
    }

    fn parse_str(text: &str) -> std::result::Result<Self, SecretError> {
        let (password, rest) = split_first_line(text);
        let (notes, structured) = split_body(rest);

        let fields = match structured {
            Some(yaml) if !yaml.trim().is_empty() => parse_fields(yaml)?,
            _ => Vec::new(),
        };

        Ok(Self {
            password: password.to_string(),
            notes: (!notes.is_empty()).then(|| notes.to_string()),
            fields,
        })
    }

    fn best_effort(text: &str) -> Self {
        let (password, rest) = split_first_line(text);
        Self {
            password: password.to_string(),
            notes: (!rest.is_empty()).then(|| rest.to_string()),
            fields: Vec::new(),
        }
    }

    /// Serialize to the on-disk text format.
    ///
    /// # Errors
    ///
    /// Returns `SecretError::Encode` if the fields cannot be rendered as YAML.
    pub fn bytes(&self) -> std::result::Result<Vec<u8>, SecretError> {
        let mut out = String::with_capacity(self.password.len() + 1);
        out.push_str(&self.password);
        out.push('\n');

        if let Some(notes) = &self.notes {
            out.push_str(notes);
            if !notes.ends_with('\n') {
                out.push('\n');
            }
        }

        if !self.fields.is_empty() {
            let mapping: Mapping = self
                .fields
                .iter()
                .map(|(k, v)| (Value::String(k.clone()), Value::String(v.clone())))
                .collect();
            let yaml =
                serde_yaml::to_string(&mapping).map_err(|e| SecretError::Encode(e.to_string()))?;
            out.push_str(SEPARATOR);
            out.push('\n');
            out.push_str(&yaml);
        }

        Ok(out.into_bytes())
    }

    /// The password (first line).
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Replace the password.
    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password.zeroize();
        self.password = password.into();
    }

    /// Free-form notes between the password and the structured fields.
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Value of a structured field.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Structured field names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Structured fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Set a structured field, replacing any previous value in place.
    ///
    /// # Errors
    ///
    /// Returns `SecretError::InvalidKey` for an empty key, and
    /// `SecretError::MalformedBody` when the notes still hold an unparsed
    /// structured section that the new field would be appended after.
    pub fn set_value(&mut self, key: &str, value: impl Into<String>) -> Result<(), SecretError> {
        if key.trim().is_empty() {
            return Err(SecretError::InvalidKey {
                key: key.to_string(),
                reason: "key cannot be empty",
            });
        }
        if self.notes.as_deref().is_some_and(has_separator) {
            return Err(SecretError::MalformedBody);
        }
        self.put(key, value.into());
        Ok(())
    }

    fn put(&mut self, key: &str, value: String) {
        match self.fields.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => {
                existing.zeroize();
                *existing = value;
            }
            None => self.fields.push((key.to_string(), value)),
        }
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        self.password.zeroize();
        if let Some(notes) = self.notes.as_mut() {
            notes.zeroize();
        }
        for (_, value) in self.fields.iter_mut() {
            value.zeroize();
        }
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secret")
            .field("password", &"<redacted>")
            .field("notes", &self.notes.as_ref().map(|n| n.len()))
            .field("keys", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn split_first_line(text: &str) -> (&str, &str) {
    match text.split_once('\n') {
        Some((first, rest)) => (first.strip_suffix('\r').unwrap_or(first), rest),
        None => (text, ""),
    }
}

/// Split the body at the first separator line into notes and YAML.
fn split_body(rest: &str) -> (&str, Option<&str>) {
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if is_separator(line) {
            return (&rest[..offset], Some(&rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    (rest, None)
}

fn is_separator(line: &str) -> bool {
    line.trim_end_matches(['\r', '\n']) == SEPARATOR
}

fn has_separator(text: &str) -> bool {
    text.split_inclusive('\n').any(is_separator)
}

fn parse_fields(yaml: &str) -> Result<Vec<(String, String)>, SecretError> {
    let value: Value =
        serde_yaml::from_str(yaml).map_err(|e| SecretError::InvalidYaml(e.to_string()))?;
    let Value::Mapping(mapping) = value else {
        return Err(SecretError::NotAMapping);
    };

    let mut fields = Vec::with_capacity(mapping.len());
    for (key, value) in mapping {
        let key = scalar(&key).ok_or(SecretError::NotAMapping)?;
        let value = scalar(&value).ok_or_else(|| SecretError::NonScalar(key.clone()))?;
        fields.push((key, value));
    }
    Ok(fields)
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}
