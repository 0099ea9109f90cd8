//! Password strength audit.
//!
//! Inserted passwords are handed to a [`PasswordAudit`] after the secret is
//! built. Auditing never changes the secret or the control flow.

use tracing::warn;

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Could be stronger.
    Low,
    /// Weak.
    Medium,
    /// Trivially guessable.
    High,
}

/// A single weakness found in a password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub severity: Severity,
    pub message: &'static str,
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.severity, self.message)
    }
}

/// Receives plaintext passwords after they are inserted.
pub trait PasswordAudit {
    fn single(&self, password: &str);
}

/// Logs strength findings as warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Strength;

impl PasswordAudit for Strength {
    fn single(&self, password: &str) {
        for finding in check(password) {
            warn!(severity = ?finding.severity, "weak password: {}", finding.message);
        }
    }
}

const MIN_LENGTH: usize = 8;
const GOOD_LENGTH: usize = 14;

const COMMON: &[&str] = &[
    "123456", "12345678", "123456789", "password", "qwerty", "letmein", "admin", "welcome",
    "iloveyou", "monkey", "dragon", "abc123", "111111", "changeme",
];

/// Check a password and return findings, most severe first.
pub fn check(password: &str) -> Vec<Finding> {
    let mut findings = Vec::new();

    if password.is_empty() {
        findings.push(Finding {
            severity: Severity::High,
            message: "password is empty",
        });
        return findings;
    }

    let lower = password.to_lowercase();
    if COMMON.contains(&lower.as_str()) {
        findings.push(Finding {
            severity: Severity::High,
            message: "password is a commonly used password",
        });
    }

    let mut chars = password.chars();
    if let Some(first) = chars.next() {
        if password.chars().count() > 1 && chars.all(|c| c == first) {
            findings.push(Finding {
                severity: Severity::High,
                message: "password repeats a single character",
            });
        }
    }

    let length = password.chars().count();
    if length < MIN_LENGTH {
        findings.push(Finding {
            severity: Severity::Medium,
            message: "password is shorter than 8 characters",
        });
    } else if length < GOOD_LENGTH {
        findings.push(Finding {
            severity: Severity::Low,
            message: "password is shorter than 14 characters",
        });
    }

    let classes = [
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_ascii_alphanumeric()),
    ]
    .iter()
    .filter(|present| **present)
    .count();
    if classes < 3 {
        findings.push(Finding {
            severity: Severity::Low,
            message: "password uses fewer than three character classes",
        });
    }

    findings.sort_by(|a, b| b.severity.cmp(&a.severity));
    findings
}
