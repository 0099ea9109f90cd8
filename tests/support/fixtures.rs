//! Test fixtures and constants.

/// A valid age public key for recipient tests.
pub const BOB_PUBLIC_KEY: &str = "age1ql3z7hjy54pw3hyww5ayyfg7zqgvc7w3j2elw8zmrj2kg5sfn9aqmcac8p";

/// An invalid public key for negative tests.
pub const INVALID_PUBLIC_KEY: &str = "not-a-valid-age-key";

/// A secret with notes and structured fields.
pub const FULL_SECRET: &str = "hunter2\nsecurity question: first pet\n---\nuser: alice\nurl: https://example.com\n";

/// A secret whose structured section does not parse.
pub const MALFORMED_SECRET: &str = "hunter2\n---\nuser: [unclosed\n";

/// Exit codes the binary reports.
pub mod exit {
    pub const UNKNOWN: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const ABORTED: i32 = 3;
    pub const NOT_INITIALIZED: i32 = 6;
    pub const NO_NAME: i32 = 9;
    pub const NOT_FOUND: i32 = 10;
    pub const ENCRYPT: i32 = 12;
    pub const CONFIG: i32 = 16;
    pub const IO: i32 = 18;
}
