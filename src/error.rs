//! Error types.
//!
//! One `thiserror` enum per concern, folded into [`Error`]. Every error maps to a
//! stable process exit code through [`Error::exit_code`].

use thiserror::Error;

/// Process exit codes surfaced to the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Unknown = 1,
    Aborted = 3,
    NotInitialized = 6,
    NoName = 9,
    NotFound = 10,
    Decrypt = 11,
    Encrypt = 12,
    Config = 16,
    Io = 18,
}

impl ExitCode {
    /// Numeric code passed to `std::process::exit`.
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Secret(#[from] SecretError),

    #[error(transparent)]
    Insert(#[from] InsertError),

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Exit code for this error.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Error::Insert(e) => e.exit_code(),
            Error::Config(_) => ExitCode::Config,
            Error::Store(StoreError::NotInitialized(_)) | Error::Store(StoreError::NoIdentity(_)) => {
                ExitCode::NotInitialized
            }
            Error::Store(StoreError::NotFound(_)) => ExitCode::NotFound,
            Error::Store(_) => ExitCode::Unknown,
            Error::Cipher(CipherError::DecryptionFailed(_)) => ExitCode::Decrypt,
            Error::Cipher(_) => ExitCode::Encrypt,
            Error::Secret(_) => ExitCode::Unknown,
            Error::Prompt(_) | Error::Io(_) => ExitCode::Io,
        }
    }
}

/// Configuration file errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("unable to determine {0} directory")]
    NoDirectory(&'static str),

    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Secret store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("no store found at {0}")]
    NotInitialized(String),

    #[error("store already initialized at {0}")]
    AlreadyInitialized(String),

    #[error("no identity found at {0}")]
    NoIdentity(String),

    #[error("entry not found: {0}")]
    NotFound(String),

    #[error("invalid secret name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("no recipients configured")]
    NoRecipients,

    #[error("recipients rejected")]
    RecipientsRejected,

    #[error("failed to read {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Encryption errors.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("armor failed: {0}")]
    ArmorFailed(String),

    #[error("invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("invalid identity: {0}")]
    InvalidIdentity(String),
}

/// Secret content errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecretError {
    #[error("secret is not valid UTF-8")]
    InvalidUtf8,

    #[error("invalid YAML: {0}")]
    InvalidYaml(String),

    #[error("YAML body is not a mapping")]
    NotAMapping,

    #[error("value of '{0}' is not a scalar")]
    NonScalar(String),

    #[error("invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: &'static str },

    #[error("secret body holds malformed structured data")]
    MalformedBody,

    #[error("failed to encode secret: {0}")]
    Encode(String),
}

/// Failures of the insert command, one variant per exit class.
#[derive(Error, Debug)]
pub enum InsertError {
    #[error("usage: coffer insert <name> [key] [key=value...]")]
    NoName,

    #[error("failed to copy after {read} bytes: {source}")]
    Io {
        read: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to ask for {what}: {source}")]
    Prompt {
        what: String,
        #[source]
        source: Box<Error>,
    },

    #[error("failed to decrypt existing secret '{name}': {source}")]
    Decrypt {
        name: String,
        #[source]
        source: Box<Error>,
    },

    #[error("failed to read key '{key}' of '{name}': {source}")]
    DecryptKey {
        key: String,
        name: String,
        #[source]
        source: Box<Error>,
    },

    #[error("failed to set key '{key}' of '{name}': {source}")]
    SetKey {
        key: String,
        name: String,
        #[source]
        source: SecretError,
    },

    #[error("failed to write secret '{name}': {source}")]
    Encrypt {
        name: String,
        #[source]
        source: Box<Error>,
    },

    #[error("not overwriting your current secret")]
    Aborted,

    #[error("failed to start editor: {source}")]
    Editor {
        #[source]
        source: Box<Error>,
    },
}

impl InsertError {
    /// Exit code for this failure.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            InsertError::NoName => ExitCode::NoName,
            InsertError::Io { .. } | InsertError::Prompt { .. } => ExitCode::Io,
            InsertError::Decrypt { .. } | InsertError::DecryptKey { .. } => ExitCode::Decrypt,
            InsertError::SetKey { .. } | InsertError::Encrypt { .. } => ExitCode::Encrypt,
            InsertError::Aborted => ExitCode::Aborted,
            InsertError::Editor { .. } => ExitCode::Unknown,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
