//! Constants used throughout coffer.
//!
//! Centralizes magic strings and configuration values.

/// Application directory name under the config and home directories.
pub const APP_DIR: &str = "coffer";

/// Configuration file name inside the config directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Store directory relative to HOME (~/.coffer/store).
pub const STORE_DIR: &str = ".coffer/store";

/// Identity file relative to HOME (~/.coffer/identity.key).
pub const IDENTITY_FILE: &str = ".coffer/identity.key";

/// Recipients file at the store root, one age public key per line.
pub const RECIPIENTS_FILE: &str = ".age-recipients";

/// Append-only commit log at the store root.
pub const COMMIT_LOG: &str = ".commits";

/// Template file looked up in a secret's directory and its parents.
pub const TEMPLATE_FILE: &str = ".pass-template";

/// Extension of encrypted secret files.
pub const SECRET_EXT: &str = "age";

/// Editor used when neither the config nor `$EDITOR` names one.
pub const DEFAULT_EDITOR: &str = "vi";

/// Environment variable overriding the config file location.
pub const ENV_CONFIG: &str = "COFFER_CONFIG";

/// Environment variable overriding the store root.
pub const ENV_STORE: &str = "COFFER_STORE";

/// Environment variable overriding the identity file.
pub const ENV_IDENTITY: &str = "COFFER_IDENTITY";

/// Environment variable holding the log filter.
pub const ENV_LOG: &str = "COFFER_LOG";

/// Set to `json` for JSON log lines.
pub const ENV_LOG_FORMAT: &str = "COFFER_LOG_FORMAT";
