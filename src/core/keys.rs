//! Identity key generation and storage.
//!
//! The age identity (private key) lives in a single file, by default
//! `~/.coffer/identity.key`, with 0600 permissions on Unix.

use std::fs;
use std::path::{Path, PathBuf};

use age::x25519;
use tracing::{debug, warn};

use crate::core::{cipher, constants};
use crate::error::{ConfigError, Result, StoreError};

/// Default identity location.
///
/// `$COFFER_IDENTITY` wins over `~/.coffer/identity.key`.
///
/// # Errors
///
/// Returns `ConfigError::NoDirectory` if HOME cannot be determined.
pub fn identity_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(constants::ENV_IDENTITY) {
        return Ok(PathBuf::from(path));
    }
    let home = dirs::home_dir().ok_or(ConfigError::NoDirectory("home"))?;
    Ok(home.join(constants::IDENTITY_FILE))
}

/// Generate a new identity at `path` and return its public key.
///
/// # Errors
///
/// Returns `StoreError::WriteFailed` if the key file cannot be written.
pub fn generate(path: &Path) -> Result<String> {
    let identity = x25519::Identity::generate();
    let public_key = identity.to_public().to_string();

    let write_failed = |source| StoreError::WriteFailed {
        path: path.display().to_string(),
        source,
    };

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(write_failed)?;
    }

    use age::secrecy::ExposeSecret;
    let secret = identity.to_string();
    fs::write(path, format!("{}\n", secret.expose_secret())).map_err(write_failed)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(write_failed)?;
    }

    debug!(path = %path.display(), "identity generated");
    Ok(public_key)
}

/// Load the identity stored at `path`.
///
/// # Errors
///
/// Returns `StoreError::NoIdentity` if the file is missing and
/// `CipherError::InvalidIdentity` if it does not hold an age key.
pub fn load(path: &Path) -> Result<x25519::Identity> {
    if !path.exists() {
        return Err(StoreError::NoIdentity(path.display().to_string()).into());
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(metadata) = fs::metadata(path) {
            let mode = metadata.permissions().mode() & 0o777;
            if mode & 0o077 != 0 {
                warn!(
                    path = %path.display(),
                    mode = %format!("{:o}", mode),
                    "identity file is readable by others; run chmod 600"
                );
            }
        }
    }

    let contents = fs::read_to_string(path).map_err(|source| StoreError::ReadFailed {
        path: path.display().to_string(),
        source,
    })?;

    let key = contents
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#'))
        .unwrap_or_default();
    cipher::parse_identity(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_generate_then_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("keys").join("identity.key");

        let public_key = generate(&path).unwrap();
        let identity = load(&path).unwrap();

        assert!(public_key.starts_with("age1"));
        assert_eq!(identity.to_public().to_string(), public_key);
    }

    #[cfg(unix)]
    #[test]
    fn test_generated_key_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("identity.key");
        generate(&path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }

    #[test]
    fn test_missing_identity() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            load(&tmp.path().join("missing.key")),
            Err(crate::error::Error::Store(StoreError::NoIdentity(_)))
        ));
    }

    #[test]
    fn test_comments_are_skipped() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("identity.key");
        let identity = x25519::Identity::generate();
        use age::secrecy::ExposeSecret;
        fs::write(
            &path,
            format!("# created by coffer\n{}\n", identity.to_string().expose_secret()),
        )
        .unwrap();

        assert_eq!(
            load(&path).unwrap().to_public().to_string(),
            identity.to_public().to_string()
        );
    }
}
