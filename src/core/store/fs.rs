//! Filesystem-backed secret store.
//!
//! Layout below the store root:
//!
//! ```text
//! .age-recipients        one age public key (or exported key name) per line
//! .public-keys/<n>.pub   exported public keys
//! .commits               append-only history: <rfc3339>\t<name>\t<message>
//! <name>.age             armored ciphertext per secret
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use age::x25519;
use tracing::{debug, warn};

use super::{validate_name, Commit, Store};
use crate::core::cipher::{self, Age, Cipher};
use crate::core::domain::Secret;
use crate::core::options::KeyImport;
use crate::core::{constants, keys};
use crate::error::{Result, StoreError};

const PUBLIC_KEYS_DIR: &str = ".public-keys";

/// One line of the commit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub timestamp: String,
    pub name: String,
    pub message: String,
}

/// Store keeping one encrypted file per secret.
pub struct Filesystem {
    root: PathBuf,
    identity: x25519::Identity,
    key_import: KeyImport,
}

impl std::fmt::Debug for Filesystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Filesystem")
            .field("root", &self.root)
            .field("key_import", &self.key_import)
            .finish_non_exhaustive()
    }
}

impl Filesystem {
    /// Create a store at `root`.
    ///
    /// Generates an identity at `identity_path` unless one already exists, and
    /// writes its public key as the first recipient. With `export_key`, the
    /// public key is also saved as `.public-keys/<user>.pub`.
    ///
    /// # Returns
    ///
    /// The recipient public key.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AlreadyInitialized` if `root` already holds a store.
    pub fn init(root: &Path, identity_path: &Path, user: &str, export_key: bool) -> Result<String> {
        let recipients_file = root.join(constants::RECIPIENTS_FILE);
        if recipients_file.exists() {
            return Err(StoreError::AlreadyInitialized(root.display().to_string()).into());
        }

        let public_key = if identity_path.exists() {
            keys::load(identity_path)?.to_public().to_string()
        } else {
            keys::generate(identity_path)?
        };

        fs::create_dir_all(root).map_err(|source| StoreError::WriteFailed {
            path: root.display().to_string(),
            source,
        })?;
        write_file(
            &recipients_file,
            format!("# {}\n{}\n", user, public_key).as_bytes(),
        )?;

        if export_key {
            let dir = root.join(PUBLIC_KEYS_DIR);
            fs::create_dir_all(&dir)?;
            write_file(&dir.join(format!("{}.pub", user)), format!("{}\n", public_key).as_bytes())?;
        }

        debug!(root = %root.display(), user, "store initialized");
        Ok(public_key)
    }

    /// Open an existing store.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotInitialized` when `root` has no recipients file
    /// and `StoreError::NoIdentity` when the identity is missing.
    pub fn open(root: &Path, identity_path: &Path, key_import: KeyImport) -> Result<Self> {
        if !root.join(constants::RECIPIENTS_FILE).exists() {
            return Err(StoreError::NotInitialized(root.display().to_string()).into());
        }
        let identity = keys::load(identity_path)?;
        debug!(root = %root.display(), "store opened");

        Ok(Self {
            root: root.to_path_buf(),
            identity,
            key_import,
        })
    }

    /// Store root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn secret_path(&self, name: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", name, constants::SECRET_EXT))
    }

    /// Recipients listed for the store.
    ///
    /// Entries that are not age keys name an exported key. They are replaced by
    /// the key from `.public-keys/` when key import is enabled and passed through
    /// untouched otherwise.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ReadFailed` if the recipients file is unreadable.
    pub fn recipients(&self) -> Result<Vec<String>> {
        let path = self.root.join(constants::RECIPIENTS_FILE);
        let contents = fs::read_to_string(&path).map_err(|source| StoreError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;

        let mut recipients = Vec::new();
        for entry in contents
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
        {
            if entry.starts_with("age1") || self.key_import == KeyImport::Disabled {
                recipients.push(entry.to_string());
                continue;
            }
            let exported = self.root.join(PUBLIC_KEYS_DIR).join(format!("{}.pub", entry));
            match fs::read_to_string(&exported) {
                Ok(key) => {
                    debug!(entry, "imported exported public key");
                    recipients.push(key.trim().to_string());
                }
                Err(_) => recipients.push(entry.to_string()),
            }
        }
        Ok(recipients)
    }

    /// The commit log, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ReadFailed` if the log exists but is unreadable.
    pub fn history(&self) -> Result<Vec<CommitRecord>> {
        let path = self.root.join(constants::COMMIT_LOG);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&path).map_err(|source| StoreError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;

        Ok(contents
            .lines()
            .filter_map(|line| {
                let mut parts = line.splitn(3, '\t');
                Some(CommitRecord {
                    timestamp: parts.next()?.to_string(),
                    name: parts.next()?.to_string(),
                    message: parts.next()?.to_string(),
                })
            })
            .collect())
    }

    fn open_commit_log(&self) -> Result<fs::File> {
        let path = self.root.join(constants::COMMIT_LOG);
        let log = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| StoreError::WriteFailed {
                path: path.display().to_string(),
                source,
            })?;
        Ok(log)
    }
}

/// Append one history line. The secret is already in place, so a failure here
/// is only logged.
fn record_commit(log: &mut fs::File, name: &str, message: &str) {
    let line = format!(
        "{}\t{}\t{}\n",
        chrono::Utc::now().to_rfc3339(),
        name,
        message.replace(['\t', '\n'], " ")
    );
    if let Err(e) = log.write_all(line.as_bytes()) {
        warn!(name, error = %e, "failed to record commit");
    }
}

impl Store for Filesystem {
    fn exists(&self, name: &str) -> bool {
        validate_name(name).is_ok() && self.secret_path(name).is_file()
    }

    fn get(&self, name: &str) -> Result<Secret> {
        validate_name(name)?;
        let path = self.secret_path(name);
        if !path.is_file() {
            return Err(StoreError::NotFound(name.to_string()).into());
        }

        let armored = fs::read_to_string(&path).map_err(|source| StoreError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        let plaintext = Age.decrypt(&armored, &self.identity)?;

        match Secret::parse(&plaintext) {
            Ok(secret) => Ok(secret),
            Err(malformed) => {
                warn!(name, error = %malformed.error, "stored secret is malformed");
                Ok(malformed.best_effort)
            }
        }
    }

    fn set(&mut self, name: &str, secret: &Secret, commit: &Commit<'_>) -> Result<()> {
        validate_name(name)?;

        let requested = self.recipients()?;
        let resolved = commit.recipients.resolve(name, requested)?;
        let recipients: Vec<x25519::Recipient> = resolved
            .iter()
            .filter_map(|r| match cipher::parse_recipient(r) {
                Ok(recipient) => Some(recipient),
                Err(e) => {
                    warn!(recipient = %r, error = %e, "skipping recipient");
                    None
                }
            })
            .collect();
        if recipients.is_empty() {
            return Err(StoreError::NoRecipients.into());
        }

        let plaintext = zeroize::Zeroizing::new(secret.bytes()?);
        let armored = Age.encrypt(&plaintext, &recipients)?;

        let path = self.secret_path(name);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| StoreError::WriteFailed {
                path: dir.display().to_string(),
                source,
            })?;
        }
        let mut log = self.open_commit_log()?;
        write_file(&path, armored.as_bytes())?;
        record_commit(&mut log, name, &commit.message);

        debug!(name, recipients = recipients.len(), message = %commit.message, "secret written");
        Ok(())
    }
}

/// Write through a sibling temp file and rename, so readers never see a
/// partial file.
fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    let failed = |source| StoreError::WriteFailed {
        path: path.display().to_string(),
        source,
    };
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(failed)?;
    tmp.write_all(contents).map_err(failed)?;
    tmp.persist(path).map_err(|e| failed(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::recipient::{AcceptAll, CheckedRecipients};
    use tempfile::TempDir;

    struct Fixture {
        _tmp: TempDir,
        root: PathBuf,
        identity: PathBuf,
    }

    fn fixture() -> Fixture {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("store");
        let identity = tmp.path().join("identity.key");
        Filesystem::init(&root, &identity, "alice", true).unwrap();
        Fixture {
            _tmp: tmp,
            root,
            identity,
        }
    }

    fn commit<'a>(message: &str, recipients: &'a dyn crate::core::recipient::ResolveRecipients) -> Commit<'a> {
        Commit {
            message: message.to_string(),
            recipients,
        }
    }

    #[test]
    fn test_set_get_roundtrip() {
        let f = fixture();
        let mut store = Filesystem::open(&f.root, &f.identity, KeyImport::Enabled).unwrap();

        let mut secret = Secret::with_password("hunter2");
        secret.set_value("user", "alice").unwrap();
        store
            .set("web/example.com", &secret, &commit("test", &CheckedRecipients::new()))
            .unwrap();

        assert!(store.exists("web/example.com"));
        assert_eq!(store.get("web/example.com").unwrap(), secret);

        let raw = fs::read_to_string(f.root.join("web/example.com.age")).unwrap();
        assert!(!raw.contains("hunter2"));
    }

    #[test]
    fn test_commit_log_records_messages() {
        let f = fixture();
        let mut store = Filesystem::open(&f.root, &f.identity, KeyImport::Enabled).unwrap();

        let secret = Secret::with_password("pw");
        store.set("a", &secret, &commit("first", &AcceptAll)).unwrap();
        store.set("b", &secret, &commit("second\nline", &AcceptAll)).unwrap();

        let history = store.history().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].name, "a");
        assert_eq!(history[0].message, "first");
        assert_eq!(history[1].message, "second line");
    }

    #[test]
    fn test_unwritable_commit_log_leaves_store_unchanged() {
        let f = fixture();
        let mut store = Filesystem::open(&f.root, &f.identity, KeyImport::Enabled).unwrap();
        fs::create_dir(f.root.join(constants::COMMIT_LOG)).unwrap();

        let result = store.set("web", &Secret::with_password("pw"), &commit("first", &AcceptAll));

        assert!(matches!(
            result,
            Err(crate::error::Error::Store(StoreError::WriteFailed { .. }))
        ));
        assert!(!store.exists("web"));
    }

    #[test]
    fn test_missing_secret_is_not_found() {
        let f = fixture();
        let store = Filesystem::open(&f.root, &f.identity, KeyImport::Enabled).unwrap();

        assert!(!store.exists("nope"));
        assert!(matches!(
            store.get("nope"),
            Err(crate::error::Error::Store(StoreError::NotFound(_)))
        ));
    }

    #[test]
    fn test_init_twice_fails() {
        let f = fixture();
        assert!(Filesystem::init(&f.root, &f.identity, "alice", false).is_err());
    }

    #[test]
    fn test_open_uninitialized_fails() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            Filesystem::open(tmp.path(), &tmp.path().join("id"), KeyImport::Enabled),
            Err(crate::error::Error::Store(StoreError::NotInitialized(_)))
        ));
    }

    #[test]
    fn test_named_recipient_resolves_with_import() {
        let f = fixture();
        let recipients_file = f.root.join(constants::RECIPIENTS_FILE);
        fs::write(&recipients_file, "alice\n").unwrap();

        let store = Filesystem::open(&f.root, &f.identity, KeyImport::Enabled).unwrap();
        let recipients = store.recipients().unwrap();
        assert!(recipients[0].starts_with("age1"));

        let store = Filesystem::open(&f.root, &f.identity, KeyImport::Disabled).unwrap();
        assert_eq!(store.recipients().unwrap(), vec!["alice".to_string()]);
    }

    #[test]
    fn test_checked_recipients_reject_unknown_entry() {
        let f = fixture();
        let recipients_file = f.root.join(constants::RECIPIENTS_FILE);
        let mut contents = fs::read_to_string(&recipients_file).unwrap();
        contents.push_str("bob\n");
        fs::write(&recipients_file, contents).unwrap();

        let mut store = Filesystem::open(&f.root, &f.identity, KeyImport::Enabled).unwrap();
        let secret = Secret::with_password("pw");

        assert!(store
            .set("a", &secret, &commit("checked", &CheckedRecipients::new()))
            .is_err());
        assert!(!store.exists("a"));

        store.set("a", &secret, &commit("forced", &AcceptAll)).unwrap();
        assert_eq!(store.get("a").unwrap().password(), "pw");
    }
}
