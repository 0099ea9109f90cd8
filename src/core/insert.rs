//! The insert decision engine.
//!
//! [`Inserter::insert`] picks exactly one way of producing the new secret, in
//! this order:
//!
//! 1. a structured key was given: set that key (prompting when interactive)
//! 2. stdin is piped: store (or append) the piped content
//! 3. the secret exists and `--force` is off: ask before overwriting
//! 4. `--multiline` in an interactive session: open the editor
//! 5. otherwise: ask for a password
//!
//! Every path performs at most one store write and labels it with its own
//! commit message.

use std::collections::BTreeMap;
use std::io::Read;

use tracing::debug;
use zeroize::Zeroizing;

use crate::core::audit::PasswordAudit;
use crate::core::domain::Secret;
use crate::core::editor::Editor;
use crate::core::input::{read_piped, Session};
use crate::core::mutate;
use crate::core::prompt::Prompter;
use crate::core::recipient::{AcceptAll, CheckedRecipients, ResolveRecipients};
use crate::core::store::{Commit, Store};
use crate::core::template::TemplateRenderer;
use crate::error::{Error, InsertError, Result};

const MSG_YAML: &str = "Inserted YAML value from STDIN";
const MSG_STDIN: &str = "Read secret from STDIN";
const MSG_PASSWORD: &str = "Inserted user supplied password";

/// What the user asked to insert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertRequest {
    pub name: String,
    /// Structured key to set instead of the password.
    pub key: Option<String>,
    /// Ask for the password with a visible prompt.
    pub echo: bool,
    /// Use the editor for multi-line input.
    pub multiline: bool,
    /// Overwrite without asking and skip recipient checks.
    pub force: bool,
    /// Append piped input to the existing secret.
    pub append: bool,
    /// Fields written onto the secret.
    pub metadata: BTreeMap<String, String>,
}

impl InsertRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Which path produced the secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPath {
    YamlKey,
    Stdin,
    Multiline,
    Password,
}

/// Result of a successful insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertOutcome {
    pub name: String,
    pub path: InsertPath,
    /// Commit message recorded with the write.
    pub message: String,
    /// Non-fatal problems, e.g. malformed YAML that was stored anyway.
    pub warnings: Vec<String>,
}

/// Runs inserts against a store.
pub struct Inserter<'a> {
    store: &'a mut dyn Store,
    prompter: &'a dyn Prompter,
    editor: &'a dyn Editor,
    audit: &'a dyn PasswordAudit,
    templates: &'a dyn TemplateRenderer,
    recipients: Option<&'a dyn ResolveRecipients>,
    session: Session,
}

impl<'a> Inserter<'a> {
    /// Create an inserter.
    ///
    /// Recipients are checked with [`CheckedRecipients`] unless another
    /// resolver is set with [`Inserter::recipients`].
    pub fn new(
        store: &'a mut dyn Store,
        prompter: &'a dyn Prompter,
        editor: &'a dyn Editor,
        audit: &'a dyn PasswordAudit,
        templates: &'a dyn TemplateRenderer,
        session: Session,
    ) -> Self {
        Self {
            store,
            prompter,
            editor,
            audit,
            templates,
            recipients: None,
            session,
        }
    }

    /// Resolver used for writes that are not forced.
    pub fn recipients(mut self, resolver: &'a dyn ResolveRecipients) -> Self {
        self.recipients = Some(resolver);
        self
    }

    /// Insert or update one secret.
    ///
    /// # Arguments
    ///
    /// * `request` - Name, flags and metadata
    /// * `stdin` - Read completely when the session says stdin is piped
    ///
    /// # Errors
    ///
    /// Returns an [`InsertError`] naming the failure class. Declined
    /// confirmations and refused overwrites are `InsertError::Aborted` and leave
    /// the store untouched.
    pub fn insert(&mut self, request: InsertRequest, stdin: &mut dyn Read) -> Result<InsertOutcome> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(InsertError::NoName.into());
        }

        let checked = CheckedRecipients::new();
        let recipients: &dyn ResolveRecipients = if request.force {
            debug!(name, "force given, accepting recipients unchecked");
            &AcceptAll
        } else {
            match self.recipients {
                Some(resolver) => resolver,
                None => &checked,
            }
        };

        let content = Zeroizing::new(if self.session.stdin_piped {
            read_piped(stdin)?
        } else {
            Vec::new()
        });

        if let Some(key) = request.key.as_deref().filter(|k| !k.is_empty()) {
            debug!(name, key, "inserting structured value");
            return self.yaml_key(name, key, content, &request.metadata, recipients);
        }

        let exists = self.store.exists(name);

        if self.session.stdin_piped {
            if exists && !request.force && !request.append {
                debug!(name, "secret exists, refusing to overwrite from stdin");
                return Err(InsertError::Aborted.into());
            }
            debug!(name, append = request.append, "inserting from stdin");
            return self.from_stdin(name, &content, exists && request.append, recipients);
        }

        if exists && !request.force {
            let prompt = format!("An entry already exists for {}. Overwrite it?", name);
            let overwrite = self
                .prompter
                .confirm(&prompt)
                .map_err(|e| prompt_failed("confirmation", e))?;
            if !overwrite {
                return Err(InsertError::Aborted.into());
            }
        }

        if request.multiline && self.session.interactive {
            debug!(name, editor = self.editor.name(), "inserting with editor");
            return self.from_editor(name, exists, recipients);
        }

        let password = Zeroizing::new(
            if request.echo {
                self.prompter.ask_string(&format!("Enter password for {}", name), "")
            } else {
                self.prompter.ask_password(name)
            }
            .map_err(|e| prompt_failed("password", e))?,
        );
        self.single(name, &password, exists, &request.metadata, recipients)
    }

    fn yaml_key(
        &mut self,
        name: &str,
        key: &str,
        content: Zeroizing<Vec<u8>>,
        metadata: &BTreeMap<String, String>,
        recipients: &dyn ResolveRecipients,
    ) -> Result<InsertOutcome> {
        let value = if self.session.interactive {
            let answer = self
                .prompter
                .ask_string(&format!("{}:{}", name, key), "")
                .map_err(|e| prompt_failed("value", e))?;
            Zeroizing::new(answer.into_bytes())
        } else {
            content
        };

        let mut secret = if self.store.exists(name) {
            self.store.get(name).map_err(|e| InsertError::DecryptKey {
                key: key.to_string(),
                name: name.to_string(),
                source: Box::new(e),
            })?
        } else {
            Secret::new()
        };

        overlay(name, &mut secret, metadata)?;
        mutate::set_key(&mut secret, key, &value).map_err(|source| InsertError::SetKey {
            key: key.to_string(),
            name: name.to_string(),
            source,
        })?;

        self.write(name, &secret, MSG_YAML, recipients)?;
        Ok(outcome(name, InsertPath::YamlKey, MSG_YAML, Vec::new()))
    }

    fn from_stdin(
        &mut self,
        name: &str,
        content: &[u8],
        append: bool,
        recipients: &dyn ResolveRecipients,
    ) -> Result<InsertOutcome> {
        let bytes = Zeroizing::new(if append {
            let existing = self.load(name)?;
            mutate::append_content(&existing, content)
                .map_err(|e| decrypt_failed(name, e.into()))?
        } else {
            content.to_vec()
        });

        let mut warnings = Vec::new();
        let secret = mutate::parse_lenient(&bytes, &mut warnings);

        self.write(name, &secret, MSG_STDIN, recipients)?;
        Ok(outcome(name, InsertPath::Stdin, MSG_STDIN, warnings))
    }

    fn from_editor(
        &mut self,
        name: &str,
        exists: bool,
        recipients: &dyn ResolveRecipients,
    ) -> Result<InsertOutcome> {
        let seed = Zeroizing::new(if exists {
            self.load(name)?
                .bytes()
                .map_err(|e| decrypt_failed(name, e.into()))?
        } else {
            Vec::new()
        });

        let edited = Zeroizing::new(
            self.editor
                .edit(&seed)
                .map_err(|e| InsertError::Editor { source: Box::new(e) })?,
        );

        let mut warnings = Vec::new();
        let secret = mutate::parse_lenient(&edited, &mut warnings);

        let message = format!("{} with {}", MSG_PASSWORD, self.editor.name());
        self.write(name, &secret, &message, recipients)?;
        Ok(outcome(name, InsertPath::Multiline, &message, warnings))
    }

    fn single(
        &mut self,
        name: &str,
        password: &str,
        exists: bool,
        metadata: &BTreeMap<String, String>,
        recipients: &dyn ResolveRecipients,
    ) -> Result<InsertOutcome> {
        let mut secret = if exists {
            self.load(name)?
        } else {
            self.from_template(name, password)
        };

        overlay(name, &mut secret, metadata)?;
        secret.set_password(password);
        self.audit.single(password);

        self.write(name, &secret, MSG_PASSWORD, recipients)?;
        Ok(outcome(name, InsertPath::Password, MSG_PASSWORD, Vec::new()))
    }

    /// Base secret for a new entry: the rendered template if there is one and
    /// it parses, otherwise empty.
    fn from_template(&self, name: &str, password: &str) -> Secret {
        let Some(rendered) = self.templates.render(name, password.as_bytes()) else {
            return Secret::new();
        };
        let rendered = Zeroizing::new(rendered);
        match Secret::parse(&rendered) {
            Ok(secret) => {
                debug!(name, "seeded from template");
                secret
            }
            Err(malformed) => {
                debug!(name, error = %malformed.error, "ignoring template that does not parse");
                Secret::new()
            }
        }
    }

    fn load(&self, name: &str) -> Result<Secret> {
        self.store
            .get(name)
            .map_err(|e| decrypt_failed(name, e))
    }

    fn write(
        &mut self,
        name: &str,
        secret: &Secret,
        message: &str,
        recipients: &dyn ResolveRecipients,
    ) -> Result<()> {
        let commit = Commit {
            message: message.to_string(),
            recipients,
        };
        self.store
            .set(name, secret, &commit)
            .map_err(|e| InsertError::Encrypt {
                name: name.to_string(),
                source: Box::new(e),
            })?;
        debug!(name, message, "secret stored");
        Ok(())
    }
}

fn outcome(name: &str, path: InsertPath, message: &str, warnings: Vec<String>) -> InsertOutcome {
    InsertOutcome {
        name: name.to_string(),
        path,
        message: message.to_string(),
        warnings,
    }
}

fn overlay(name: &str, secret: &mut Secret, metadata: &BTreeMap<String, String>) -> Result<()> {
    mutate::apply_metadata(secret, metadata).map_err(|(key, source)| {
        Error::from(InsertError::SetKey {
            key: key.to_string(),
            name: name.to_string(),
            source,
        })
    })
}

fn prompt_failed(what: &str, source: Error) -> Error {
    InsertError::Prompt {
        what: what.to_string(),
        source: Box::new(source),
    }
    .into()
}

fn decrypt_failed(name: &str, source: Error) -> Error {
    InsertError::Decrypt {
        name: name.to_string(),
        source: Box::new(source),
    }
    .into()
}
