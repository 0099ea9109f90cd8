//! Insert command.

use std::collections::BTreeMap;
use std::io;

use clap::Args;
use tracing::debug;

use crate::cli::{output, Context};
use crate::core::audit::Strength;
use crate::core::editor::External;
use crate::core::input::Session;
use crate::core::insert::{InsertRequest, Inserter};
use crate::core::keys;
use crate::core::options::Options;
use crate::core::prompt::{Prompter, Terminal, Unattended};
use crate::core::recipient::CheckedRecipients;
use crate::core::store::{self, Filesystem};
use crate::core::template::FsTemplates;
use crate::error::{InsertError, Result};

/// Arguments of `coffer insert`.
#[derive(Args, Debug, Clone, Default)]
pub struct InsertArgs {
    /// Show the password while typing it
    #[arg(short, long)]
    pub echo: bool,

    /// Write the secret in your editor
    #[arg(short, long)]
    pub multiline: bool,

    /// Overwrite without asking and skip recipient checks
    #[arg(short, long)]
    pub force: bool,

    /// Append piped input to an existing secret
    #[arg(short, long)]
    pub append: bool,

    /// Secret name, e.g. web/example.com
    pub name: Option<String>,

    /// Structured key to set, then any number of key=value pairs
    #[arg(value_name = "KEY|KEY=VALUE")]
    pub rest: Vec<String>,
}

impl InsertArgs {
    /// Split positionals into the request.
    ///
    /// Arguments containing `=` are metadata; the first one without is the
    /// structured key. The name is trimmed.
    ///
    /// # Errors
    ///
    /// Returns `InsertError::NoName` when no name was given.
    pub fn into_request(self) -> std::result::Result<InsertRequest, InsertError> {
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or(InsertError::NoName)?;

        let mut key = None;
        let mut metadata = BTreeMap::new();
        for arg in self.rest {
            match arg.split_once('=') {
                Some((k, _)) if k.trim().is_empty() => {
                    debug!(arg = %arg, "ignoring metadata without a key");
                }
                Some((k, v)) => {
                    metadata.insert(k.to_string(), v.to_string());
                }
                None if key.is_none() => key = Some(arg),
                None => debug!(arg = %arg, "ignoring extra argument"),
            }
        }

        Ok(InsertRequest {
            name,
            key,
            echo: self.echo,
            multiline: self.multiline,
            force: self.force,
            append: self.append,
            metadata,
        })
    }
}

/// Insert a secret into the configured store.
pub fn execute(args: InsertArgs, ctx: &Context) -> Result<()> {
    let request = args.into_request()?;
    store::validate_name(&request.name)?;

    let root = ctx.config.store_root()?;
    let mut store = Filesystem::open(&root, &keys::identity_path()?, ctx.options.key_import)?;

    let prompter: &dyn Prompter = prompter_for(&ctx.session);
    let editor = External::resolve(ctx.config.editor.as_deref());
    let templates = FsTemplates::new(&root);
    let recipients = recipient_check(&ctx.session, &ctx.options, prompter);

    let outcome = Inserter::new(
        &mut store,
        prompter,
        &editor,
        &Strength,
        &templates,
        ctx.session,
    )
    .recipients(&recipients)
    .insert(request, &mut io::stdin())?;

    for warning in &outcome.warnings {
        output::warn(warning);
    }
    output::success(&format!("{}: {}", output::key(&outcome.name), outcome.message));
    Ok(())
}

/// Recipients are confirmed only when the user can answer and has not opted
/// out.
fn recipient_check<'a>(
    session: &Session,
    options: &Options,
    prompter: &'a dyn Prompter,
) -> CheckedRecipients<'a> {
    if session.interactive && options.confirm_recipients() {
        CheckedRecipients::confirming(prompter)
    } else {
        CheckedRecipients::new()
    }
}

fn prompter_for(session: &Session) -> &'static dyn Prompter {
    if session.interactive {
        &Terminal
    } else {
        &Unattended
    }
}
