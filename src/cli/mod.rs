//! Command-line interface.

pub mod completions;
pub mod init;
pub mod insert;
pub mod output;
pub mod show;

use clap::{Args, Parser, Subcommand};

use crate::core::config::StoreConfig;
use crate::core::input::Session;
use crate::core::options::{Flags, Options};
use crate::error::Result;

/// Coffer - an age-encrypted password store.
#[derive(Parser)]
#[command(
    name = "coffer",
    about = "An age-encrypted password store",
    version
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags accepted by every command.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct GlobalArgs {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Copy the password to the clipboard when showing it
    #[arg(long, global = true)]
    pub clip: bool,

    /// Do not sync the store after writing
    #[arg(long, global = true)]
    pub no_sync: bool,

    /// Do not page output
    #[arg(long, global = true)]
    pub no_pager: bool,

    /// Do not ask to confirm recipients
    #[arg(long, global = true)]
    pub no_confirm: bool,

    /// Never prompt; fail or take defaults instead
    #[arg(long, global = true)]
    pub no_interactive: bool,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Create an identity and an empty store
    Init {
        /// Your name (used to label your public key)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Insert a new secret or update an existing one
    Insert(insert::InsertArgs),

    /// Print a secret
    Show {
        /// Secret name
        name: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Per-invocation state shared by the commands.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: StoreConfig,
    pub options: Options,
    pub session: Session,
}

impl Context {
    /// Load the config and layer the global flags over it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file is unreadable or invalid.
    pub fn load(global: GlobalArgs) -> Result<Self> {
        let config = StoreConfig::load()?;
        let session = Session::detect(global.no_interactive);
        let flags = Flags {
            clip: global.clip,
            no_sync: global.no_sync,
            no_pager: global.no_pager,
            no_confirm: global.no_confirm,
        };
        let options = Options::from_flags(flags).apply_defaults(&config, session.stdout_terminal);
        tracing::debug!(?options, "options resolved");

        Ok(Self {
            config,
            options,
            session,
        })
    }
}

/// Execute a command.
pub fn execute(command: Command, global: GlobalArgs) -> Result<()> {
    use Command::*;

    match command {
        Completions { shell } => completions::execute(shell),
        Init { name } => init::execute(name, &Context::load(global)?),
        Insert(args) => insert::execute(args, &Context::load(global)?),
        Show { name, json } => show::execute(&name, json, &Context::load(global)?),
    }
}
