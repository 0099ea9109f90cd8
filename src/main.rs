//! Coffer - an age-encrypted password store.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use coffer::cli::output;
use coffer::cli::{execute, Cli};
use coffer::core::constants;
use coffer::error::{Error, InsertError, StoreError};

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env(constants::ENV_LOG).unwrap_or_else(|_| {
        if cli.global.verbose {
            EnvFilter::new("coffer=debug")
        } else {
            EnvFilter::new("coffer=warn")
        }
    });

    // Logs go to stderr so secrets printed on stdout stay pipeable.
    let json = std::env::var(constants::ENV_LOG_FORMAT).is_ok_and(|f| f == "json");
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    if let Err(e) = execute(cli.command, cli.global) {
        let suggestion = match &e {
            Error::Store(StoreError::NotInitialized(_)) | Error::Store(StoreError::NoIdentity(_)) => {
                Some("run: coffer init")
            }
            Error::Insert(InsertError::Aborted) => {
                Some("use --force to overwrite or --append to add to it")
            }
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(e.exit_code().code());
    }
}
