//! Init command - create the identity and the store.

use tracing::info;

use crate::cli::{output, Context};
use crate::core::keys;
use crate::core::store::Filesystem;
use crate::error::{Result, StoreError};

/// Initialize the store configured for this invocation.
pub fn execute(name: Option<String>, ctx: &Context) -> Result<()> {
    let name = name.unwrap_or_else(whoami::username);
    if name.trim().is_empty() || name.contains(['/', '\\']) {
        return Err(StoreError::InvalidName {
            name,
            reason: "user name must be a single path component".to_string(),
        }
        .into());
    }

    let root = ctx.config.store_root()?;
    let identity = keys::identity_path()?;
    let export = ctx.options.export_keys.unwrap_or(true);

    info!("Initializing store for user: {}", name);
    let public_key = Filesystem::init(&root, &identity, &name, export)?;

    output::success(&format!("initialized {}", output::path(&root.display().to_string())));
    output::kv("recipient:", &public_key);
    output::kv("identity: ", identity.display());
    Ok(())
}
