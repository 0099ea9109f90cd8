//! Show command.

use std::io::{self, Write};

use serde::Serialize;
use tracing::debug;
use zeroize::Zeroizing;

use crate::cli::Context;
use crate::core::keys;
use crate::core::store::{Filesystem, Store};
use crate::error::Result;

#[derive(Serialize)]
struct ShowJson<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<&'a str>,
    fields: serde_json::Map<String, serde_json::Value>,
}

/// Print a secret.
///
/// With `safe_content` the password line is left out.
pub fn execute(name: &str, json: bool, ctx: &Context) -> Result<()> {
    let root = ctx.config.store_root()?;
    let store = Filesystem::open(&root, &keys::identity_path()?, ctx.options.key_import)?;
    let secret = store.get(name)?;

    let hide = ctx.options.hide_password();
    if ctx.options.auto_clip == Some(true) {
        debug!(name, "auto-clip is on but no clipboard is available, printing");
    }

    let mut stdout = io::stdout().lock();
    if json {
        let out = ShowJson {
            name,
            password: (!hide).then(|| secret.password()),
            notes: secret.notes(),
            fields: secret
                .fields()
                .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
                .collect(),
        };
        let rendered = Zeroizing::new(serde_json::to_string_pretty(&out).map_err(io::Error::from)?);
        writeln!(stdout, "{}", rendered.as_str())?;
        return Ok(());
    }

    let bytes = Zeroizing::new(secret.bytes()?);
    let body = if hide {
        match bytes.iter().position(|b| *b == b'\n') {
            Some(idx) => &bytes[idx + 1..],
            None => &[][..],
        }
    } else {
        &bytes[..]
    };
    stdout.write_all(body)?;
    stdout.flush()?;
    Ok(())
}
