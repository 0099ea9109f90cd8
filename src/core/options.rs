//! Per-invocation behavior switches.
//!
//! [`Options`] is built from explicit command-line flags first and then filled
//! from the persisted [`StoreConfig`] with [`Options::apply_defaults`]. A field
//! that is `Some` was set explicitly and is never replaced by a config default.

use std::time::Duration;

use crate::core::config::StoreConfig;

/// Whether missing recipient keys may be imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyImport {
    #[default]
    Enabled,
    Disabled,
}

/// Resolved behavior switches for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Options {
    pub ask_for_more: Option<bool>,
    pub auto_clip: Option<bool>,
    pub clip_timeout: Option<Duration>,
    pub concurrency: Option<usize>,
    pub edit_recipients: Option<bool>,
    pub export_keys: Option<bool>,
    pub no_confirm: Option<bool>,
    pub no_pager: Option<bool>,
    pub notifications: Option<bool>,
    pub safe_content: Option<bool>,
    pub use_symbols: Option<bool>,
    pub auto_sync: Option<bool>,
    pub key_import: KeyImport,
}

/// Command-line flags that map onto [`Options`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Flags {
    pub clip: bool,
    pub no_sync: bool,
    pub no_pager: bool,
    pub no_confirm: bool,
}

impl Options {
    /// Explicit layer from command-line flags.
    ///
    /// Only flags that were actually given set a value; absent flags stay `None`
    /// so the config can fill them.
    pub fn from_flags(flags: Flags) -> Self {
        Self {
            auto_clip: flags.clip.then_some(true),
            auto_sync: flags.no_sync.then_some(false),
            no_pager: flags.no_pager.then_some(true),
            no_confirm: flags.no_confirm.then_some(true),
            ..Self::default()
        }
    }

    /// Fill every unset option from `config`.
    ///
    /// `auto_import = false` disables key import even if it was enabled before;
    /// `true` never re-enables it. When stdout is not a terminal, auto-clip is
    /// forced off regardless of any earlier value.
    pub fn apply_defaults(mut self, config: &StoreConfig, stdout_is_terminal: bool) -> Self {
        fill(&mut self.ask_for_more, config.ask_for_more);
        fill(&mut self.auto_clip, config.auto_clip);
        fill(
            &mut self.clip_timeout,
            Duration::from_secs(config.clip_timeout),
        );
        fill(&mut self.concurrency, config.concurrency);
        fill(&mut self.edit_recipients, config.edit_recipients);
        fill(&mut self.export_keys, config.export_keys);
        fill(&mut self.no_confirm, config.no_confirm);
        fill(&mut self.no_pager, config.no_pager);
        fill(&mut self.notifications, config.notifications);
        fill(&mut self.safe_content, config.safe_content);
        fill(&mut self.use_symbols, config.use_symbols);
        fill(&mut self.auto_sync, config.auto_sync);

        if !config.auto_import {
            self.key_import = KeyImport::Disabled;
        }

        if !stdout_is_terminal {
            self.auto_clip = Some(false);
        }

        self
    }

    /// Whether recipients must be confirmed before encrypting.
    pub fn confirm_recipients(&self) -> bool {
        !self.no_confirm.unwrap_or(false)
    }

    /// Whether the password is hidden when showing a secret.
    pub fn hide_password(&self) -> bool {
        self.safe_content.unwrap_or(false)
    }
}

fn fill<T>(slot: &mut Option<T>, value: T) {
    if slot.is_none() {
        *slot = Some(value);
    }
}
