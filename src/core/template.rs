//! Secret templates.
//!
//! A `.pass-template` file in a secret's folder (or any parent folder up to the
//! store root) seeds newly created secrets. Placeholders:
//!
//! - `{{ .Content }}`: the password being inserted
//! - `{{ .Name }}`: the full secret name
//! - `{{ .Dir }}`: the folder part of the name
//! - `{{ .Base }}`: the last path component of the name

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::constants;

/// Renders template content for a new secret.
pub trait TemplateRenderer {
    /// Rendered bytes, or `None` when no template applies.
    fn render(&self, name: &str, content: &[u8]) -> Option<Vec<u8>>;
}

/// Never renders anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTemplates;

impl TemplateRenderer for NoTemplates {
    fn render(&self, _name: &str, _content: &[u8]) -> Option<Vec<u8>> {
        None
    }
}

/// Looks up `.pass-template` files below a store root.
#[derive(Debug, Clone)]
pub struct FsTemplates {
    root: PathBuf,
}

impl FsTemplates {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Nearest template for `name`, searching its folder then each parent.
    fn lookup(&self, name: &str) -> Option<PathBuf> {
        let mut dir = Path::new(name).parent();
        while let Some(d) = dir {
            let candidate = self.root.join(d).join(constants::TEMPLATE_FILE);
            if candidate.is_file() {
                return Some(candidate);
            }
            dir = d.parent();
        }
        None
    }
}

impl TemplateRenderer for FsTemplates {
    fn render(&self, name: &str, content: &[u8]) -> Option<Vec<u8>> {
        let path = self.lookup(name)?;
        let template = match std::fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "unreadable template");
                return None;
            }
        };
        debug!(path = %path.display(), name, "rendering template");
        Some(render(&template, name, &String::from_utf8_lossy(content)).into_bytes())
    }
}

/// Substitute the known placeholders; unknown ones are left as written.
pub fn render(template: &str, name: &str, content: &str) -> String {
    let (dir, base) = match name.rsplit_once('/') {
        Some((dir, base)) => (dir, base),
        None => ("", name),
    };

    let mut out = String::with_capacity(template.len() + content.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        match after[..end].trim() {
            ".Content" => out.push_str(content),
            ".Name" => out.push_str(name),
            ".Dir" => out.push_str(dir),
            ".Base" => out.push_str(base),
            _ => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}
