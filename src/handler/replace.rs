use indexmap::IndexMap;
use log::debug;
use regex::bytes::{Captures, Regex};
use std::borrow::Cow;
use std::path::Path;

use crate::error::{Error, Result};
use crate::generator::Generator;
use crate::handler::{mismatch, Handler};
use crate::node::{Payload, TYPE_REPLACE};
use crate::utils;

/// Writes a copy of a template file with literal substrings replaced.
///
/// Without an explicit mode the output takes the template file's own mode.
#[derive(Debug, Clone, Default)]
pub struct ReplaceHandler;

impl ReplaceHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Handler for ReplaceHandler {
    fn tag(&self) -> &str {
        TYPE_REPLACE
    }

    fn render(&self, _: &Generator, target_dir: &Path, payload: &Payload) -> Result<()> {
        let Payload::Replace(params) = payload else {
            return Err(mismatch("replace", payload));
        };

        let mode = match params.mode {
            Some(mode) => mode,
            None => utils::mode_of(&utils::metadata(&params.template)?),
        };
        let content = utils::read_file(&params.template)?;
        let content = replace_all(&content, &params.replaces).map_err(|e| Error::Template {
            path: params.template.clone(),
            message: e.to_string(),
        })?;

        let target = target_dir.join(&params.name);
        debug!("Replacing {} patterns from {}", params.replaces.len(), params.template.display());
        utils::write_file(&target, &content, mode)
    }
}

/// Replaces every occurrence of each key of `replaces` in a single pass.
///
/// Matches never overlap and inserted values are not scanned again. When
/// several keys match at the same position the longest one wins. Empty keys
/// are ignored.
pub fn replace_all<'a>(
    content: &'a [u8],
    replaces: &IndexMap<String, String>,
) -> std::result::Result<Cow<'a, [u8]>, regex::Error> {
    let mut keys: Vec<&str> = replaces.keys().map(String::as_str).filter(|k| !k.is_empty()).collect();
    if keys.is_empty() {
        return Ok(Cow::Borrowed(content));
    }
    keys.sort_by(|a, b| b.len().cmp(&a.len()));

    let pattern = keys.iter().map(|k| regex::escape(k)).collect::<Vec<_>>().join("|");
    let re = Regex::new(&pattern)?;

    Ok(re.replace_all(content, |caps: &Captures| {
        let key = String::from_utf8_lossy(&caps[0]);
        replaces.get(key.as_ref()).map(|v| v.as_bytes().to_vec()).unwrap_or_else(|| caps[0].to_vec())
    }))
}
