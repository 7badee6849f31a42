use log::debug;
use std::path::Path;

use crate::error::{Error, Result};
use crate::generator::Generator;
use crate::handler::{mismatch, Handler};
use crate::node::{FileMode, Payload, TYPE_DIR};
use crate::utils;

/// Creates a directory and renders its children into it.
///
/// Missing ancestors of the directory are created with the same mode;
/// directories that already exist keep theirs.
/// Children are rendered in declared order. The first failing child stops the
/// loop; whatever was already written stays on disk.
#[derive(Debug, Clone)]
pub struct DirHandler {
    default_mode: FileMode,
}

impl DirHandler {
    pub const DEFAULT_MODE: FileMode = 0o755;

    pub fn new() -> Self {
        Self { default_mode: Self::DEFAULT_MODE }
    }

    /// Mode used when the payload does not set one.
    pub fn with_default_mode(mut self, mode: FileMode) -> Self {
        self.default_mode = mode;
        self
    }
}

impl Default for DirHandler {
    fn default() -> Self {
        DirHandler::new()
    }
}

impl Handler for DirHandler {
    fn tag(&self) -> &str {
        TYPE_DIR
    }

    fn render(&self, generator: &Generator, target_dir: &Path, payload: &Payload) -> Result<()> {
        let Payload::Dir(params) = payload else {
            return Err(mismatch("dir", payload));
        };

        let target = target_dir.join(&params.name);
        utils::create_dir_all(&target, params.mode.unwrap_or(self.default_mode))?;

        for (index, child) in params.children.iter().enumerate() {
            generator
                .generate(&target, child)
                .map_err(|e| Error::child(&params.name, index, e))?;
        }
        debug!("Generated directory {} with {} children", target.display(), params.children.len());
        Ok(())
    }
}
