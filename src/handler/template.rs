use log::debug;
use std::fs;
use std::path::Path;

use crate::error::{Error, FsOperation, Result};
use crate::generator::Generator;
use crate::handler::{mismatch, Handler};
use crate::node::{FileMode, Payload, TYPE_TEMPLATE};
use crate::renderer::{MiniJinjaRenderer, TemplateRenderer};
use crate::utils;

/// Renders a template file against the payload's data.
pub struct TemplateHandler {
    default_mode: FileMode,
    renderer: Box<dyn TemplateRenderer>,
}

impl TemplateHandler {
    pub const DEFAULT_MODE: FileMode = 0o644;

    /// Creates a handler backed by [`MiniJinjaRenderer`].
    pub fn new() -> Self {
        Self::with_renderer(Box::new(MiniJinjaRenderer::new()))
    }

    pub fn with_renderer(renderer: Box<dyn TemplateRenderer>) -> Self {
        Self { default_mode: Self::DEFAULT_MODE, renderer }
    }

    pub fn with_default_mode(mut self, mode: FileMode) -> Self {
        self.default_mode = mode;
        self
    }
}

impl Default for TemplateHandler {
    fn default() -> Self {
        TemplateHandler::new()
    }
}

impl Handler for TemplateHandler {
    fn tag(&self) -> &str {
        TYPE_TEMPLATE
    }

    fn render(&self, _: &Generator, target_dir: &Path, payload: &Payload) -> Result<()> {
        let Payload::Template(params) = payload else {
            return Err(mismatch("template", payload));
        };

        let source = fs::read_to_string(&params.template)
            .map_err(Error::fs(FsOperation::Read, &params.template))?;
        let name = params.template.display().to_string();
        let content = self
            .renderer
            .render(&name, &source, &params.data)
            .map_err(|message| Error::Template { path: params.template.clone(), message })?;

        let target = target_dir.join(&params.name);
        debug!("Rendered {} into {}", params.template.display(), target.display());
        utils::write_file(&target, content.as_bytes(), params.mode.unwrap_or(self.default_mode))
    }
}
