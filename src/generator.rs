//! Tag-based dispatch of nodes to their handlers.

use log::debug;
use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};
use crate::handler::{
    ArchiveHandler, CopyHandler, DirHandler, Handler, ReplaceHandler, TemplateHandler,
};
use crate::node::Node;

/// Resolves node tags to handlers and drives recursive rendering.
///
/// Registration needs `&mut self` while [`Generator::generate`] only borrows
/// the registry, so handlers cannot change while a tree is being rendered.
#[derive(Default)]
pub struct Generator {
    handlers: HashMap<String, Box<dyn Handler>>,
}

impl Generator {
    /// Creates a generator without any handlers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a generator with the built-in `dir`, `tgz`, `copy`, `replace`
    /// and `template` handlers.
    pub fn with_default_handlers() -> Self {
        let mut generator = Self::new();
        generator.register(CopyHandler::new());
        generator.register(DirHandler::new());
        generator.register(TemplateHandler::new());
        generator.register(ReplaceHandler::new());
        generator.register(ArchiveHandler::new());
        generator
    }

    /// Registers `handler` for `tag`, replacing any previous handler for it.
    pub fn handle<S, H>(&mut self, tag: S, handler: H)
    where
        S: Into<String>,
        H: Handler + 'static,
    {
        let tag = tag.into();
        if self.handlers.insert(tag.clone(), Box::new(handler)).is_some() {
            debug!("Replaced handler for '{tag}'");
        }
    }

    /// Registers `handler` under its own [`Handler::tag`].
    pub fn register<H: Handler + 'static>(&mut self, handler: H) {
        let tag = handler.tag().to_string();
        self.handle(tag, handler);
    }

    pub fn is_registered(&self, tag: &str) -> bool {
        self.handlers.contains_key(tag)
    }

    /// Materializes `node` and its subtree under `target`.
    ///
    /// # Errors
    /// * `Error::UnknownNodeType` if no handler is registered for the node's tag
    /// * any error reported by the handler, unchanged
    pub fn generate<P: AsRef<Path>>(&self, target: P, node: &Node) -> Result<()> {
        let target = target.as_ref();
        let handler = self
            .handlers
            .get(node.tag())
            .ok_or_else(|| Error::UnknownNodeType { tag: node.tag().to_string() })?;

        debug!("Generating '{}' node in {}", node.tag(), target.display());
        handler.render(self, target, node.payload())
    }
}
