//! Handlers turn node payloads into filesystem output.

use std::path::Path;

use crate::error::{Error, Result};
use crate::generator::Generator;
use crate::node::Payload;

pub mod archive;
pub mod copy;
pub mod dir;
pub mod replace;
pub mod template;

pub use archive::ArchiveHandler;
pub use copy::CopyHandler;
pub use dir::DirHandler;
pub use replace::ReplaceHandler;
pub use template::TemplateHandler;

/// Renderer bound to a node tag.
pub trait Handler {
    /// Tag this handler is registered under by [`Generator::register`].
    fn tag(&self) -> &str;

    /// Renders `payload` into `target_dir`.
    ///
    /// Composite handlers call [`Generator::generate`] for each child with a
    /// directory they created themselves.
    fn render(&self, generator: &Generator, target_dir: &Path, payload: &Payload) -> Result<()>;
}

/// Builds the error returned when a handler receives a payload it can't use.
pub(crate) fn mismatch(expected: &'static str, found: &Payload) -> Error {
    Error::PayloadTypeMismatch { expected, found: found.kind() }
}
