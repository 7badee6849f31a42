//! filegen materializes a declarative tree of nodes into directories, files
//! and compressed archives.
//! A [`generator::Generator`] resolves each node's tag to a registered
//! handler; directory and archive handlers recurse back into the generator
//! for their children.

/// Command-line interface module for the filegen binary
pub mod cli;

/// Manifest loading
/// Supports JSON and YAML formats (filegen.json, filegen.yml, filegen.yaml)
pub mod config;

/// Error types and handling for filegen
pub mod error;

/// Tag to handler dispatch
pub mod generator;

/// Built-in handlers: dir, tgz, copy, replace and template
pub mod handler;

/// Logger initialization for the filegen binary
pub mod logger;

/// Node tree data model
pub mod node;

/// Template engines used by the template handler
pub mod renderer;

/// Filesystem helpers shared by the handlers
pub mod utils;

pub use error::{Error, Result};
pub use generator::Generator;
pub use node::{Node, Payload};
