//! Error handling for filegen.
//! Defines the error type returned by the generator, every handler and the CLI.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Filesystem operation that failed, carried by [`Error::Filesystem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsOperation {
    CreateDir,
    Create,
    Open,
    Read,
    Write,
    Stat,
    Remove,
    SetPermissions,
    Sync,
}

impl fmt::Display for FsOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            FsOperation::CreateDir => "create directory",
            FsOperation::Create => "create file",
            FsOperation::Open => "open",
            FsOperation::Read => "read",
            FsOperation::Write => "write",
            FsOperation::Stat => "stat",
            FsOperation::Remove => "remove",
            FsOperation::SetPermissions => "set permissions of",
            FsOperation::Sync => "sync",
        };
        f.write_str(op)
    }
}

/// Custom error types for filegen operations.
///
/// Variants that wrap another error include it in their message, so printing
/// the outermost error shows the whole chain down to the failing path.
#[derive(Error, Debug)]
pub enum Error {
    /// No handler is registered for the node's tag.
    #[error("unknown node type '{tag}'")]
    UnknownNodeType { tag: String },

    /// The resolved handler expects a different payload variant.
    #[error("payload type mismatch: expected {expected} payload, found {found}")]
    PayloadTypeMismatch { expected: &'static str, found: &'static str },

    /// A filesystem primitive failed.
    #[error("failed to {op} '{}': {source}", path.display())]
    Filesystem {
        op: FsOperation,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Copying a file or directory tree failed.
    #[error("failed to copy '{}' to '{}': {source}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: Box<Error>,
    },

    /// Writing the tar or gzip stream failed.
    #[error("failed to write archive '{}': {source}", path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Walking a directory tree failed.
    #[error("failed to walk '{}': {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// The template engine could not parse or execute a template.
    #[error("template error in '{}': {message}", path.display())]
    Template { path: PathBuf, message: String },

    /// A child of a directory or archive node failed.
    #[error("failed to generate child {index} of '{parent}': {source}")]
    Child {
        parent: String,
        index: usize,
        #[source]
        source: Box<Error>,
    },

    /// A manifest file could not be found or parsed.
    #[error("manifest error in '{}': {message}", path.display())]
    Manifest { path: PathBuf, message: String },

    #[error("output directory '{output_dir}' already exists, use --force to overwrite it")]
    OutputDirectoryExists { output_dir: String },
}

impl Error {
    /// Returns a closure that wraps an [`io::Error`] into [`Error::Filesystem`],
    /// meant for `map_err`.
    pub fn fs<P: AsRef<Path>>(op: FsOperation, path: P) -> impl FnOnce(io::Error) -> Error {
        let path = path.as_ref().to_path_buf();
        move |source| Error::Filesystem { op, path, source }
    }

    /// Wraps a failure of the child at `index` of the node named `parent`.
    pub fn child<S: Into<String>>(parent: S, index: usize, source: Error) -> Error {
        Error::Child { parent: parent.into(), index, source: Box::new(source) }
    }

    /// Follows [`Error::Child`] wrappers down to the error that started the chain.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Child { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Convenience type alias for Results with filegen's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
