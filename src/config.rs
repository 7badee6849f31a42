//! Manifest handling for filegen.
//! A manifest describes a node tree in JSON or YAML, so trees can be generated
//! from the command line without writing Rust.

use log::debug;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::node::Node;

/// Manifest file names looked up when a directory is given
pub const MANIFEST_FILES: [&str; 3] = ["filegen.json", "filegen.yml", "filegen.yaml"];

/// Finds the manifest file for `path`.
///
/// A file path is returned as is; for a directory the first existing entry of
/// `manifest_files` inside it is used.
///
/// # Errors
/// * `Error::Manifest` if `path` does not exist or the directory holds no manifest
pub fn find_manifest<P: AsRef<Path>>(path: P, manifest_files: &[&str]) -> Result<PathBuf> {
    let path = path.as_ref();
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    if !path.is_dir() {
        return Err(Error::Manifest {
            path: path.to_path_buf(),
            message: "no such file or directory".to_string(),
        });
    }
    for file in manifest_files {
        let candidate = path.join(file);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }
    Err(Error::Manifest {
        path: path.to_path_buf(),
        message: format!("no manifest file found (tried: {})", manifest_files.join(", ")),
    })
}

/// Parses manifest content into the root node, trying JSON first, then YAML.
pub fn parse_manifest(content: &str) -> std::result::Result<Node, String> {
    match serde_json::from_str(content) {
        Ok(node) => Ok(node),
        Err(_) => serde_yaml::from_str(content).map_err(|e| format!("invalid manifest: {e}")),
    }
}

/// Loads the manifest at `path` (a file, or a directory holding one of
/// [`MANIFEST_FILES`]).
///
/// Relative `src` and `template` paths in the tree are resolved against the
/// manifest's directory.
pub fn load_manifest<P: AsRef<Path>>(path: P) -> Result<Node> {
    let manifest = find_manifest(path, &MANIFEST_FILES)?;
    debug!("Loading manifest from {}", manifest.display());

    let content = std::fs::read_to_string(&manifest)
        .map_err(|e| Error::Manifest { path: manifest.clone(), message: e.to_string() })?;
    let mut root =
        parse_manifest(&content).map_err(|message| Error::Manifest { path: manifest.clone(), message })?;

    if let Some(base) = manifest.parent() {
        root.rebase_sources(base);
    }
    Ok(root)
}
