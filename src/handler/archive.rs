//! The `tgz` handler: children are staged into a scratch directory, which is
//! then streamed into a gzip-compressed tar file.

use flate2::write::GzEncoder;
use flate2::Compression;
use log::debug;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use walkdir::WalkDir;

use crate::error::{Error, FsOperation, Result};
use crate::generator::Generator;
use crate::handler::{mismatch, Handler};
use crate::node::{FileMode, Payload, TYPE_ARCHIVE};
use crate::utils;

static STAGING_SEQ: AtomicU64 = AtomicU64::new(0);

/// Renders children into a staging directory and packs them as `.tar.gz`.
///
/// The staging directory is removed only once the archive has been written
/// and synced. When anything fails it is left next to the archive so its
/// content can be inspected.
#[derive(Debug, Clone)]
pub struct ArchiveHandler {
    default_mode: FileMode,
    staging_prefix: String,
}

impl ArchiveHandler {
    pub const DEFAULT_MODE: FileMode = 0o644;
    pub const DEFAULT_STAGING_PREFIX: &'static str = ".filegen-staging";

    pub fn new() -> Self {
        Self {
            default_mode: Self::DEFAULT_MODE,
            staging_prefix: Self::DEFAULT_STAGING_PREFIX.to_string(),
        }
    }

    /// Mode of the archive file when the payload does not set one.
    pub fn with_default_mode(mut self, mode: FileMode) -> Self {
        self.default_mode = mode;
        self
    }

    /// Prefix of the staging directories created inside the target directory.
    pub fn with_staging_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.staging_prefix = prefix.into();
        self
    }

    /// Returns a staging path no other invocation in this process will use.
    fn staging_dir(&self, target_dir: &Path) -> PathBuf {
        let seq = STAGING_SEQ.fetch_add(1, Ordering::Relaxed);
        target_dir.join(format!("{}-{}-{}", self.staging_prefix, std::process::id(), seq))
    }
}

impl Default for ArchiveHandler {
    fn default() -> Self {
        ArchiveHandler::new()
    }
}

impl Handler for ArchiveHandler {
    fn tag(&self) -> &str {
        TYPE_ARCHIVE
    }

    fn render(&self, generator: &Generator, target_dir: &Path, payload: &Payload) -> Result<()> {
        let Payload::Archive(params) = payload else {
            return Err(mismatch("archive", payload));
        };
        let mode = params.mode.unwrap_or(self.default_mode);

        let staging = self.staging_dir(target_dir);
        debug!("Staging '{}' in {}", params.name, staging.display());
        utils::recreate_dir(&staging)?;

        for (index, child) in params.children.iter().enumerate() {
            generator
                .generate(&staging, child)
                .map_err(|e| Error::child(&params.name, index, e))?;
        }

        let archive = target_dir.join(&params.name);
        write_tgz(&staging, &archive, mode)?;

        fs::remove_dir_all(&staging).map_err(Error::fs(FsOperation::Remove, &staging))?;
        debug!("Removed staging directory {}", staging.display());
        Ok(())
    }
}

/// Packs every regular file under `src_dir` into a gzip-compressed tar at `target`.
///
/// Entry names are relative to `src_dir`; `src_dir` itself and directories
/// produce no entries. Entries are visited in file name order.
pub fn write_tgz(src_dir: &Path, target: &Path, mode: FileMode) -> Result<()> {
    let archive_err = |source: io::Error| Error::Archive { path: target.to_path_buf(), source };

    let file = utils::create_file(target, mode)?;
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));

    for entry in WalkDir::new(src_dir).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|source| Error::Walk { path: src_dir.to_path_buf(), source })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let name = path
            .strip_prefix(src_dir)
            .map_err(|e| archive_err(io::Error::new(io::ErrorKind::InvalidInput, e)))?;

        let metadata = entry
            .metadata()
            .map_err(|source| Error::Walk { path: path.to_path_buf(), source })?;
        let mut header = tar::Header::new_gnu();
        header.set_metadata(&metadata);

        let mut input = File::open(path).map_err(Error::fs(FsOperation::Open, path))?;
        debug!("Adding '{}' to {}", name.display(), target.display());
        builder.append_data(&mut header, name, &mut input).map_err(archive_err)?;
    }

    let encoder = builder.into_inner().map_err(archive_err)?;
    let file = encoder.finish().map_err(archive_err)?;
    file.sync_all().map_err(Error::fs(FsOperation::Sync, target))?;
    debug!("Wrote archive {}", target.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use tempfile::TempDir;

    #[test]
    fn test_staging_dirs_are_unique() {
        let handler = ArchiveHandler::new();
        let a = handler.staging_dir(Path::new("/out"));
        let b = handler.staging_dir(Path::new("/out"));
        assert_ne!(a, b);
        assert!(a.file_name().unwrap().to_str().unwrap().starts_with(ArchiveHandler::DEFAULT_STAGING_PREFIX));
    }

    #[test]
    fn test_write_tgz_skips_directories_and_sorts_entries() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("src");
        fs::create_dir_all(src.join("b/empty")).unwrap();
        fs::write(src.join("b/two.txt"), "2").unwrap();
        fs::write(src.join("a.txt"), "1").unwrap();
        let target = temp_dir.path().join("out.tgz");

        write_tgz(&src, &target, 0o644).unwrap();

        let mut archive = tar::Archive::new(GzDecoder::new(File::open(&target).unwrap()));
        let names: Vec<String> = archive
            .entries()
            .unwrap()
            .map(|e| e.unwrap().path().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.txt", "b/two.txt"]);
    }
}
