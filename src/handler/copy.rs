use log::debug;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, FsOperation, Result};
use crate::generator::Generator;
use crate::handler::{mismatch, Handler};
use crate::node::{FileMode, Payload, TYPE_COPY};
use crate::utils;

/// Copies a file, or a directory tree, verbatim.
///
/// Every written file is synced before the handler returns.
#[derive(Debug, Clone)]
pub struct CopyHandler {
    buffer_size: usize,
}

impl CopyHandler {
    pub const DEFAULT_BUFFER_SIZE: usize = 32 * 1024;

    pub fn new() -> Self {
        Self { buffer_size: Self::DEFAULT_BUFFER_SIZE }
    }

    /// Size of the buffer each file is streamed through. Zero is treated as one byte.
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    fn copy(&self, src: &Path, dst: &Path) -> Result<()> {
        let metadata = utils::metadata(src)?;
        if metadata.is_dir() {
            self.copy_dir(src, dst)
        } else {
            self.copy_file(src, dst, utils::mode_of(&metadata))
        }
    }

    fn copy_dir(&self, src: &Path, dst: &Path) -> Result<()> {
        // Directory modes are applied last so read-only directories can still be filled.
        let mut dir_modes: Vec<(PathBuf, FileMode)> = Vec::new();

        for entry in WalkDir::new(src).sort_by_file_name() {
            let entry = entry.map_err(|source| Error::Walk { path: src.to_path_buf(), source })?;
            let relative = entry.path().strip_prefix(src).unwrap_or(Path::new(""));
            let target = dst.join(relative);
            let metadata = entry
                .metadata()
                .map_err(|source| Error::Walk { path: entry.path().to_path_buf(), source })?;

            if metadata.is_dir() {
                std::fs::create_dir_all(&target).map_err(Error::fs(FsOperation::CreateDir, &target))?;
                dir_modes.push((target, utils::mode_of(&metadata)));
            } else if metadata.is_file() {
                self.copy_file(entry.path(), &target, utils::mode_of(&metadata))?;
            } else {
                debug!("Skipping special file {}", entry.path().display());
            }
        }

        for (dir, mode) in dir_modes.iter().rev() {
            utils::set_mode(dir, *mode)?;
        }
        Ok(())
    }

    fn copy_file(&self, src: &Path, dst: &Path, mode: FileMode) -> Result<()> {
        debug!("Copying {} to {}", src.display(), dst.display());
        let mut input = File::open(src).map_err(Error::fs(FsOperation::Open, src))?;
        let mut output = utils::create_file(dst, mode)?;

        let mut buffer = vec![0u8; self.buffer_size];
        loop {
            let n = match input.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::fs(FsOperation::Read, src)(e)),
            };
            output.write_all(&buffer[..n]).map_err(Error::fs(FsOperation::Write, dst))?;
        }
        output.sync_all().map_err(Error::fs(FsOperation::Sync, dst))
    }
}

impl Default for CopyHandler {
    fn default() -> Self {
        CopyHandler::new()
    }
}

impl Handler for CopyHandler {
    fn tag(&self) -> &str {
        TYPE_COPY
    }

    fn render(&self, _: &Generator, target_dir: &Path, payload: &Payload) -> Result<()> {
        let Payload::Copy(params) = payload else {
            return Err(mismatch("copy", payload));
        };

        let target = target_dir.join(&params.name);
        self.copy(&params.src, &target).map_err(|e| Error::Copy {
            from: params.src.clone(),
            to: target.clone(),
            source: Box::new(e),
        })
    }
}
