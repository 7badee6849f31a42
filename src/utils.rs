//! Filesystem helpers shared by the handlers.
//! Every helper maps failures to [`Error::Filesystem`] with the offending path.

use log::debug;
use std::fs::{self, File, OpenOptions};
use std::path::Path;

use crate::error::{Error, FsOperation, Result};
use crate::node::FileMode;

/// Permission bits of `metadata`.
#[cfg(unix)]
pub fn mode_of(metadata: &fs::Metadata) -> FileMode {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
pub fn mode_of(metadata: &fs::Metadata) -> FileMode {
    if metadata.permissions().readonly() {
        0o444
    } else {
        0o644
    }
}

/// Sets the exact permission bits of `path`, regardless of the process umask.
#[cfg(unix)]
pub fn set_mode(path: &Path, mode: FileMode) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
        .map_err(Error::fs(FsOperation::SetPermissions, path))
}

#[cfg(not(unix))]
pub fn set_mode(_path: &Path, _mode: FileMode) -> Result<()> {
    Ok(())
}

/// Creates `path` and any missing ancestors, each with `mode`.
///
/// Directories that already exist keep their mode. Modes are applied once
/// everything is created, deepest first, so a read-only `mode` still works.
pub fn create_dir_all(path: &Path, mode: FileMode) -> Result<()> {
    let mut missing = Vec::new();
    let mut current = Some(path);
    while let Some(dir) = current {
        if dir.as_os_str().is_empty() || dir.is_dir() {
            break;
        }
        missing.push(dir);
        current = dir.parent();
    }

    for dir in missing.iter().rev() {
        debug!("Creating directory {} ({:o})", dir.display(), mode);
        fs::create_dir(dir).map_err(Error::fs(FsOperation::CreateDir, dir))?;
    }
    for dir in &missing {
        set_mode(dir, mode)?;
    }
    Ok(())
}

/// Removes `path` if it exists, then creates it as an empty directory.
pub fn recreate_dir(path: &Path) -> Result<()> {
    if path.exists() {
        debug!("Removing existing directory {}", path.display());
        fs::remove_dir_all(path).map_err(Error::fs(FsOperation::Remove, path))?;
    }
    fs::create_dir_all(path).map_err(Error::fs(FsOperation::CreateDir, path))
}

/// Opens `path` for writing, truncating it, with `mode` as its permission bits.
pub fn create_file(path: &Path, mode: FileMode) -> Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    let file = options.open(path).map_err(Error::fs(FsOperation::Create, path))?;
    set_mode(path, mode)?;
    Ok(file)
}

/// Writes `content` to `path` with `mode` as its permission bits.
pub fn write_file(path: &Path, content: &[u8], mode: FileMode) -> Result<()> {
    use std::io::Write;

    debug!("Writing file {} ({:o})", path.display(), mode);
    let mut file = create_file(path, mode)?;
    file.write_all(content).map_err(Error::fs(FsOperation::Write, path))
}

pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(Error::fs(FsOperation::Read, path))
}

pub fn metadata(path: &Path) -> Result<fs::Metadata> {
    fs::metadata(path).map_err(Error::fs(FsOperation::Stat, path))
}
