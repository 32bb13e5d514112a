//! crates/engine/src/links.rs
//!
//! Symlink and hard link management.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::FsError;
use crate::ops;

/// Windows error code for symlink creation without the required privilege.
const ERROR_PRIVILEGE_NOT_HELD: i32 = 1314;

/// Creates a symlink at `link` pointing to `origin`.
///
/// The link's parent directory is created if missing. An existing symlink
/// already pointing at `origin` is left alone; one pointing elsewhere is
/// replaced.
///
/// # Errors
///
/// Returns [`FsError`] when the parent cannot be created, an existing link
/// cannot be removed, or the platform refuses the link. A privilege
/// refusal on platforms restricting symlink creation surfaces as a
/// dedicated permission error instead of a plain I/O failure.
pub fn symlink(origin: &Path, link: &Path) -> Result<(), FsError> {
    if let Some(parent) = link.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|error| FsError::io("create directory", parent.to_path_buf(), error))?;
        }
    }

    if fs::symlink_metadata(link).is_ok_and(|metadata| metadata.file_type().is_symlink()) {
        if fs::read_link(link).is_ok_and(|existing| existing == origin) {
            return Ok(());
        }
        ops::remove_entry(link)?;
    }

    create_symlink(origin, link).map_err(|error| symlink_error(origin, link, error))
}

#[cfg(unix)]
fn create_symlink(origin: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(origin, link)
}

#[cfg(windows)]
fn create_symlink(origin: &Path, link: &Path) -> io::Result<()> {
    if origin.is_dir() {
        std::os::windows::fs::symlink_dir(origin, link)
    } else {
        std::os::windows::fs::symlink_file(origin, link)
    }
}

#[cfg(not(any(unix, windows)))]
fn create_symlink(_origin: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symlinks are not supported on this platform",
    ))
}

fn symlink_error(origin: &Path, link: &Path, error: io::Error) -> FsError {
    if cfg!(windows) && error.raw_os_error() == Some(ERROR_PRIVILEGE_NOT_HELD) {
        FsError::symlink_permission(origin.to_path_buf(), link.to_path_buf(), error)
    } else {
        FsError::io("create symlink", link.to_path_buf(), error)
    }
}

/// Creates a hard link to `origin` at every path in `targets`.
///
/// A target that already shares the origin's inode is left alone; any
/// other existing target file is removed first.
///
/// # Errors
///
/// Returns [`FsError`] with a `NotFound` kind when the origin is not a
/// regular file, and an I/O kind when a target cannot be replaced or
/// linked.
pub fn hardlink<I, P>(origin: &Path, targets: I) -> Result<(), FsError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    if !origin.is_file() {
        return Err(FsError::not_found(origin.to_path_buf()));
    }
    for target in targets {
        let target = target.as_ref();
        if target.is_file() {
            if shares_inode(origin, target) {
                continue;
            }
            ops::remove_entry(target)?;
        }
        fs::hard_link(origin, target)
            .map_err(|error| FsError::io("create hard link", target.to_path_buf(), error))?;
    }
    Ok(())
}

#[cfg(unix)]
fn shares_inode(origin: &Path, target: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    let Ok(origin_metadata) = fs::metadata(origin) else {
        return false;
    };
    let Ok(target_metadata) = fs::metadata(target) else {
        return false;
    };
    origin_metadata.ino() == target_metadata.ino()
        && origin_metadata.dev() == target_metadata.dev()
}

#[cfg(not(unix))]
fn shares_inode(_origin: &Path, _target: &Path) -> bool {
    false
}

/// Resolves a link target.
///
/// Without `canonicalize`, answers only for symlinks and returns the
/// stored link target verbatim. With `canonicalize`, resolves any existing
/// path to its canonical form. Returns `None` for everything else.
#[must_use]
pub fn read_link(path: &Path, canonicalize: bool) -> Option<PathBuf> {
    if canonicalize {
        if !path.exists() {
            return None;
        }
        return fs::canonicalize(path).ok();
    }
    let metadata = fs::symlink_metadata(path).ok()?;
    if metadata.file_type().is_symlink() {
        fs::read_link(path).ok()
    } else {
        None
    }
}
