//! crates/engine/src/ops.rs
//!
//! Sequential tree operations: existence probing, directory creation,
//! touch, removal, mode and ownership changes, rename.
//!
//! Every operation that accepts multiple paths processes them in order and
//! stops at the first failure. Recursive forms drive the workspace walker;
//! removal and ownership changes run contents-first so children are handled
//! before their parent, mode changes run pre-order so a directory is opened
//! up before its contents are touched.

use std::fs;
use std::path::{Path, PathBuf};

use filetime::FileTime;
use fskit_path::exceeds_path_limit;
use fskit_walk::{WalkBuilder, WalkOrder};

use crate::copy::{self, CopyOptions};
use crate::error::FsError;

/// Reports whether every path in `paths` exists.
///
/// Returns `false` as soon as one path is missing. Symlinks are followed,
/// so a dangling link counts as missing.
///
/// # Errors
///
/// Returns [`FsError`] with a `PathTooLong` kind when any path exceeds the
/// platform length limit, checked before the path is probed.
pub fn exists<I, P>(paths: I) -> Result<bool, FsError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    for path in paths {
        let path = path.as_ref();
        if exceeds_path_limit(path) {
            return Err(FsError::path_too_long(path.to_path_buf()));
        }
        if !path.exists() {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Creates every directory in `paths`, including missing parents.
///
/// Existing directories are left untouched, so the operation is idempotent.
///
/// # Errors
///
/// Returns [`FsError`] when a directory cannot be created.
pub fn mkdir<I, P>(paths: I) -> Result<(), FsError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    for path in paths {
        let path = path.as_ref();
        fs::create_dir_all(path)
            .map_err(|error| FsError::io("create directory", path.to_path_buf(), error))?;
    }
    Ok(())
}

/// Like [`mkdir`], but newly created directories receive `mode` (still
/// subject to the process umask). On platforms without Unix permission
/// bits the mode is ignored.
///
/// # Errors
///
/// Returns [`FsError`] when a directory cannot be created.
pub fn mkdir_mode<I, P>(paths: I, mode: u32) -> Result<(), FsError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    for path in paths {
        let path = path.as_ref();
        if path.is_dir() {
            continue;
        }
        create_dir_all_mode(path, mode)?;
    }
    Ok(())
}

#[cfg(unix)]
fn create_dir_all_mode(path: &Path, mode: u32) -> Result<(), FsError> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new()
        .recursive(true)
        .mode(mode)
        .create(path)
        .map_err(|error| FsError::io("create directory", path.to_path_buf(), error))
}

#[cfg(not(unix))]
fn create_dir_all_mode(path: &Path, mode: u32) -> Result<(), FsError> {
    let _ = mode;
    fs::DirBuilder::new()
        .recursive(true)
        .create(path)
        .map_err(|error| FsError::io("create directory", path.to_path_buf(), error))
}

/// Creates every missing path in `paths` as an empty file and stamps
/// access and modification times.
///
/// A `None` modification time means now; a `None` access time reuses the
/// modification time.
///
/// # Errors
///
/// Returns [`FsError`] when a file cannot be created or its times cannot
/// be set.
pub fn touch<I, P>(paths: I, mtime: Option<FileTime>, atime: Option<FileTime>) -> Result<(), FsError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    for path in paths {
        let path = path.as_ref();
        if fs::symlink_metadata(path).is_err() {
            fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(false)
                .open(path)
                .map_err(|error| FsError::io("touch", path.to_path_buf(), error))?;
        }
        let mtime = mtime.unwrap_or_else(FileTime::now);
        let atime = atime.unwrap_or(mtime);
        fskit_meta::set_entry_times(path, atime, mtime)?;
    }
    Ok(())
}

/// Removes every path in `paths`.
///
/// Symlinks and files are unlinked, directories are removed recursively
/// with every descendant handled before its parent. Missing paths are
/// ignored, as are entries that vanish mid-removal.
///
/// # Errors
///
/// Returns [`FsError`] when an entry that still exists cannot be removed
/// or a directory cannot be enumerated.
pub fn remove<I, P>(paths: I) -> Result<(), FsError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    for path in paths {
        remove_entry(path.as_ref())?;
    }
    Ok(())
}

pub(crate) fn remove_entry(path: &Path) -> Result<(), FsError> {
    let Ok(metadata) = fs::symlink_metadata(path) else {
        return Ok(());
    };
    if metadata.file_type().is_dir() {
        remove_tree(path)
    } else {
        unlink(path)
    }
}

fn remove_tree(path: &Path) -> Result<(), FsError> {
    let walker = WalkBuilder::new(path)
        .order(WalkOrder::ContentsFirst)
        .include_root(true)
        .build()?;
    for entry in walker {
        let entry = entry?;
        if entry.kind().is_dir() {
            remove_dir(entry.path())?;
        } else {
            unlink(entry.path())?;
        }
    }
    Ok(())
}

fn remove_dir(path: &Path) -> Result<(), FsError> {
    match fs::remove_dir(path) {
        Ok(()) => Ok(()),
        Err(_) if fs::symlink_metadata(path).is_err() => Ok(()),
        Err(error) => Err(FsError::io("remove directory", path.to_path_buf(), error)),
    }
}

fn unlink(path: &Path) -> Result<(), FsError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(_) if fs::symlink_metadata(path).is_err() => Ok(()),
        Err(error) => Err(FsError::io("remove file", path.to_path_buf(), error)),
    }
}

/// Applies `mode & !umask` to every path in `paths`.
///
/// With `recursive` set, directory contents are re-moded as well, each
/// directory before its contents. Recursion never descends through
/// symlinked directories; a symlink encountered during recursion re-modes
/// its referent, since the platform primitive follows links.
///
/// # Errors
///
/// Returns [`FsError`] when a mode cannot be applied or a directory cannot
/// be enumerated.
pub fn chmod<I, P>(paths: I, mode: u32, umask: u32, recursive: bool) -> Result<(), FsError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let effective = mode & !umask;
    for path in paths {
        let path = path.as_ref();
        fskit_meta::set_mode(path, effective)?;
        if recursive && is_real_dir(path) {
            let walker = WalkBuilder::new(path).include_root(false).build()?;
            for entry in walker {
                let entry = entry?;
                fskit_meta::set_mode(entry.path(), effective)?;
            }
        }
    }
    Ok(())
}

/// Changes the owner of every path in `paths` to `user`, given as a name
/// or a numeric id.
///
/// With `recursive` set, directory contents are processed first, each
/// child before its parent. Symlink entries change the link itself rather
/// than the referent.
///
/// # Errors
///
/// Returns [`FsError`] when the user cannot be resolved or an ownership
/// change fails.
pub fn chown<I, P>(paths: I, user: &str, recursive: bool) -> Result<(), FsError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let uid = fskit_meta::resolve_user(user)
        .map_err(|error| FsError::io("resolve user", PathBuf::from(user), error))?;
    for path in paths {
        change_owner_entry(path.as_ref(), Some(uid), None, recursive)?;
    }
    Ok(())
}

/// Changes the group of every path in `paths` to `group`, given as a name
/// or a numeric id.
///
/// Recursion and symlink handling match [`chown`].
///
/// # Errors
///
/// Returns [`FsError`] when the group cannot be resolved or an ownership
/// change fails.
pub fn chgrp<I, P>(paths: I, group: &str, recursive: bool) -> Result<(), FsError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let gid = fskit_meta::resolve_group(group)
        .map_err(|error| FsError::io("resolve group", PathBuf::from(group), error))?;
    for path in paths {
        change_owner_entry(path.as_ref(), None, Some(gid), recursive)?;
    }
    Ok(())
}

fn change_owner_entry(
    path: &Path,
    uid: Option<u32>,
    gid: Option<u32>,
    recursive: bool,
) -> Result<(), FsError> {
    if recursive && is_real_dir(path) {
        let walker = WalkBuilder::new(path)
            .order(WalkOrder::ContentsFirst)
            .include_root(false)
            .build()?;
        for entry in walker {
            let entry = entry?;
            fskit_meta::set_owner(entry.path(), uid, gid, !entry.kind().is_symlink())?;
        }
    }
    let is_link =
        fs::symlink_metadata(path).is_ok_and(|metadata| metadata.file_type().is_symlink());
    fskit_meta::set_owner(path, uid, gid, !is_link)?;
    Ok(())
}

fn is_real_dir(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|metadata| metadata.file_type().is_dir())
}

/// Moves `origin` to `target`.
///
/// Without `overwrite`, an existing target fails with `AlreadyExists`
/// before anything is moved. When the platform rename fails and the origin
/// is a regular file, the move falls back to a forced copy followed by
/// removal of the origin, which covers cross-device moves; directories get
/// no such fallback.
///
/// # Errors
///
/// Returns [`FsError`] when the target exceeds the platform path limit,
/// already exists without `overwrite`, or when both the rename and the
/// copy fallback fail.
pub fn rename(origin: &Path, target: &Path, overwrite: bool) -> Result<(), FsError> {
    if !overwrite {
        if exceeds_path_limit(target) {
            return Err(FsError::path_too_long(target.to_path_buf()));
        }
        if target.exists() {
            return Err(FsError::already_exists(target.to_path_buf()));
        }
    }
    match fs::rename(origin, target) {
        Ok(()) => Ok(()),
        Err(error) => {
            if origin.is_dir() {
                return Err(FsError::io("rename directory", origin.to_path_buf(), error));
            }
            copy::copy_file(origin, target, CopyOptions::new().force(true))?;
            remove_entry(origin)
        }
    }
}
