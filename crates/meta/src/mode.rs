//! crates/meta/src/mode.rs
//!
//! Permission-bit helpers.
//!
//! On Unix these operate on the low mode bits. On other platforms modes are
//! emulated through the read-only attribute: writable entries report `0o666`
//! and read-only entries `0o444`, and only the owner-write bit of a
//! requested mode has any effect.

use std::fs;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use crate::error::MetaError;

/// The owner, group, and other execute bits.
pub const EXECUTE_BITS: u32 = 0o111;

/// Returns the permission bits captured in `metadata`.
#[cfg(unix)]
#[must_use]
pub fn mode_of(metadata: &fs::Metadata) -> u32 {
    metadata.permissions().mode() & 0o7777
}

/// Returns the permission bits captured in `metadata`.
#[cfg(not(unix))]
#[must_use]
pub fn mode_of(metadata: &fs::Metadata) -> u32 {
    if metadata.permissions().readonly() {
        0o444
    } else {
        0o666
    }
}

/// Sets the permission bits of `path`, following symlinks.
#[cfg(unix)]
pub fn set_mode(path: &Path, mode: u32) -> Result<(), MetaError> {
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
        .map_err(|error| MetaError::new("change permissions of", path, error))
}

/// Sets the permission bits of `path`, following symlinks.
#[cfg(not(unix))]
pub fn set_mode(path: &Path, mode: u32) -> Result<(), MetaError> {
    let metadata = inspect(path)?;
    let mut permissions = metadata.permissions();
    permissions.set_readonly(mode & 0o200 == 0);
    fs::set_permissions(path, permissions)
        .map_err(|error| MetaError::new("change permissions of", path, error))
}

/// ORs the executable bits of `origin_mode` into the current mode of
/// `target` and returns the resulting mode.
///
/// Used after a file copy so an executable origin produces an executable
/// target without clobbering the target's other bits.
#[cfg(unix)]
pub fn merge_execute_bits(origin_mode: u32, target: &Path) -> Result<u32, MetaError> {
    let current = mode_of(&inspect(target)?);
    let merged = current | (origin_mode & EXECUTE_BITS);
    if merged != current {
        set_mode(target, merged)?;
    }
    Ok(merged)
}

/// ORs the executable bits of `origin_mode` into the current mode of
/// `target` and returns the resulting mode.
///
/// Execute bits do not exist here, so the target is left untouched.
#[cfg(not(unix))]
pub fn merge_execute_bits(origin_mode: u32, target: &Path) -> Result<u32, MetaError> {
    let _ = origin_mode;
    Ok(mode_of(&inspect(target)?))
}

fn inspect(path: &Path) -> Result<fs::Metadata, MetaError> {
    fs::metadata(path).map_err(|error| MetaError::new("inspect metadata for", path, error))
}
