//! crates/meta/src/owner.rs
//!
//! Ownership primitives: name resolution and link-aware owner changes.

use std::io;
use std::path::Path;

use crate::error::MetaError;

/// Resolves a user given by name or numeric id to a uid.
///
/// Numeric input is accepted verbatim so callers can address users absent
/// from the account database.
#[cfg(unix)]
pub fn resolve_user(spec: &str) -> io::Result<u32> {
    if let Ok(uid) = spec.parse::<u32>() {
        return Ok(uid);
    }
    match nix::unistd::User::from_name(spec) {
        Ok(Some(user)) => Ok(user.uid.as_raw()),
        Ok(None) => Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("unknown user '{spec}'"),
        )),
        Err(errno) => Err(io::Error::from(errno)),
    }
}

/// Resolves a group given by name or numeric id to a gid.
#[cfg(unix)]
pub fn resolve_group(spec: &str) -> io::Result<u32> {
    if let Ok(gid) = spec.parse::<u32>() {
        return Ok(gid);
    }
    match nix::unistd::Group::from_name(spec) {
        Ok(Some(group)) => Ok(group.gid.as_raw()),
        Ok(None) => Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("unknown group '{spec}'"),
        )),
        Err(errno) => Err(io::Error::from(errno)),
    }
}

/// Resolves a user given by name or numeric id to a uid.
#[cfg(not(unix))]
pub fn resolve_user(spec: &str) -> io::Result<u32> {
    spec.parse::<u32>().map_err(|_| {
        io::Error::new(
            io::ErrorKind::Unsupported,
            "user name resolution is not supported on this platform",
        )
    })
}

/// Resolves a group given by name or numeric id to a gid.
#[cfg(not(unix))]
pub fn resolve_group(spec: &str) -> io::Result<u32> {
    spec.parse::<u32>().map_err(|_| {
        io::Error::new(
            io::ErrorKind::Unsupported,
            "group name resolution is not supported on this platform",
        )
    })
}

/// Changes the owner and/or group of `path`.
///
/// With `follow_symlinks` disabled a symlink entry itself is re-owned
/// rather than its referent. Passing `None` for both ids is a no-op.
#[cfg(unix)]
pub fn set_owner(
    path: &Path,
    uid: Option<u32>,
    gid: Option<u32>,
    follow_symlinks: bool,
) -> Result<(), MetaError> {
    use rustix::fs::{AtFlags, CWD, chownat};
    use rustix::process::{RawGid, RawUid};

    if uid.is_none() && gid.is_none() {
        return Ok(());
    }

    let owner = uid.map(|id| uid_from_raw(id as RawUid));
    let group = gid.map(|id| gid_from_raw(id as RawGid));
    let flags = if follow_symlinks {
        AtFlags::empty()
    } else {
        AtFlags::SYMLINK_NOFOLLOW
    };

    chownat(CWD, path, owner, group, flags)
        .map_err(|error| MetaError::new("change ownership of", path, io::Error::from(error)))
}

/// Changes the owner and/or group of `path`.
#[cfg(not(unix))]
pub fn set_owner(
    path: &Path,
    uid: Option<u32>,
    gid: Option<u32>,
    follow_symlinks: bool,
) -> Result<(), MetaError> {
    let _ = follow_symlinks;
    if uid.is_none() && gid.is_none() {
        return Ok(());
    }
    Err(MetaError::new(
        "change ownership of",
        path,
        io::Error::new(
            io::ErrorKind::Unsupported,
            "changing ownership is not supported on this platform",
        ),
    ))
}

#[cfg(unix)]
fn uid_from_raw(raw: rustix::process::RawUid) -> rustix::fs::Uid {
    rustix::fs::Uid::from_raw(raw)
}

#[cfg(unix)]
fn gid_from_raw(raw: rustix::process::RawGid) -> rustix::fs::Gid {
    rustix::fs::Gid::from_raw(raw)
}
