//! crates/engine/src/copy.rs
//!
//! Single-file copy with a freshness check.
//!
//! # Design
//!
//! A copy is skipped when the target already exists and is at least as new
//! as the origin, unless the caller forces it. Origins carrying a custom
//! URI scheme are always copied and skip the byte-count verification that
//! local origins get, since their reported size may not be authoritative.

use std::fs;
use std::io;
use std::path::Path;

use filetime::FileTime;
use fskit_path::PathScheme;

use crate::atomic::StageGuard;
use crate::error::FsError;
use crate::trace;

/// Options governing [`copy_file`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CopyOptions {
    force: bool,
}

impl CopyOptions {
    /// Creates options with the freshness check enabled.
    #[must_use]
    pub const fn new() -> Self {
        Self { force: false }
    }

    /// Copies even when the target is at least as new as the origin.
    #[must_use]
    pub const fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Returns whether the freshness check is bypassed.
    #[must_use]
    pub const fn is_forced(&self) -> bool {
        self.force
    }
}

/// Outcome of a [`copy_file`] call.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CopyOutcome {
    /// The origin's bytes were written to the target.
    Copied {
        /// Number of bytes streamed.
        bytes: u64,
    },
    /// The target was at least as new as the origin and was left unchanged.
    SkippedNotNewer,
}

impl CopyOutcome {
    /// Returns `true` when bytes were written.
    #[must_use]
    pub const fn is_copied(&self) -> bool {
        matches!(self, Self::Copied { .. })
    }
}

/// Copies `origin` to `target`, creating the target's parent directories.
///
/// Local origins must be regular files. The target is truncated and
/// rewritten in place; the origin's executable bits are merged into the
/// target's mode on a best-effort basis after the copy.
///
/// # Errors
///
/// Returns [`FsError`] when a local origin is not a regular file, when
/// either side cannot be opened, when streaming fails, or when a local
/// origin's size does not match the byte count that reached the target.
pub fn copy_file(origin: &Path, target: &Path, options: CopyOptions) -> Result<CopyOutcome, FsError> {
    copy_file_inner(origin, target, options, false)
}

/// Like [`copy_file`], but an existing target is replaced through a staging
/// file and an atomic rename instead of in-place truncation.
pub(crate) fn copy_file_staged(
    origin: &Path,
    target: &Path,
    options: CopyOptions,
) -> Result<CopyOutcome, FsError> {
    copy_file_inner(origin, target, options, true)
}

fn copy_file_inner(
    origin: &Path,
    target: &Path,
    options: CopyOptions,
    staged: bool,
) -> Result<CopyOutcome, FsError> {
    let scheme = scheme_of(origin);
    if scheme.is_local() && !origin.is_file() {
        return Err(FsError::not_found(origin.to_path_buf()));
    }

    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            fs::create_dir_all(parent)
                .map_err(|error| FsError::io("create directory", parent.to_path_buf(), error))?;
        }
    }

    if !options.is_forced() && scheme.is_local() && target_is_fresh(origin, target) {
        trace::copy_skipped(origin, target);
        return Ok(CopyOutcome::SkippedNotNewer);
    }

    let bytes = if staged && target.exists() {
        stream_copy_staged(origin, target)?
    } else {
        stream_copy(origin, target)?
    };

    if !target.exists() {
        return Err(FsError::io(
            "copy contents to",
            target.to_path_buf(),
            io::Error::new(io::ErrorKind::NotFound, "target disappeared after copy"),
        ));
    }

    if let Ok(metadata) = fs::metadata(origin) {
        let _ = fskit_meta::merge_execute_bits(fskit_meta::mode_of(&metadata), target);
    }

    if scheme.is_local() {
        let expected = fs::metadata(origin)
            .map_err(|error| FsError::io("inspect metadata for", origin.to_path_buf(), error))?
            .len();
        if bytes != expected {
            return Err(FsError::partial_write(target.to_path_buf(), bytes, expected));
        }
    }

    trace::copy_performed(origin, target, bytes);
    Ok(CopyOutcome::Copied { bytes })
}

/// Derives the scheme tag once; paths that are not valid UTF-8 cannot spell
/// a scheme prefix and are treated as local.
pub(crate) fn scheme_of(path: &Path) -> PathScheme {
    path.to_str().map_or(PathScheme::Local, PathScheme::of)
}

fn target_is_fresh(origin: &Path, target: &Path) -> bool {
    let Ok(target_metadata) = fs::metadata(target) else {
        return false;
    };
    let Ok(origin_metadata) = fs::metadata(origin) else {
        return false;
    };
    FileTime::from_last_modification_time(&origin_metadata)
        <= FileTime::from_last_modification_time(&target_metadata)
}

fn stream_copy(origin: &Path, target: &Path) -> Result<u64, FsError> {
    let mut reader = open_origin(origin)?;
    let mut writer = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(target)
        .map_err(|error| FsError::io("open target file", target.to_path_buf(), error))?;
    io::copy(&mut reader, &mut writer)
        .map_err(|error| FsError::io("copy contents to", target.to_path_buf(), error))
}

fn stream_copy_staged(origin: &Path, target: &Path) -> Result<u64, FsError> {
    let mut reader = open_origin(origin)?;
    let (guard, mut writer) = StageGuard::new(target)?;
    let bytes = io::copy(&mut reader, &mut writer).map_err(|error| {
        FsError::io(
            "copy contents to",
            guard.staging_path().to_path_buf(),
            error,
        )
    })?;
    drop(writer);
    guard.commit()?;
    Ok(bytes)
}

fn open_origin(origin: &Path) -> Result<fs::File, FsError> {
    fs::File::open(origin)
        .map_err(|error| FsError::io("open origin file", origin.to_path_buf(), error))
}
