//! crates/engine/src/atomic.rs
//!
//! Atomic whole-file writes.
//!
//! # Design
//!
//! Content is staged in a temporary file inside the destination's own
//! directory and reaches the final name only through a rename, which keeps
//! the staging file and the destination on one filesystem. Readers of the
//! destination therefore observe either the previous complete content or
//! the new complete content, never a partial write and never a transient
//! absence.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::copy::scheme_of;
use crate::error::FsError;
use crate::trace;

/// Permission bits applied to a dumped file before the final rename.
const DUMP_FILE_MODE: u32 = 0o666;

/// Upper bound on name-collision retries for custom-scheme directories.
const TEMP_NAME_ATTEMPTS: usize = 10;

static NEXT_TEMP_FILE_ID: AtomicUsize = AtomicUsize::new(0);

/// Writes `content` to `path` as one atomic replacement.
///
/// The parent directory is created when missing. A temporary file orphaned
/// by a failed write is left in place for external cleanup; it never
/// occupies the final name.
///
/// # Errors
///
/// Returns [`FsError`] when the parent directory cannot be created or is
/// not writable, when the temporary file cannot be created or written, or
/// when the final rename fails.
pub fn dump_file(path: &Path, content: &[u8]) -> Result<(), FsError> {
    let parent = parent_directory(path)?;
    ensure_writable_directory(&parent)?;

    let temp_path = temp_file_in(&parent, &staging_prefix(path))?;
    fs::write(&temp_path, content)
        .map_err(|error| FsError::io("write to temporary file", temp_path.clone(), error))?;
    let _ = fskit_meta::set_mode(&temp_path, DUMP_FILE_MODE);
    fs::rename(&temp_path, path)
        .map_err(|error| FsError::io("move temporary file onto", path.to_path_buf(), error))?;
    trace::dump_committed(path, content.len());
    Ok(())
}

/// Appends `content` to `path`, creating the file and its parent directory
/// when missing.
///
/// # Errors
///
/// Returns [`FsError`] when the parent directory cannot be created or is
/// not writable, or when the file cannot be opened or written.
pub fn append_to_file(path: &Path, content: &[u8]) -> Result<(), FsError> {
    let parent = parent_directory(path)?;
    ensure_writable_directory(&parent)?;

    let mut file = fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map_err(|error| FsError::io("open for appending", path.to_path_buf(), error))?;
    file.write_all(content)
        .map_err(|error| FsError::io("append to", path.to_path_buf(), error))
}

/// Creates a uniquely named empty file inside `dir` and returns its path.
///
/// Local directories delegate to the platform temp-file primitive. For a
/// directory carrying a custom URI scheme the name is synthesized from the
/// process id, clock, and a sequence counter, with up to ten
/// exclusive-create attempts before giving up. The bound accepts a small
/// residual collision chance instead of guaranteeing success.
///
/// # Errors
///
/// Returns [`FsError`] when no file could be created.
pub fn temp_file_in(dir: &Path, prefix: &str) -> Result<PathBuf, FsError> {
    if scheme_of(dir).is_local() {
        let temp = tempfile::Builder::new()
            .prefix(prefix)
            .tempfile_in(dir)
            .map_err(|error| FsError::io("create temporary file in", dir.to_path_buf(), error))?;
        return temp
            .into_temp_path()
            .keep()
            .map_err(|error| FsError::io("retain temporary file in", dir.to_path_buf(), error.error));
    }
    create_unique_in(dir, prefix)
}

fn create_unique_in(dir: &Path, prefix: &str) -> Result<PathBuf, FsError> {
    for _ in 0..TEMP_NAME_ATTEMPTS {
        let candidate = dir.join(format!("{prefix}{}", next_temp_token()));
        if fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
            .is_ok()
        {
            return Ok(candidate);
        }
    }
    Err(FsError::io(
        "create temporary file in",
        dir.to_path_buf(),
        io::Error::other("temporary file could not be created"),
    ))
}

fn next_temp_token() -> String {
    let unique = NEXT_TEMP_FILE_ID.fetch_add(1, AtomicOrdering::Relaxed);
    let clock = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.subsec_nanos());
    format!("{}-{clock:x}-{unique:x}", process::id())
}

fn staging_prefix(path: &Path) -> String {
    path.file_name().map_or_else(
        || "dump".to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

pub(crate) fn parent_directory(path: &Path) -> Result<PathBuf, FsError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => Ok(parent.to_path_buf()),
        Some(_) => Ok(PathBuf::from(".")),
        None => Err(FsError::io(
            "resolve parent directory of",
            path.to_path_buf(),
            io::Error::new(io::ErrorKind::InvalidInput, "path has no parent directory"),
        )),
    }
}

pub(crate) fn ensure_writable_directory(dir: &Path) -> Result<(), FsError> {
    if !dir.is_dir() {
        return fs::create_dir_all(dir)
            .map_err(|error| FsError::io("create directory", dir.to_path_buf(), error));
    }
    if directory_is_writable(dir) {
        Ok(())
    } else {
        Err(FsError::io(
            "write to directory",
            dir.to_path_buf(),
            io::Error::new(io::ErrorKind::PermissionDenied, "directory is not writable"),
        ))
    }
}

#[cfg(unix)]
fn directory_is_writable(dir: &Path) -> bool {
    rustix::fs::access(dir, rustix::fs::Access::WRITE_OK).is_ok()
}

#[cfg(not(unix))]
fn directory_is_writable(dir: &Path) -> bool {
    fs::metadata(dir).is_ok_and(|metadata| !metadata.permissions().readonly())
}

/// Staging file that reaches its destination only through
/// [`StageGuard::commit`]. Dropping an uncommitted guard removes the
/// staging file.
pub(crate) struct StageGuard {
    final_path: PathBuf,
    temp_path: PathBuf,
    committed: bool,
}

impl StageGuard {
    /// Opens a fresh staging file beside `destination`.
    pub(crate) fn new(destination: &Path) -> Result<(Self, fs::File), FsError> {
        loop {
            let temp_path = staging_path_for(destination);
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&temp_path)
            {
                Ok(file) => {
                    return Ok((
                        Self {
                            final_path: destination.to_path_buf(),
                            temp_path,
                            committed: false,
                        },
                        file,
                    ));
                }
                Err(error) if error.kind() == io::ErrorKind::AlreadyExists => {}
                Err(error) => {
                    return Err(FsError::io("create staging file", temp_path, error));
                }
            }
        }
    }

    /// Renames the staging file onto the destination.
    pub(crate) fn commit(mut self) -> Result<(), FsError> {
        match fs::rename(&self.temp_path, &self.final_path) {
            Ok(()) => {}
            Err(error) if error.kind() == io::ErrorKind::AlreadyExists => {
                remove_existing_destination(&self.final_path)?;
                fs::rename(&self.temp_path, &self.final_path).map_err(|rename_error| {
                    FsError::io(
                        "finalise staging file",
                        self.temp_path.clone(),
                        rename_error,
                    )
                })?;
            }
            Err(error) if error.kind() == io::ErrorKind::CrossesDevices => {
                fs::copy(&self.temp_path, &self.final_path).map_err(|copy_error| {
                    FsError::io("finalise staging file", self.final_path.clone(), copy_error)
                })?;
                fs::remove_file(&self.temp_path).map_err(|remove_error| {
                    FsError::io(
                        "finalise staging file",
                        self.temp_path.clone(),
                        remove_error,
                    )
                })?;
            }
            Err(error) => {
                return Err(FsError::io(
                    "finalise staging file",
                    self.temp_path.clone(),
                    error,
                ));
            }
        }
        self.committed = true;
        Ok(())
    }

    pub(crate) fn staging_path(&self) -> &Path {
        &self.temp_path
    }
}

impl Drop for StageGuard {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.temp_path);
        }
    }
}

fn staging_path_for(destination: &Path) -> PathBuf {
    let file_name = destination.file_name().map_or_else(
        || "staging".to_string(),
        |name| name.to_string_lossy().into_owned(),
    );
    let temp_name = format!(
        ".fskit-tmp-{file_name}-{}-{}",
        process::id(),
        NEXT_TEMP_FILE_ID.fetch_add(1, AtomicOrdering::Relaxed)
    );
    destination.with_file_name(temp_name)
}

fn remove_existing_destination(path: &Path) -> Result<(), FsError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(error) => Err(FsError::io(
            "remove existing destination",
            path.to_path_buf(),
            error,
        )),
    }
}
