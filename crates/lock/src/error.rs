//! crates/lock/src/error.rs
//!
//! Failure cases for lock-file management.
//!
//! Contention is not represented here: a lost acquisition surfaces as
//! `Ok(false)` from `lock`, and errors are reserved for the directory
//! validation and the open/create ladder.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while validating the lock directory or opening the lock
/// file.
#[derive(Debug, Error)]
pub enum LockError {
    /// The configured lock directory does not exist.
    #[error("lock directory '{}' does not exist", path.display())]
    MissingDirectory {
        /// Directory that was expected to hold lock files.
        path: PathBuf,
    },
    /// The configured lock directory rejected write access.
    #[error("lock directory '{}' is not writable", path.display())]
    UnwritableDirectory {
        /// Directory that rejected write access.
        path: PathBuf,
    },
    /// The lock file could not be opened or created.
    #[error("failed to open lock file '{}': {source}", path.display())]
    Open {
        /// Path of the lock file.
        path: PathBuf,
        /// Failure reported by the final open attempt.
        source: io::Error,
    },
}
