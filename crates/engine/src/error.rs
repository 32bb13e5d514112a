//! crates/engine/src/error.rs
//!
//! Error type shared by every engine operation.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use fskit_meta::MetaError;
use fskit_path::PATH_LENGTH_LIMIT;
use fskit_walk::WalkError;

/// Error produced when a filesystem operation fails.
#[derive(Debug)]
pub struct FsError {
    kind: FsErrorKind,
}

impl FsError {
    fn new(kind: FsErrorKind) -> Self {
        Self { kind }
    }

    /// Constructs an error for a required source path that does not exist.
    #[must_use]
    pub fn not_found(path: PathBuf) -> Self {
        Self::new(FsErrorKind::NotFound { path })
    }

    /// Constructs an I/O error with action context.
    #[must_use]
    pub fn io(action: &'static str, path: PathBuf, source: io::Error) -> Self {
        Self::new(FsErrorKind::Io {
            action,
            path,
            source,
        })
    }

    /// Constructs an error for a copy that moved fewer bytes than the origin
    /// holds.
    #[must_use]
    pub fn partial_write(path: PathBuf, written: u64, expected: u64) -> Self {
        Self::new(FsErrorKind::PartialWrite {
            path,
            written,
            expected,
        })
    }

    /// Constructs an error for a path exceeding the platform length limit.
    #[must_use]
    pub fn path_too_long(path: PathBuf) -> Self {
        Self::new(FsErrorKind::PathTooLong {
            path,
            limit: PATH_LENGTH_LIMIT,
        })
    }

    /// Constructs an error for a rename target that already exists.
    #[must_use]
    pub fn already_exists(path: PathBuf) -> Self {
        Self::new(FsErrorKind::AlreadyExists { path })
    }

    /// Constructs an error for symlink creation rejected by platform policy.
    #[must_use]
    pub fn symlink_permission(origin: PathBuf, link: PathBuf, source: io::Error) -> Self {
        Self::new(FsErrorKind::SymlinkPermission {
            origin,
            link,
            source,
        })
    }

    /// Constructs an error for an entry kind no operation is defined for.
    #[must_use]
    pub fn unrecognized_kind(path: PathBuf) -> Self {
        Self::new(FsErrorKind::UnrecognizedKind { path })
    }

    /// Provides access to the underlying error kind.
    #[must_use]
    pub fn kind(&self) -> &FsErrorKind {
        &self.kind
    }

    /// Consumes the error and returns its kind.
    #[must_use]
    pub fn into_kind(self) -> FsErrorKind {
        self.kind
    }
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FsErrorKind::NotFound { path } => {
                write!(f, "path '{}' does not exist", path.display())
            }
            FsErrorKind::Io {
                action,
                path,
                source,
            } => {
                write!(f, "failed to {action} '{}': {source}", path.display())
            }
            FsErrorKind::PartialWrite {
                path,
                written,
                expected,
            } => {
                write!(
                    f,
                    "incomplete copy to '{}': {written} of {expected} bytes written",
                    path.display()
                )
            }
            FsErrorKind::PathTooLong { path, limit } => {
                write!(
                    f,
                    "path '{}' exceeds the platform limit of {limit} bytes",
                    path.display()
                )
            }
            FsErrorKind::AlreadyExists { path } => {
                write!(
                    f,
                    "cannot rename onto '{}': the path already exists",
                    path.display()
                )
            }
            FsErrorKind::SymlinkPermission {
                origin,
                link,
                source,
            } => {
                write!(
                    f,
                    "failed to link '{}' to '{}': {source}; creating symbolic links \
                     requires elevated privileges on this platform",
                    link.display(),
                    origin.display()
                )
            }
            FsErrorKind::UnrecognizedKind { path } => {
                write!(
                    f,
                    "cannot process '{}': entry is not a regular file, directory, or symlink",
                    path.display()
                )
            }
            FsErrorKind::Walk(error) => write!(f, "{error}"),
            FsErrorKind::Meta(error) => write!(f, "{error}"),
        }
    }
}

impl Error for FsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            FsErrorKind::Io { source, .. } | FsErrorKind::SymlinkPermission { source, .. } => {
                Some(source)
            }
            FsErrorKind::Walk(error) => Some(error),
            FsErrorKind::Meta(error) => Some(error),
            _ => None,
        }
    }
}

impl From<WalkError> for FsError {
    fn from(error: WalkError) -> Self {
        Self::new(FsErrorKind::Walk(error))
    }
}

impl From<MetaError> for FsError {
    fn from(error: MetaError) -> Self {
        Self::new(FsErrorKind::Meta(error))
    }
}

/// Classification of filesystem operation failures.
#[derive(Debug)]
pub enum FsErrorKind {
    /// A required source path does not exist.
    NotFound {
        /// The missing path.
        path: PathBuf,
    },
    /// An OS-level filesystem interaction failed.
    Io {
        /// Action being performed.
        action: &'static str,
        /// Path involved in the failure.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// A local copy wrote fewer bytes than the origin holds.
    PartialWrite {
        /// Target path of the copy.
        path: PathBuf,
        /// Bytes actually written.
        written: u64,
        /// Origin size in bytes.
        expected: u64,
    },
    /// A path exceeds the platform length limit.
    PathTooLong {
        /// The offending path.
        path: PathBuf,
        /// The limit that was exceeded, in bytes.
        limit: usize,
    },
    /// A rename target exists and overwriting was not requested.
    AlreadyExists {
        /// The occupied target path.
        path: PathBuf,
    },
    /// Symlink creation was rejected because the process lacks the privilege
    /// the platform demands for it.
    SymlinkPermission {
        /// Path the link would point to.
        origin: PathBuf,
        /// Path of the link itself.
        link: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// An enumerated entry is none of regular file, directory, or symlink.
    UnrecognizedKind {
        /// The unclassifiable path.
        path: PathBuf,
    },
    /// Tree traversal failed.
    Walk(WalkError),
    /// A permission or ownership primitive failed.
    Meta(MetaError),
}

impl FsErrorKind {
    /// Returns the action, path, and source error for [`FsErrorKind::Io`]
    /// values.
    #[must_use]
    pub fn as_io(&self) -> Option<(&'static str, &Path, &io::Error)> {
        match self {
            Self::Io {
                action,
                path,
                source,
            } => Some((action, path.as_path(), source)),
            _ => None,
        }
    }
}
