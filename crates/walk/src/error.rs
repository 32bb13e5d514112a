//! crates/walk/src/error.rs
//!
//! Failure cases for directory traversal.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error raised while a [`Walker`](crate::Walker) opens directories or
/// inspects entries.
///
/// Every variant names the path the failing operation touched, and the
/// originating [`io::Error`] stays reachable through `source()`.
#[derive(Debug, Error)]
pub enum WalkError {
    /// The traversal root itself could not be inspected.
    #[error("cannot stat walk root '{}': {source}", path.display())]
    Root {
        /// Root path handed to the builder.
        path: PathBuf,
        /// Failure reported by the operating system.
        source: io::Error,
    },
    /// A directory's contents could not be listed.
    #[error("cannot list directory '{}': {source}", path.display())]
    List {
        /// Directory whose listing failed.
        path: PathBuf,
        /// Failure reported by the operating system.
        source: io::Error,
    },
    /// One entry of a directory listing could not be fetched.
    #[error("cannot read an entry of '{}': {source}", path.display())]
    Entry {
        /// Directory whose listing produced the failure.
        path: PathBuf,
        /// Failure reported by the operating system.
        source: io::Error,
    },
    /// An enumerated entry could not be stat'ed.
    #[error("cannot stat '{}': {source}", path.display())]
    Stat {
        /// Entry being classified.
        path: PathBuf,
        /// Failure reported by the operating system.
        source: io::Error,
    },
    /// A directory could not be canonicalized for cycle tracking.
    #[error("cannot resolve '{}': {source}", path.display())]
    Resolve {
        /// Path being canonicalized.
        path: PathBuf,
        /// Failure reported by the operating system.
        source: io::Error,
    },
}

impl WalkError {
    pub(crate) fn root(path: PathBuf, source: io::Error) -> Self {
        Self::Root { path, source }
    }

    pub(crate) fn list(path: PathBuf, source: io::Error) -> Self {
        Self::List { path, source }
    }

    pub(crate) fn entry(path: PathBuf, source: io::Error) -> Self {
        Self::Entry { path, source }
    }

    pub(crate) fn stat(path: PathBuf, source: io::Error) -> Self {
        Self::Stat { path, source }
    }

    pub(crate) fn resolve(path: PathBuf, source: io::Error) -> Self {
        Self::Resolve { path, source }
    }

    /// Returns the path the failing operation touched.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Root { path, .. }
            | Self::List { path, .. }
            | Self::Entry { path, .. }
            | Self::Stat { path, .. }
            | Self::Resolve { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::error::Error as _;

    fn os_error() -> io::Error {
        io::Error::new(io::ErrorKind::PermissionDenied, "denied")
    }

    #[test]
    fn every_variant_reports_its_path() {
        let variants = [
            WalkError::root(PathBuf::from("a"), os_error()),
            WalkError::list(PathBuf::from("b"), os_error()),
            WalkError::entry(PathBuf::from("c"), os_error()),
            WalkError::stat(PathBuf::from("d"), os_error()),
            WalkError::resolve(PathBuf::from("e"), os_error()),
        ];
        let paths: Vec<_> = variants.iter().map(WalkError::path).collect();
        assert_eq!(paths, ["a", "b", "c", "d", "e"].map(Path::new));
    }

    #[test]
    fn messages_name_the_operation_and_chain_the_os_error() {
        let error = WalkError::list(PathBuf::from("locked"), os_error());
        assert_eq!(error.to_string(), "cannot list directory 'locked': denied");
        assert!(error.source().is_some());

        let error = WalkError::root(PathBuf::from("gone"), os_error());
        assert_eq!(error.to_string(), "cannot stat walk root 'gone': denied");
    }
}
