//! crates/meta/src/error.rs
//!
//! Failure type shared by the permission, ownership, and timestamp
//! primitives.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error from a single metadata primitive.
///
/// The `action` slot is a verb phrase such as `"change permissions of"`;
/// it completes the message `failed to {action} '{path}'`.
#[derive(Debug, Error)]
#[error("failed to {action} '{}': {source}", path.display())]
pub struct MetaError {
    action: &'static str,
    path: PathBuf,
    source: io::Error,
}

impl MetaError {
    pub(crate) fn new(action: &'static str, path: &Path, source: io::Error) -> Self {
        Self {
            action,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Returns the verb phrase describing the failing operation.
    #[must_use]
    pub const fn action(&self) -> &'static str {
        self.action
    }

    /// Returns the path the operation was applied to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::error::Error as _;

    #[test]
    fn message_joins_action_path_and_cause() {
        let error = MetaError::new(
            "set timestamps on",
            Path::new("/srv/site/index.html"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(
            error.to_string(),
            "failed to set timestamps on '/srv/site/index.html': denied"
        );
        assert_eq!(error.action(), "set timestamps on");
        assert_eq!(error.path(), Path::new("/srv/site/index.html"));
        assert!(error.source().is_some());
    }
}
