//! crates/meta/src/times.rs

use std::path::Path;

use filetime::FileTime;

use crate::error::MetaError;

/// Sets the access and modification timestamps of `path`.
pub fn set_entry_times(path: &Path, atime: FileTime, mtime: FileTime) -> Result<(), MetaError> {
    filetime::set_file_times(path, atime, mtime)
        .map_err(|error| MetaError::new("set timestamps on", path, error))
}
