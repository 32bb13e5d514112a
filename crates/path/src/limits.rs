//! crates/path/src/limits.rs
//!
//! Platform path-length limit.
//!
//! Existence checks validate the length of every candidate path up front
//! because some platforms misbehave on over-long paths instead of failing
//! the call cleanly.

use std::path::Path;

/// Longest path length, in bytes, accepted by filesystem operations.
///
/// Two bytes below the platform limit so a trailing separator and
/// terminator always fit.
#[cfg(windows)]
pub const PATH_LENGTH_LIMIT: usize = 258;

/// Longest path length, in bytes, accepted by filesystem operations.
///
/// Two bytes below the platform limit so a trailing separator and
/// terminator always fit.
#[cfg(not(windows))]
pub const PATH_LENGTH_LIMIT: usize = 4094;

/// Reports whether a path exceeds [`PATH_LENGTH_LIMIT`].
#[must_use]
pub fn exceeds_path_limit(path: &Path) -> bool {
    path.as_os_str().len() > PATH_LENGTH_LIMIT
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn ordinary_paths_fit() {
        assert!(!exceeds_path_limit(Path::new("/var/lib/app/config.toml")));
    }

    #[test]
    fn over_long_paths_are_flagged() {
        let mut long = PathBuf::from("/");
        while long.as_os_str().len() <= PATH_LENGTH_LIMIT {
            long.push("component");
        }
        assert!(exceeds_path_limit(&long));
    }
}
