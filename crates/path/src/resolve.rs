//! crates/path/src/resolve.rs
//!
//! Absolute-path classification and relative-path computation.

use std::error::Error;
use std::fmt;

use crate::scheme::split_scheme;

/// Error returned by [`make_relative`] when an input is not absolute.
#[derive(Debug, PartialEq, Eq)]
pub struct RelativePathError {
    path: String,
}

impl RelativePathError {
    fn new(path: &str) -> Self {
        Self {
            path: path.to_owned(),
        }
    }

    /// Returns the offending input path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for RelativePathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot compute a relative path from non-absolute input '{}'",
            self.path
        )
    }
}

impl Error for RelativePathError {}

/// Reports whether a path string is absolute.
///
/// A path is absolute when it starts with a separator (`/` or `\`), matches
/// the drive-letter form `<letter>:<separator>`, or carries a URI scheme
/// prefix. No filesystem access is performed.
#[must_use]
pub fn is_absolute_path(path: &str) -> bool {
    if path.is_empty() {
        return false;
    }
    if path.starts_with('/') || path.starts_with('\\') {
        return true;
    }
    if has_drive_prefix(path) {
        return true;
    }
    split_scheme(path).is_some()
}

/// Computes the relative path that leads from `start_path` to `end_path`.
///
/// Both inputs must be absolute; separators may be either `/` or `\` and are
/// normalized before comparison. The result uses `/` separators, carries a
/// trailing `/` when non-empty, and degenerates to `"./"` when both inputs
/// name the same directory.
///
/// # Errors
///
/// Returns [`RelativePathError`] when either input is not absolute.
pub fn make_relative(end_path: &str, start_path: &str) -> Result<String, RelativePathError> {
    let end_path = end_path.replace('\\', "/");
    let start_path = start_path.replace('\\', "/");

    if !is_absolute_path(&end_path) {
        return Err(RelativePathError::new(&end_path));
    }
    if !is_absolute_path(&start_path) {
        return Err(RelativePathError::new(&start_path));
    }

    let end_segments = normalized_segments(strip_drive_prefix(&end_path));
    let start_segments = normalized_segments(strip_drive_prefix(&start_path));

    let common = end_segments
        .iter()
        .zip(start_segments.iter())
        .take_while(|(end, start)| end == start)
        .count();
    let depth = start_segments.len() - common;

    let mut relative = "../".repeat(depth);
    if end_segments.len() > common {
        relative.push_str(&end_segments[common..].join("/"));
        relative.push('/');
    }
    if relative.is_empty() {
        relative.push_str("./");
    }
    Ok(relative)
}

/// Splits a normalized path into its meaningful segments: empty and `.`
/// segments are dropped, `..` collapses onto the previous segment. The
/// filesystem root contributes zero segments.
fn normalized_segments(path: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes[2] == b'/' || bytes[2] == b'\\')
}

fn strip_drive_prefix(path: &str) -> &str {
    if has_drive_prefix(path) { &path[2..] } else { path }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separator_prefix_is_absolute() {
        assert!(is_absolute_path("/var/lib"));
        assert!(is_absolute_path("\\\\server\\share"));
    }

    #[test]
    fn drive_letter_is_absolute() {
        assert!(is_absolute_path("C:/Users"));
        assert!(is_absolute_path("c:\\Users"));
        assert!(!is_absolute_path("C:Users"));
    }

    #[test]
    fn scheme_prefix_is_absolute() {
        assert!(is_absolute_path("s3://bucket/key"));
        assert!(is_absolute_path("file:///var/lib"));
    }

    #[test]
    fn relative_and_empty_are_not_absolute() {
        assert!(!is_absolute_path(""));
        assert!(!is_absolute_path("var/lib"));
        assert!(!is_absolute_path("./var"));
    }

    #[test]
    fn child_of_start_yields_bare_segments() {
        assert_eq!(make_relative("/a/b/c/", "/a/b/").as_deref(), Ok("c/"));
    }

    #[test]
    fn identical_paths_yield_dot() {
        assert_eq!(make_relative("/a/b/", "/a/b/").as_deref(), Ok("./"));
    }

    #[test]
    fn root_start_needs_no_traversal() {
        assert_eq!(make_relative("/x/", "/").as_deref(), Ok("x/"));
    }

    #[test]
    fn parent_of_start_yields_traversal() {
        assert_eq!(
            make_relative("/var/lib/sym/src/", "/var/lib/sym/src/Component").as_deref(),
            Ok("../")
        );
    }

    #[test]
    fn divergent_paths_traverse_then_descend() {
        assert_eq!(
            make_relative("/aa/bb/cc/", "/aa/dd/ee/").as_deref(),
            Ok("../../bb/cc/")
        );
    }

    #[test]
    fn dot_dot_segments_collapse_before_comparison() {
        assert_eq!(
            make_relative("/aa/bb/cc", "/aa/dd/..").as_deref(),
            Ok("bb/cc/")
        );
    }

    #[test]
    fn drive_letters_and_backslashes_normalize() {
        assert_eq!(
            make_relative("C:\\aa\\bb\\cc", "C:/aa/").as_deref(),
            Ok("bb/cc/")
        );
    }

    #[test]
    fn non_absolute_input_is_rejected() {
        let err = make_relative("aa/bb", "/aa/").expect_err("relative end path");
        assert_eq!(err.path(), "aa/bb");
        assert!(make_relative("/aa/", "bb/cc").is_err());
    }
}
