//! crates/test-support/src/lib.rs
//!
//! Shared fixture helpers for the workspace test suites. Every helper
//! panics on failure instead of returning a `Result`.

#![deny(unsafe_code)]
#![allow(clippy::missing_panics_doc)]

use std::fs;
use std::path::Path;

use filetime::FileTime;
pub use tempfile::TempDir;

/// Creates a temporary directory that is removed when dropped.
#[must_use]
pub fn temp_workspace() -> TempDir {
    tempfile::tempdir().expect("create temp workspace")
}

/// Writes `content` to `path`, creating parent directories first.
pub fn write_file(path: &Path, content: impl AsRef<[u8]>) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create fixture parent");
    }
    fs::write(path, content).expect("write fixture file");
}

/// Sets a file's modification time to a fixed unix timestamp.
pub fn set_mtime(path: &Path, unix_seconds: i64) {
    filetime::set_file_mtime(path, FileTime::from_unix_time(unix_seconds, 0))
        .expect("set fixture mtime");
}

/// Returns the modification time of `path`.
#[must_use]
pub fn mtime_of(path: &Path) -> FileTime {
    let metadata = fs::metadata(path).expect("read fixture metadata");
    FileTime::from_last_modification_time(&metadata)
}

/// Creates a symlink at `link` pointing to `link_target`.
#[cfg(unix)]
pub fn make_symlink(link_target: impl AsRef<Path>, link: &Path) {
    std::os::unix::fs::symlink(link_target, link).expect("create fixture symlink");
}

/// Creates a symlink at `link` pointing to `link_target`.
#[cfg(windows)]
pub fn make_symlink(link_target: impl AsRef<Path>, link: &Path) {
    if link_target.as_ref().is_dir() {
        std::os::windows::fs::symlink_dir(link_target, link).expect("create fixture symlink");
    } else {
        std::os::windows::fs::symlink_file(link_target, link).expect("create fixture symlink");
    }
}

/// Lists every entry under `root` as sorted, slash-separated relative
/// paths. Symlinks are listed but never followed.
///
/// The listing is built with plain `std::fs` recursion so it stays
/// independent of the traversal code it is used to verify.
#[must_use]
pub fn tree_of(root: &Path) -> Vec<String> {
    let mut entries = Vec::new();
    collect_tree(root, root, &mut entries);
    entries.sort();
    entries
}

fn collect_tree(root: &Path, dir: &Path, entries: &mut Vec<String>) {
    for entry in fs::read_dir(dir).expect("read fixture directory") {
        let entry = entry.expect("read fixture entry");
        let path = entry.path();
        let relative = path.strip_prefix(root).expect("entry under fixture root");
        entries.push(slash_joined(relative));
        let file_type = entry.file_type().expect("fixture file type");
        if file_type.is_dir() && !file_type.is_symlink() {
            collect_tree(root, &path, entries);
        }
    }
}

fn slash_joined(relative: &Path) -> String {
    let parts: Vec<String> = relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .collect();
    parts.join("/")
}
