//! crates/engine/src/mirror.rs
//!
//! Tree mirroring: make a target directory reflect an origin directory.
//!
//! # Design
//!
//! A mirror run is two passes. The optional deletion pass enumerates the
//! target tree contents-first and removes every entry with no counterpart
//! under the origin; it decides from a snapshot taken before any removal,
//! so the enumeration cannot be invalidated by its own mutations. The sync
//! pass then enumerates the origin pre-order and recreates each entry on
//! the target side: directories are created, regular files go through the
//! copy engine, symlinks are recreated with the same link target.
//!
//! Target paths created during the sync pass are remembered so that a
//! target nested inside the origin does not feed its own artifacts back
//! into the enumeration.

use std::collections::HashSet;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use fskit_walk::{EntryKind, WalkBuilder, WalkEntry, WalkError, WalkOrder};

use crate::copy::{self, CopyOptions};
use crate::error::FsError;
use crate::links;
use crate::ops;
use crate::trace;

/// Options governing [`mirror`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MirrorOptions {
    force: bool,
    copy_on_windows: bool,
    delete_extraneous: bool,
}

impl MirrorOptions {
    /// Creates options with every flag off.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            force: false,
            copy_on_windows: false,
            delete_extraneous: false,
        }
    }

    /// Copies files even when the target side is at least as new.
    #[must_use]
    pub const fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Replaces symlinks with copies of their referent content, for targets
    /// on filesystems without usable symlink support.
    #[must_use]
    pub const fn copy_on_windows(mut self, copy: bool) -> Self {
        self.copy_on_windows = copy;
        self
    }

    /// Removes target entries that have no counterpart under the origin.
    #[must_use]
    pub const fn delete_extraneous(mut self, delete: bool) -> Self {
        self.delete_extraneous = delete;
        self
    }

    /// Returns whether the copy freshness check is bypassed.
    #[must_use]
    pub const fn is_forced(&self) -> bool {
        self.force
    }

    /// Returns whether symlinks are mirrored as content copies.
    #[must_use]
    pub const fn copies_on_windows(&self) -> bool {
        self.copy_on_windows
    }

    /// Returns whether the deletion pass runs.
    #[must_use]
    pub const fn deletes_extraneous(&self) -> bool {
        self.delete_extraneous
    }
}

/// Mirrors `origin` into `target`.
///
/// The origin must exist. The target directory is created if missing.
/// Existing target files are only rewritten when the origin side is newer,
/// unless [`MirrorOptions::force`] is set; rewrites of existing files go
/// through a staging file and an atomic rename.
///
/// # Errors
///
/// Returns [`FsError`] when the origin is missing, when enumeration of
/// either tree fails, when an entry is neither a regular file, a directory,
/// nor a symlink, or when any create, copy, or remove step fails.
pub fn mirror(origin: &Path, target: &Path, options: &MirrorOptions) -> Result<(), FsError> {
    let origin = normalize_root(origin);
    let target = normalize_root(target);

    if !origin.exists() {
        return Err(FsError::not_found(origin));
    }

    if options.deletes_extraneous() && target.exists() {
        delete_extraneous(&origin, &target)?;
    }

    fs::create_dir_all(&target)
        .map_err(|error| FsError::io("create directory", target.clone(), error))?;

    let walker = WalkBuilder::new(&origin)
        .include_root(false)
        .follow_symlinks(options.copies_on_windows())
        .build()?;
    sync_pass(&origin, &target, walker, options)
}

/// Like [`mirror`], but the sync pass consumes a caller-supplied entry
/// sequence instead of enumerating the origin itself.
///
/// Entries typically come from a [`fskit_walk::Walker`] the caller has
/// filtered; every entry must lie under `origin`. The deletion pass, when
/// enabled, still enumerates the full target tree.
///
/// # Errors
///
/// Returns [`FsError`] under the same conditions as [`mirror`], plus when
/// an entry's path does not lie under the origin.
pub fn mirror_with_entries<I>(
    origin: &Path,
    target: &Path,
    entries: I,
    options: &MirrorOptions,
) -> Result<(), FsError>
where
    I: IntoIterator<Item = WalkEntry>,
{
    let origin = normalize_root(origin);
    let target = normalize_root(target);

    if !origin.exists() {
        return Err(FsError::not_found(origin));
    }

    if options.deletes_extraneous() && target.exists() {
        delete_extraneous(&origin, &target)?;
    }

    fs::create_dir_all(&target)
        .map_err(|error| FsError::io("create directory", target.clone(), error))?;

    sync_pass(&origin, &target, entries.into_iter().map(Ok), options)
}

/// Roots are joined and compared in absolute, separator-normalized form so
/// walker paths line up with prefix substitution.
fn normalize_root(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
    };
    absolute.components().collect()
}

fn delete_extraneous(origin: &Path, target: &Path) -> Result<(), FsError> {
    let snapshot = WalkBuilder::new(target)
        .order(WalkOrder::ContentsFirst)
        .include_root(false)
        .build()?
        .collect::<Result<Vec<_>, WalkError>>()?;

    for entry in snapshot {
        let counterpart = origin.join(entry.relative_path());
        if !counterpart.exists() {
            ops::remove_entry(entry.path())?;
            trace::mirror_removed(entry.path());
        }
    }
    Ok(())
}

fn sync_pass<I>(
    origin: &Path,
    target: &Path,
    entries: I,
    options: &MirrorOptions,
) -> Result<(), FsError>
where
    I: IntoIterator<Item = Result<WalkEntry, WalkError>>,
{
    let mut created_while_mirroring: HashSet<PathBuf> = HashSet::new();

    for entry in entries {
        let entry = entry?;
        if entry.path() == target || created_while_mirroring.contains(entry.path()) {
            continue;
        }

        let relative = entry.path().strip_prefix(origin).map_err(|_| {
            FsError::io(
                "mirror",
                entry.path().to_path_buf(),
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "entry lies outside the origin tree",
                ),
            )
        })?;
        if relative.as_os_str().is_empty() {
            continue;
        }

        let target_path = target.join(relative);
        sync_entry(&entry, &target_path, options, &mut created_while_mirroring)?;
    }
    Ok(())
}

fn sync_entry(
    entry: &WalkEntry,
    target_path: &Path,
    options: &MirrorOptions,
    created: &mut HashSet<PathBuf>,
) -> Result<(), FsError> {
    match entry.kind() {
        EntryKind::Symlink if options.copies_on_windows() => match fs::metadata(entry.path()) {
            Ok(metadata) if metadata.is_dir() => create_directory(target_path, created),
            Ok(_) => copy_into(entry.path(), target_path, options, created),
            Err(_) => Err(FsError::unrecognized_kind(entry.path().to_path_buf())),
        },
        EntryKind::Symlink => {
            let link_target = fs::read_link(entry.path())
                .map_err(|error| FsError::io("read symlink", entry.path().to_path_buf(), error))?;
            links::symlink(&link_target, target_path)
        }
        EntryKind::Directory => create_directory(target_path, created),
        EntryKind::Regular => copy_into(entry.path(), target_path, options, created),
        EntryKind::Other => Err(FsError::unrecognized_kind(entry.path().to_path_buf())),
    }
}

fn create_directory(target_path: &Path, created: &mut HashSet<PathBuf>) -> Result<(), FsError> {
    created.insert(target_path.to_path_buf());
    fs::create_dir_all(target_path)
        .map_err(|error| FsError::io("create directory", target_path.to_path_buf(), error))
}

fn copy_into(
    origin_file: &Path,
    target_path: &Path,
    options: &MirrorOptions,
    created: &mut HashSet<PathBuf>,
) -> Result<(), FsError> {
    created.insert(target_path.to_path_buf());
    let copy_options = CopyOptions::new().force(options.is_forced());
    if target_path.is_file() {
        copy::copy_file_staged(origin_file, target_path, copy_options)?;
    } else {
        copy::copy_file(origin_file, target_path, copy_options)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::error::FsErrorKind;
    use fskit_test_support::{tree_of, write_file};
    use tempfile::tempdir;

    #[test]
    fn mirror_recreates_the_origin_tree() {
        let temp = tempdir().expect("tempdir");
        let origin = temp.path().join("origin");
        let target = temp.path().join("target");
        write_file(&origin.join("a.txt"), b"alpha");
        write_file(&origin.join("sub/b.txt"), b"beta");
        fs::create_dir_all(origin.join("empty")).expect("mkdir");

        mirror(&origin, &target, &MirrorOptions::new()).expect("mirror");

        assert_eq!(tree_of(&target), ["a.txt", "empty", "sub", "sub/b.txt"]);
        assert_eq!(fs::read(target.join("sub/b.txt")).expect("read"), b"beta");
    }

    #[test]
    fn mirror_of_empty_origin_creates_the_target_root() {
        let temp = tempdir().expect("tempdir");
        let origin = temp.path().join("origin");
        let target = temp.path().join("target");
        fs::create_dir(&origin).expect("mkdir");

        mirror(&origin, &target, &MirrorOptions::new()).expect("mirror");

        assert!(target.is_dir());
        assert!(tree_of(&target).is_empty());
    }

    #[test]
    fn mirror_of_missing_origin_reports_not_found() {
        let temp = tempdir().expect("tempdir");
        let origin = temp.path().join("absent");
        let target = temp.path().join("target");

        let error = mirror(&origin, &target, &MirrorOptions::new()).expect_err("missing origin");
        assert!(matches!(error.kind(), FsErrorKind::NotFound { .. }));
        assert!(!target.exists());
    }

    #[cfg(unix)]
    #[test]
    fn mirror_recreates_symlinks_with_the_same_link_target() {
        let temp = tempdir().expect("tempdir");
        let origin = temp.path().join("origin");
        let target = temp.path().join("target");
        write_file(&origin.join("real.txt"), b"content");
        std::os::unix::fs::symlink("real.txt", origin.join("link.txt")).expect("symlink");

        mirror(&origin, &target, &MirrorOptions::new()).expect("mirror");

        let mirrored = target.join("link.txt");
        assert!(fs::symlink_metadata(&mirrored)
            .expect("metadata")
            .file_type()
            .is_symlink());
        assert_eq!(
            fs::read_link(&mirrored).expect("read_link"),
            PathBuf::from("real.txt")
        );
        assert_eq!(fs::read(&mirrored).expect("read through link"), b"content");
    }

    #[cfg(unix)]
    #[test]
    fn copy_on_windows_mirrors_symlinks_as_content() {
        let temp = tempdir().expect("tempdir");
        let origin = temp.path().join("origin");
        let target = temp.path().join("target");
        write_file(&origin.join("real.txt"), b"payload");
        std::os::unix::fs::symlink("real.txt", origin.join("link.txt")).expect("symlink");

        let options = MirrorOptions::new().copy_on_windows(true);
        mirror(&origin, &target, &options).expect("mirror");

        let mirrored = target.join("link.txt");
        assert!(!fs::symlink_metadata(&mirrored)
            .expect("metadata")
            .file_type()
            .is_symlink());
        assert_eq!(fs::read(&mirrored).expect("read"), b"payload");
    }

    #[cfg(unix)]
    #[test]
    fn copy_on_windows_rejects_dangling_symlinks() {
        let temp = tempdir().expect("tempdir");
        let origin = temp.path().join("origin");
        let target = temp.path().join("target");
        fs::create_dir(&origin).expect("mkdir");
        std::os::unix::fs::symlink("gone.txt", origin.join("dangling")).expect("symlink");

        let options = MirrorOptions::new().copy_on_windows(true);
        let error = mirror(&origin, &target, &options).expect_err("dangling link");
        assert!(matches!(error.kind(), FsErrorKind::UnrecognizedKind { .. }));
    }

    #[test]
    fn delete_extraneous_removes_entries_missing_from_origin() {
        let temp = tempdir().expect("tempdir");
        let origin = temp.path().join("origin");
        let target = temp.path().join("target");
        write_file(&origin.join("kept.txt"), b"kept");
        write_file(&target.join("kept.txt"), b"old");
        write_file(&target.join("stray.txt"), b"stray");
        write_file(&target.join("stray-dir/inner.txt"), b"inner");

        let options = MirrorOptions::new().delete_extraneous(true);
        mirror(&origin, &target, &options).expect("mirror");

        assert_eq!(tree_of(&target), ["kept.txt"]);
    }

    #[test]
    fn extraneous_entries_survive_without_the_delete_flag() {
        let temp = tempdir().expect("tempdir");
        let origin = temp.path().join("origin");
        let target = temp.path().join("target");
        write_file(&origin.join("a.txt"), b"a");
        write_file(&target.join("stray.txt"), b"stray");

        mirror(&origin, &target, &MirrorOptions::new()).expect("mirror");

        assert_eq!(tree_of(&target), ["a.txt", "stray.txt"]);
    }

    #[test]
    fn mirror_updates_stale_files_without_staging_leftovers() {
        let temp = tempdir().expect("tempdir");
        let origin = temp.path().join("origin");
        let target = temp.path().join("target");
        write_file(&origin.join("doc.txt"), b"new text");
        write_file(&target.join("doc.txt"), b"old text");
        filetime::set_file_mtime(
            origin.join("doc.txt"),
            filetime::FileTime::from_unix_time(1_000_000_100, 0),
        )
        .expect("set origin mtime");
        filetime::set_file_mtime(
            target.join("doc.txt"),
            filetime::FileTime::from_unix_time(1_000_000_000, 0),
        )
        .expect("set target mtime");

        mirror(&origin, &target, &MirrorOptions::new()).expect("mirror");

        assert_eq!(fs::read(target.join("doc.txt")).expect("read"), b"new text");
        assert_eq!(tree_of(&target), ["doc.txt"]);
    }

    #[test]
    fn forced_mirror_rewrites_newer_targets() {
        let temp = tempdir().expect("tempdir");
        let origin = temp.path().join("origin");
        let target = temp.path().join("target");
        write_file(&origin.join("doc.txt"), b"origin text");
        write_file(&target.join("doc.txt"), b"target text");
        filetime::set_file_mtime(
            origin.join("doc.txt"),
            filetime::FileTime::from_unix_time(1_000_000_000, 0),
        )
        .expect("set origin mtime");
        filetime::set_file_mtime(
            target.join("doc.txt"),
            filetime::FileTime::from_unix_time(1_000_000_100, 0),
        )
        .expect("set target mtime");

        mirror(&origin, &target, &MirrorOptions::new().force(true)).expect("mirror");
        assert_eq!(
            fs::read(target.join("doc.txt")).expect("read"),
            b"origin text"
        );
    }

    #[cfg(unix)]
    #[test]
    fn mirror_rejects_special_files() {
        use rustix::fs::{CWD, FileType, Mode};

        let temp = tempdir().expect("tempdir");
        let origin = temp.path().join("origin");
        let target = temp.path().join("target");
        fs::create_dir(&origin).expect("mkdir");
        rustix::fs::mknodat(
            CWD,
            origin.join("pipe"),
            FileType::Fifo,
            Mode::from_raw_mode(0o644),
            0,
        )
        .expect("mkfifo");

        let error = mirror(&origin, &target, &MirrorOptions::new()).expect_err("fifo");
        assert!(matches!(error.kind(), FsErrorKind::UnrecognizedKind { .. }));
    }

    #[test]
    fn mirror_with_entries_syncs_only_the_supplied_subset() {
        let temp = tempdir().expect("tempdir");
        let origin = temp.path().join("origin");
        let target = temp.path().join("target");
        write_file(&origin.join("keep.txt"), b"keep");
        write_file(&origin.join("skip.bin"), b"skip");

        let entries: Vec<WalkEntry> = WalkBuilder::new(&origin)
            .include_root(false)
            .build()
            .expect("walker")
            .collect::<Result<Vec<_>, _>>()
            .expect("walk")
            .into_iter()
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "txt"))
            .collect();

        mirror_with_entries(&origin, &target, entries, &MirrorOptions::new()).expect("mirror");

        assert_eq!(tree_of(&target), ["keep.txt"]);
    }

    #[test]
    fn mirror_into_a_subdirectory_of_origin_does_not_recurse() {
        let temp = tempdir().expect("tempdir");
        let origin = temp.path().join("origin");
        let target = origin.join("backup");
        write_file(&origin.join("a.txt"), b"a");
        write_file(&origin.join("z.txt"), b"z");

        mirror(&origin, &target, &MirrorOptions::new()).expect("mirror");

        assert_eq!(tree_of(&target), ["a.txt", "z.txt"]);
        assert!(!target.join("backup").exists());
    }
}
