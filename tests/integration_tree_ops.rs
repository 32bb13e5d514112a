//! Integration tests for tree operations through the crate facade.
//!
//! Covers directory setup, timestamps, removal, permission sweeps, renames,
//! and link management as one surface.

use std::fs;
use std::path::PathBuf;

use filetime::FileTime;
use fskit::{exists, hardlink, mkdir, read_link, remove, rename, symlink, touch};
use fskit_test_support::{mtime_of, temp_workspace, tree_of, write_file};

#[test]
fn mkdir_touch_exists_remove_round_trip() {
    let temp = temp_workspace();
    let data = temp.path().join("data");
    let cache = temp.path().join("cache/blobs");

    mkdir([&data, &cache]).expect("mkdir");
    let marker = data.join("ready");
    touch([&marker], None, None).expect("touch");

    assert!(exists([&data, &cache, &marker]).expect("exists"));

    remove([&data, &cache]).expect("remove");
    assert!(!exists([&data]).expect("exists after remove"));
    assert!(!marker.exists());
}

#[test]
fn touch_applies_the_requested_timestamps() {
    let temp = temp_workspace();
    let path = temp.path().join("stamp.txt");

    let mtime = FileTime::from_unix_time(1_700_000_000, 0);
    touch([&path], Some(mtime), None).expect("touch");

    assert_eq!(mtime_of(&path), mtime);
}

#[test]
fn remove_clears_whole_trees() {
    let temp = temp_workspace();
    let root = temp.path().join("workspace");
    write_file(&root.join("a/deep/file.txt"), "x");
    write_file(&root.join("b.txt"), "y");

    remove([&root]).expect("remove");
    assert!(!root.exists());
}

#[test]
fn rename_moves_a_populated_directory() {
    let temp = temp_workspace();
    let origin = temp.path().join("staging");
    let target = temp.path().join("release");
    write_file(&origin.join("bundle/app.js"), "js");

    rename(&origin, &target, false).expect("rename");

    assert!(!origin.exists());
    assert_eq!(
        tree_of(&target),
        vec!["bundle".to_string(), "bundle/app.js".to_string()]
    );
}

#[test]
fn rename_with_overwrite_replaces_an_existing_file() {
    let temp = temp_workspace();
    let origin = temp.path().join("new.txt");
    let target = temp.path().join("current.txt");
    write_file(&origin, "new");
    write_file(&target, "current");

    rename(&origin, &target, true).expect("rename");

    assert!(!origin.exists());
    assert_eq!(fs::read(&target).expect("read"), b"new");
}

#[cfg(unix)]
#[test]
fn recursive_chmod_normalises_a_tree() {
    use std::os::unix::fs::PermissionsExt;

    let temp = temp_workspace();
    let root = temp.path().join("tree");
    write_file(&root.join("sub/file.txt"), "x");

    fskit::chmod([&root], 0o777, 0o022, true).expect("chmod");

    let mode_of = |path: &std::path::Path| {
        fs::metadata(path).expect("metadata").permissions().mode() & 0o777
    };
    assert_eq!(mode_of(&root), 0o755);
    assert_eq!(mode_of(&root.join("sub")), 0o755);
    assert_eq!(mode_of(&root.join("sub/file.txt")), 0o755);
}

#[cfg(unix)]
#[test]
fn symlink_and_read_link_round_trip() {
    let temp = temp_workspace();
    let origin = temp.path().join("current.conf");
    let link = temp.path().join("active.conf");
    write_file(&origin, "setting=1");

    symlink(&origin, &link).expect("symlink");

    assert_eq!(read_link(&link, false), Some(origin.clone()));
    assert_eq!(
        read_link(&link, true),
        Some(fs::canonicalize(&origin).expect("canonicalize"))
    );
}

#[test]
fn read_link_on_a_regular_file_is_none() {
    let temp = temp_workspace();
    let path = temp.path().join("plain.txt");
    write_file(&path, "x");

    assert_eq!(read_link(&path, false), None);
}

#[test]
fn hardlink_materialises_shared_content() {
    let temp = temp_workspace();
    let origin = temp.path().join("master.bin");
    let first = temp.path().join("copies/one.bin");
    let second = temp.path().join("copies/two.bin");
    write_file(&origin, "payload");
    fs::create_dir_all(temp.path().join("copies")).expect("mkdir");

    hardlink(&origin, [&first, &second]).expect("hardlink");

    assert_eq!(fs::read(&first).expect("read"), b"payload");
    assert_eq!(fs::read(&second).expect("read"), b"payload");

    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        let origin_ino = fs::metadata(&origin).expect("metadata").ino();
        assert_eq!(fs::metadata(&first).expect("metadata").ino(), origin_ino);
        assert_eq!(fs::metadata(&second).expect("metadata").ino(), origin_ino);
    }
}

#[test]
fn exists_is_false_when_any_path_is_missing() {
    let temp = temp_workspace();
    let present = temp.path().join("present.txt");
    write_file(&present, "x");
    let absent: PathBuf = temp.path().join("absent.txt");

    assert!(exists([&present]).expect("exists"));
    assert!(!exists([&present, &absent]).expect("exists with gap"));
}
