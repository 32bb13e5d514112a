//! Integration tests for named advisory locks through the crate facade.
//!
//! Covers exclusion between handles, blocking acquisition, and a lock
//! guarding a mirror publish.

use std::fs;
use std::thread;
use std::time::Duration;

use fskit::{LockHandle, MirrorOptions, mirror};
use fskit_test_support::{temp_workspace, write_file};

#[test]
fn a_held_lock_excludes_other_handles() {
    let temp = temp_workspace();

    let mut first = LockHandle::new_in("deploy", temp.path()).expect("first handle");
    let mut second = LockHandle::new_in("deploy", temp.path()).expect("second handle");

    assert!(first.lock(false).expect("acquire"));
    assert!(!second.lock(false).expect("contended"));

    first.release();
    assert!(second.lock(false).expect("acquire after release"));
}

#[test]
fn handles_with_the_same_name_share_a_lock_file() {
    let temp = temp_workspace();

    let first = LockHandle::new_in("catalog", temp.path()).expect("first handle");
    let second = LockHandle::new_in("catalog", temp.path()).expect("second handle");
    let other = LockHandle::new_in("inventory", temp.path()).expect("other handle");

    assert_eq!(first.lock_path(), second.lock_path());
    assert_ne!(first.lock_path(), other.lock_path());
}

#[test]
fn blocking_lock_outlasts_a_short_lived_holder() {
    let temp = temp_workspace();

    let mut holder = LockHandle::new_in("batch", temp.path()).expect("holder");
    assert!(holder.lock(false).expect("acquire"));

    let worker = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        drop(holder);
    });

    let mut waiter = LockHandle::new_in("batch", temp.path()).expect("waiter");
    assert!(waiter.lock(true).expect("blocking acquire"));
    worker.join().expect("join");
}

#[test]
fn the_lock_file_survives_the_whole_workflow() {
    let temp = temp_workspace();

    let mut handle = LockHandle::new_in("session", temp.path()).expect("handle");
    let lock_path = handle.lock_path().to_path_buf();

    assert!(handle.lock(false).expect("acquire"));
    assert!(lock_path.exists());
    handle.release();
    assert!(
        lock_path.exists(),
        "release must leave the lock file in place"
    );
}

#[test]
fn a_lock_guards_a_mirror_publish() {
    let temp = temp_workspace();
    let origin = temp.path().join("site");
    let target = temp.path().join("published");
    write_file(&origin.join("index.html"), "page");

    let mut guard = LockHandle::new_in("publish", temp.path()).expect("guard");
    assert!(guard.lock(false).expect("acquire"));

    let mut rival = LockHandle::new_in("publish", temp.path()).expect("rival");
    assert!(
        !rival.lock(false).expect("contended"),
        "the publish lock must be exclusive while mirroring"
    );

    mirror(&origin, &target, &MirrorOptions::new()).expect("mirror");
    guard.release();

    assert_eq!(fs::read(target.join("index.html")).expect("read"), b"page");
    assert!(rival.lock(false).expect("acquire after publish"));
}
