//! crates/lock/src/handle.rs
//!
//! File-backed advisory lock keyed by a caller-supplied name.

use std::env;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use fs2::FileExt;

use crate::error::LockError;
use crate::trace;

/// Prefix shared by every lock file this crate creates.
const LOCK_FILE_PREFIX: &str = "fskit";

/// Pause before the final read-open retry, long enough for a concurrent
/// creator to finish marking the file read-only.
const CREATE_RACE_DELAY: Duration = Duration::from_micros(100);

/// A named advisory lock backed by a file.
///
/// The lock-file path is derived deterministically from the name, so any
/// number of processes constructing a handle for the same name in the same
/// directory contend on the same lock. One instance owns at most one open
/// descriptor, held exactly from a successful [`LockHandle::lock`] until
/// [`LockHandle::release`] or drop.
///
/// Lock files are created on first acquisition and never deleted; only
/// their advisory-lock state changes.
#[derive(Debug)]
pub struct LockHandle {
    path: PathBuf,
    handle: Option<File>,
}

impl LockHandle {
    /// Creates a handle whose lock file lives in the system temp directory.
    ///
    /// # Errors
    ///
    /// Returns [`LockError`] when the temp directory is missing or not
    /// writable.
    pub fn new(name: &str) -> Result<Self, LockError> {
        Self::new_in(name, &env::temp_dir())
    }

    /// Creates a handle whose lock file lives in `dir`.
    ///
    /// The file name joins a sanitized form of `name` with a hash of the
    /// full name, so distinct names never collide even when sanitizing
    /// makes them look alike.
    ///
    /// # Errors
    ///
    /// Returns [`LockError`] when `dir` does not exist or is not writable.
    pub fn new_in(name: &str, dir: &Path) -> Result<Self, LockError> {
        if !dir.is_dir() {
            return Err(LockError::MissingDirectory {
                path: dir.to_path_buf(),
            });
        }
        if !directory_is_writable(dir) {
            return Err(LockError::UnwritableDirectory {
                path: dir.to_path_buf(),
            });
        }

        let digest = blake3::hash(name.as_bytes()).to_hex();
        let file_name = format!("{LOCK_FILE_PREFIX}.{}.{digest}.lock", sanitized_name(name));
        Ok(Self {
            path: dir.join(file_name),
            handle: None,
        })
    }

    /// Acquires the exclusive advisory lock.
    ///
    /// Returns `Ok(true)` on acquisition and `Ok(false)` when the lock is
    /// held elsewhere; with `blocking` set the call waits indefinitely
    /// instead of reporting contention. A handle that already holds the
    /// lock reports `Ok(true)` without touching the file again.
    ///
    /// # Errors
    ///
    /// Returns [`LockError`] only when the lock file cannot be opened or
    /// created.
    pub fn lock(&mut self, blocking: bool) -> Result<bool, LockError> {
        if self.handle.is_some() {
            return Ok(true);
        }

        let file = self.open_or_create()?;

        let acquired = if blocking {
            file.lock_exclusive()
        } else {
            file.try_lock_exclusive()
        };
        if acquired.is_err() {
            trace::lock_contended(&self.path);
            return Ok(false);
        }

        trace::lock_acquired(&self.path);
        self.handle = Some(file);
        Ok(true)
    }

    /// Releases the lock and closes the descriptor, if held.
    pub fn release(&mut self) {
        if let Some(file) = self.handle.take() {
            let _ = FileExt::unlock(&file);
            trace::lock_released(&self.path);
        }
    }

    /// Returns the path of the backing lock file.
    #[must_use]
    pub fn lock_path(&self) -> &Path {
        &self.path
    }

    /// Reports whether this instance currently holds the lock.
    #[must_use]
    pub const fn is_held(&self) -> bool {
        self.handle.is_some()
    }

    /// The lock file must exist before it can be locked, and creation may
    /// race with another process creating the same file. Losing that race
    /// is absorbed by reopening for reading.
    fn open_or_create(&self) -> Result<File, LockError> {
        if let Ok(file) = File::open(&self.path) {
            return Ok(file);
        }

        if let Ok(file) = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            let _ = make_read_only(&self.path);
            return Ok(file);
        }

        if let Ok(file) = File::open(&self.path) {
            return Ok(file);
        }

        thread::sleep(CREATE_RACE_DELAY);
        File::open(&self.path).map_err(|error| LockError::Open {
            path: self.path.clone(),
            source: error,
        })
    }
}

impl Drop for LockHandle {
    fn drop(&mut self) {
        self.release();
    }
}

/// Replaces every run of characters outside `[A-Za-z0-9._-]` with a single
/// `-`.
fn sanitized_name(name: &str) -> String {
    let mut sanitized = String::with_capacity(name.len());
    let mut previous_replaced = false;
    for character in name.chars() {
        if character.is_ascii_alphanumeric() || matches!(character, '.' | '_' | '-') {
            sanitized.push(character);
            previous_replaced = false;
        } else if !previous_replaced {
            sanitized.push('-');
            previous_replaced = true;
        }
    }
    sanitized
}

fn make_read_only(path: &Path) -> io::Result<()> {
    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_readonly(true);
    fs::set_permissions(path, permissions)
}

#[cfg(unix)]
fn directory_is_writable(dir: &Path) -> bool {
    rustix::fs::access(dir, rustix::fs::Access::WRITE_OK).is_ok()
}

#[cfg(not(unix))]
fn directory_is_writable(dir: &Path) -> bool {
    fs::metadata(dir).is_ok_and(|metadata| !metadata.permissions().readonly())
}

#[cfg(test)]
mod tests {
    use super::*;

    use fskit_test_support::temp_workspace;

    #[test]
    fn lock_file_name_joins_sanitized_name_and_digest() {
        let temp = temp_workspace();
        let handle = LockHandle::new_in("demo resource!", temp.path()).expect("handle");

        let file_name = handle
            .lock_path()
            .file_name()
            .expect("file name")
            .to_string_lossy()
            .into_owned();
        let digest = blake3::hash(b"demo resource!").to_hex();
        assert_eq!(file_name, format!("fskit.demo-resource-.{digest}.lock"));
    }

    #[test]
    fn identical_names_map_to_the_same_lock_file() {
        let temp = temp_workspace();
        let first = LockHandle::new_in("shared", temp.path()).expect("first");
        let second = LockHandle::new_in("shared", temp.path()).expect("second");
        let other = LockHandle::new_in("other", temp.path()).expect("other");

        assert_eq!(first.lock_path(), second.lock_path());
        assert_ne!(first.lock_path(), other.lock_path());
    }

    #[test]
    fn new_places_lock_files_in_the_system_temp_directory() {
        let handle = LockHandle::new("fskit-handle-naming").expect("handle");
        assert_eq!(handle.lock_path().parent(), Some(env::temp_dir().as_path()));
    }

    #[test]
    fn missing_directory_is_rejected() {
        let temp = temp_workspace();
        let error =
            LockHandle::new_in("demo", &temp.path().join("absent")).expect_err("missing dir");
        assert!(matches!(error, LockError::MissingDirectory { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn unwritable_directory_is_rejected() {
        use std::os::unix::fs::PermissionsExt;

        if rustix::process::geteuid().as_raw() == 0 {
            // Root bypasses directory write permission checks.
            return;
        }

        let temp = temp_workspace();
        let dir = temp.path().join("sealed");
        fs::create_dir(&dir).expect("mkdir");
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o555)).expect("chmod");

        let error = LockHandle::new_in("demo", &dir).expect_err("unwritable dir");
        assert!(matches!(error, LockError::UnwritableDirectory { .. }));

        fs::set_permissions(&dir, fs::Permissions::from_mode(0o755)).expect("restore");
    }

    #[test]
    fn lock_acquires_and_repeated_calls_are_idempotent() {
        let temp = temp_workspace();
        let mut handle = LockHandle::new_in("idempotent", temp.path()).expect("handle");

        assert!(handle.lock(false).expect("first lock"));
        assert!(handle.is_held());
        assert!(handle.lock(false).expect("second lock"));
        assert!(handle.is_held());
    }

    #[test]
    fn a_held_lock_turns_away_other_handles_until_release() {
        let temp = temp_workspace();
        let mut first = LockHandle::new_in("contended", temp.path()).expect("first");
        let mut second = LockHandle::new_in("contended", temp.path()).expect("second");

        assert!(first.lock(false).expect("acquire"));
        assert!(!second.lock(false).expect("contended attempt"));
        assert!(!second.is_held());

        first.release();
        assert!(!first.is_held());
        assert!(second.lock(false).expect("acquire after release"));
    }

    #[test]
    fn dropping_a_handle_releases_its_lock() {
        let temp = temp_workspace();
        let mut first = LockHandle::new_in("dropped", temp.path()).expect("first");
        assert!(first.lock(false).expect("acquire"));
        drop(first);

        let mut second = LockHandle::new_in("dropped", temp.path()).expect("second");
        assert!(second.lock(false).expect("acquire after drop"));
    }

    #[test]
    fn blocking_lock_waits_for_the_holder_to_release() {
        let temp = temp_workspace();
        let mut first = LockHandle::new_in("blocking", temp.path()).expect("first");
        assert!(first.lock(false).expect("acquire"));

        let holder = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            drop(first);
        });

        let mut second = LockHandle::new_in("blocking", temp.path()).expect("second");
        assert!(second.lock(true).expect("blocking acquire"));
        holder.join().expect("holder thread");
    }

    #[test]
    fn the_lock_file_outlives_release() {
        let temp = temp_workspace();
        let mut handle = LockHandle::new_in("persistent", temp.path()).expect("handle");
        assert!(handle.lock(false).expect("acquire"));
        let path = handle.lock_path().to_path_buf();
        handle.release();

        assert!(path.is_file());
        assert!(handle.lock(false).expect("relock"));
    }

    #[test]
    fn release_without_a_lock_is_a_no_op() {
        let temp = temp_workspace();
        let mut handle = LockHandle::new_in("idle", temp.path()).expect("handle");
        handle.release();
        assert!(!handle.is_held());
    }
}
