#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Overview
//!
//! `fskit` bundles the workspace crates behind one dependency: file copy
//! with a skip-if-newer check, tree mirroring, atomic whole-file writes,
//! recursive tree operations, symlink and hard link management, and named
//! advisory locks.
//!
//! The everyday operations are re-exported at the crate root. The member
//! crates remain reachable as modules ([`path`], [`walk`], [`meta`],
//! [`engine`], [`lock`]) for the pieces the flat surface leaves out, such
//! as building a filtered traversal to feed
//! [`mirror_with_entries`].
//!
//! # Examples
//!
//! ```
//! use fskit::{LockHandle, MirrorOptions, dump_file, mirror};
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! let origin = temp.path().join("site");
//! let published = temp.path().join("published");
//!
//! dump_file(&origin.join("index.html"), b"<h1>hello</h1>")?;
//!
//! let mut guard = LockHandle::new_in("publish", temp.path())?;
//! if guard.lock(false)? {
//!     mirror(&origin, &published, &MirrorOptions::new().delete_extraneous(true))?;
//!     guard.release();
//! }
//!
//! assert_eq!(
//!     std::fs::read(published.join("index.html"))?,
//!     b"<h1>hello</h1>"
//! );
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

pub use fskit_engine as engine;
pub use fskit_lock as lock;
pub use fskit_meta as meta;
pub use fskit_path as path;
pub use fskit_walk as walk;

pub use fskit_engine::{
    CopyOptions, CopyOutcome, FsError, FsErrorKind, MirrorOptions, append_to_file, chgrp, chmod,
    chown, copy_file, dump_file, exists, hardlink, mkdir, mkdir_mode, mirror, mirror_with_entries,
    read_link, remove, rename, symlink, temp_file_in, touch,
};
pub use fskit_lock::{LockError, LockHandle};
