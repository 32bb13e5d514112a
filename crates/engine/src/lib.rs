#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Overview
//!
//! `fskit-engine` implements the toolkit's filesystem operations: single
//! file copy with a skip-if-newer check, tree mirroring with optional
//! deletion of extraneous target entries, atomic whole-file writes,
//! recursive removal and permission or ownership changes, rename with a
//! cross-device fallback, and symlink and hard link management.
//!
//! All operations are synchronous and fail fast: multi-path forms process
//! their arguments in order and stop at the first error. Recursion is
//! driven by [`fskit_walk`], single-entry metadata changes go through
//! [`fskit_meta`], and path classification comes from [`fskit_path`].
//!
//! # Design
//!
//! - Every failure surfaces as an [`FsError`] whose [`FsErrorKind`] names
//!   the failed action and the path involved; callers match on the kind
//!   rather than parse messages.
//! - [`dump_file`] stages content in the target's own directory and
//!   commits with a rename, so readers observe either the old or the new
//!   content in full, never a truncated file.
//! - [`mirror`] reuses the same staging commit when rewriting files that
//!   already exist on the target side.
//! - [`copy_file`] skips work when the target is at least as new as the
//!   origin, verifies local copies byte-for-byte, and carries the origin's
//!   executable bits over to the target.
//! - Removal and recursive ownership changes run contents-first so every
//!   descendant is handled before its parent.
//!
//! # Examples
//!
//! ```
//! use fskit_engine::{CopyOptions, MirrorOptions, copy_file, dump_file, mirror};
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! let origin = temp.path().join("origin");
//! let target = temp.path().join("target");
//!
//! dump_file(&origin.join("notes.txt"), b"first draft")?;
//! mirror(&origin, &target, &MirrorOptions::new())?;
//! assert_eq!(std::fs::read(target.join("notes.txt"))?, b"first draft");
//!
//! let outcome = copy_file(
//!     &origin.join("notes.txt"),
//!     &target.join("copy.txt"),
//!     CopyOptions::new(),
//! )?;
//! assert!(outcome.is_copied());
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

mod atomic;
mod copy;
mod error;
mod links;
mod mirror;
mod ops;
mod trace;

pub use crate::atomic::{append_to_file, dump_file, temp_file_in};
pub use crate::copy::{CopyOptions, CopyOutcome, copy_file};
pub use crate::error::{FsError, FsErrorKind};
pub use crate::links::{hardlink, read_link, symlink};
pub use crate::mirror::{MirrorOptions, mirror, mirror_with_entries};
pub use crate::ops::{chgrp, chmod, chown, exists, mkdir, mkdir_mode, remove, rename, touch};
