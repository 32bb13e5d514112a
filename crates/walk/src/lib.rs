#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `fskit-walk` provides the one traversal capability shared by every
//! multi-file operation in the toolkit: a lazy iterator over the entries
//! below a root path, in a caller-selected order. Mirroring and recursive
//! permission changes consume the pre-order sequence (parents before
//! children); recursive removal consumes the contents-first sequence (every
//! descendant before its parent, so directories empty out before they are
//! removed).
//!
//! Ordering is stable across platforms: directory entries are sorted
//! lexicographically before they are yielded, so two traversals of the same
//! tree always produce the same sequence.
//!
//! # Design
//!
//! - [`WalkBuilder`] configures the root, the [`WalkOrder`], whether the
//!   root entry itself is emitted, and whether directory symlinks are
//!   followed.
//! - [`Walker`] implements [`Iterator`] over `Result<WalkEntry, WalkError>`
//!   with an explicit directory stack; nothing is buffered beyond one
//!   sorted name list per open directory.
//! - [`WalkEntry`] captures an entry's paths, [`EntryKind`], and metadata
//!   once at enumeration time. Consumers treat the captured kind as
//!   authoritative for the operation that requested the walk.
//!
//! # Invariants
//!
//! - Emitted relative paths never contain `..` segments and never escape
//!   the configured root.
//! - Entries are yielded exactly once. When symlink following is enabled,
//!   canonical paths of visited directories are tracked so cycles cannot
//!   produce repeated entries or unbounded traversal.
//! - Traversal never panics; failures surface as [`WalkError`] values.
//!
//! # Examples
//!
//! ```
//! use fskit_walk::{WalkBuilder, WalkOrder};
//! use std::fs;
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! let root = temp.path().join("tree");
//! fs::create_dir_all(root.join("sub"))?;
//! fs::write(root.join("sub/file.txt"), b"data")?;
//!
//! let mut relative = Vec::new();
//! for entry in WalkBuilder::new(&root).include_root(false).build()? {
//!     relative.push(entry?.relative_path().to_path_buf());
//! }
//! assert_eq!(relative[0], std::path::Path::new("sub"));
//! assert_eq!(relative[1], std::path::Path::new("sub/file.txt"));
//!
//! let deletion_order: Vec<_> = WalkBuilder::new(&root)
//!     .order(WalkOrder::ContentsFirst)
//!     .include_root(false)
//!     .build()?
//!     .collect::<Result<Vec<_>, _>>()?;
//! assert_eq!(deletion_order[0].relative_path(), std::path::Path::new("sub/file.txt"));
//! assert_eq!(deletion_order[1].relative_path(), std::path::Path::new("sub"));
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

mod builder;
mod entry;
mod error;
mod walker;

pub use crate::builder::{WalkBuilder, WalkOrder};
pub use crate::entry::{EntryKind, WalkEntry};
pub use crate::error::WalkError;
pub use crate::walker::Walker;
