#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Pure path logic for the fskit toolkit.
//!
//! # Overview
//!
//! This crate classifies path strings and computes relative paths between
//! absolute paths. It never touches the filesystem: every function here is a
//! pure computation over the textual form of a path, which keeps the callers
//! in `fskit-engine` free to decide when (and whether) to stat anything.
//!
//! Three capabilities are exposed:
//!
//! - [`PathScheme`] tags a path as living on the local filesystem or behind a
//!   `scheme://` prefix. The tag is derived once and passed down as data so
//!   that no call site re-parses the string.
//! - [`is_absolute_path`] recognizes POSIX, drive-letter, and URI-scheme
//!   absolute forms with a single rule set shared by all operations.
//! - [`make_relative`] computes the `../`-traversal form between two
//!   absolute paths, the way deployment tooling wants to print or store it.
//!
//! # Design
//!
//! Relative-path computation works on normalized segment lists: separators
//! are unified to `/`, empty and `.` segments are dropped, and `..` segments
//! collapse onto their parent before the common prefix is measured. The
//! filesystem root therefore contributes zero segments and root-relative
//! results need no special casing at the call sites.

mod limits;
mod resolve;
mod scheme;

pub use crate::limits::{PATH_LENGTH_LIMIT, exceeds_path_limit};
pub use crate::resolve::{RelativePathError, is_absolute_path, make_relative};
pub use crate::scheme::{PathScheme, split_scheme};
