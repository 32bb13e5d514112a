#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Overview
//!
//! `fskit-meta` wraps the per-entry metadata syscalls the toolkit needs:
//! reading and writing permission bits, propagating executable bits from a
//! copied origin onto its target, changing ownership with a link-aware
//! variant for symlink entries, resolving user and group names to numeric
//! ids, and adjusting timestamps.
//!
//! The crate deals with single entries only. Recursive application over a
//! tree is composed in `fskit-engine` by driving a traversal and calling
//! these helpers per entry.
//!
//! # Platform behaviour
//!
//! On Unix targets the helpers operate on real mode bits and ids via
//! `rustix`, with name resolution through `nix`. Elsewhere modes degrade to
//! the read-only attribute and ownership changes report
//! [`std::io::ErrorKind::Unsupported`].

mod error;
mod mode;
mod owner;
mod times;

pub use crate::error::MetaError;
pub use crate::mode::{EXECUTE_BITS, merge_execute_bits, mode_of, set_mode};
pub use crate::owner::{resolve_group, resolve_user, set_owner};
pub use crate::times::set_entry_times;
