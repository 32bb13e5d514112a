#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Overview
//!
//! `fskit-lock` provides named advisory locks shared across cooperating
//! processes. A [`LockHandle`] maps a caller-supplied name to a
//! deterministic lock-file path; acquiring the lock takes an exclusive
//! advisory lock on that file through the operating system primitive, so
//! every process constructing a handle for the same name contends on the
//! same lock.
//!
//! Contention is an expected outcome, not an error: a lost acquisition
//! reports `Ok(false)`. Lock files are created on first use and never
//! deleted, which keeps acquisition free of unlink/recreate races at the
//! cost of accumulating empty lock files.
//!
//! # Examples
//!
//! ```
//! use fskit_lock::LockHandle;
//!
//! # fn demo() -> Result<(), fskit_lock::LockError> {
//! let workspace = fskit_test_support::temp_workspace();
//! let mut updates = LockHandle::new_in("catalog-update", workspace.path())?;
//!
//! if updates.lock(false)? {
//!     // exclusive section
//!     updates.release();
//! }
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

mod error;
mod handle;
mod trace;

pub use crate::error::LockError;
pub use crate::handle::LockHandle;
