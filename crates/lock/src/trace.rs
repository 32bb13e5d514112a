//! crates/lock/src/trace.rs
//!
//! Structured tracing for lock transitions. Every helper compiles to a
//! no-op inline function when the `tracing` feature is disabled.

use std::path::Path;

/// Target name for lock tracing events.
#[cfg(feature = "tracing")]
const LOCK_TARGET: &str = "fskit::lock";

/// Traces a successful lock acquisition.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn lock_acquired(path: &Path) {
    tracing::debug!(
        target: LOCK_TARGET,
        path = %path.display(),
        "lock: acquired"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn lock_acquired(_path: &Path) {}

/// Traces an acquisition attempt that lost to another holder.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn lock_contended(path: &Path) {
    tracing::trace!(
        target: LOCK_TARGET,
        path = %path.display(),
        "lock: contended"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn lock_contended(_path: &Path) {}

/// Traces a lock release.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn lock_released(path: &Path) {
    tracing::debug!(
        target: LOCK_TARGET,
        path = %path.display(),
        "lock: released"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn lock_released(_path: &Path) {}
