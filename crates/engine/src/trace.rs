//! crates/engine/src/trace.rs
//!
//! Structured tracing for engine operations. Every helper compiles to a
//! no-op inline function when the `tracing` feature is disabled.

use std::path::Path;

/// Target name for engine tracing events.
#[cfg(feature = "tracing")]
const ENGINE_TARGET: &str = "fskit::engine";

/// Traces a completed file copy.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn copy_performed(origin: &Path, destination: &Path, bytes: u64) {
    tracing::debug!(
        target: ENGINE_TARGET,
        origin = %origin.display(),
        destination = %destination.display(),
        bytes = bytes,
        "copy: complete"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn copy_performed(_origin: &Path, _destination: &Path, _bytes: u64) {}

/// Traces a copy skipped because the destination is at least as new.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn copy_skipped(origin: &Path, destination: &Path) {
    tracing::trace!(
        target: ENGINE_TARGET,
        origin = %origin.display(),
        destination = %destination.display(),
        "copy: destination is fresh, skipping"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn copy_skipped(_origin: &Path, _destination: &Path) {}

/// Traces removal of an extraneous entry during a mirror deletion pass.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn mirror_removed(path: &Path) {
    tracing::debug!(
        target: ENGINE_TARGET,
        path = %path.display(),
        "mirror: removed extraneous entry"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn mirror_removed(_path: &Path) {}

/// Traces an atomic whole-file write commit.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn dump_committed(path: &Path, bytes: usize) {
    tracing::debug!(
        target: ENGINE_TARGET,
        path = %path.display(),
        bytes = bytes,
        "dump: committed"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn dump_committed(_path: &Path, _bytes: usize) {}
