use std::path::PathBuf;

use crate::error::WalkError;
use crate::walker::Walker;

/// Order in which a [`Walker`] yields entries.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum WalkOrder {
    /// Parents before children; the order used for copying and syncing.
    #[default]
    PreOrder,
    /// Every descendant before its parent; the order used for deletion,
    /// so directories are empty by the time they are yielded.
    ContentsFirst,
}

/// Configures a filesystem traversal rooted at a specific path.
#[derive(Clone, Debug)]
pub struct WalkBuilder {
    root: PathBuf,
    order: WalkOrder,
    follow_symlinks: bool,
    include_root: bool,
}

impl WalkBuilder {
    /// Creates a new builder that will traverse the provided root path.
    ///
    /// Defaults: pre-order, root entry included, symlinks not followed.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            order: WalkOrder::PreOrder,
            follow_symlinks: false,
            include_root: true,
        }
    }

    /// Selects the traversal order.
    #[must_use]
    pub const fn order(mut self, order: WalkOrder) -> Self {
        self.order = order;
        self
    }

    /// Configures whether directory symlinks should be traversed.
    ///
    /// The walker always yields the symlink entry itself, classified as
    /// [`EntryKind::Symlink`](crate::EntryKind::Symlink). When this option
    /// is enabled and the link points to a directory, the walker also
    /// descends into the target while keeping the link's relative path in
    /// the emitted entries. Canonical paths of visited directories are
    /// tracked to prevent cycles.
    #[must_use]
    pub const fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Controls whether the root entry appears in the output.
    ///
    /// When disabled, traversal covers only the root's descendants.
    #[must_use]
    pub const fn include_root(mut self, include: bool) -> Self {
        self.include_root = include;
        self
    }

    /// Builds a [`Walker`] using the configured options.
    ///
    /// # Errors
    ///
    /// Fails when the root cannot be inspected or, for a directory root,
    /// when its contents cannot be read.
    pub fn build(self) -> Result<Walker, WalkError> {
        Walker::new(self.root, self.order, self.follow_symlinks, self.include_root)
    }
}
