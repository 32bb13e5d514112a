use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

/// Classification of a filesystem entry, captured once at enumeration time.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum EntryKind {
    /// A regular file.
    Regular,
    /// A directory.
    Directory,
    /// A symbolic link (never followed for classification).
    Symlink,
    /// Anything else: device nodes, sockets, FIFOs.
    Other,
}

impl EntryKind {
    /// Classifies a [`fs::FileType`].
    ///
    /// Symlinks win over the other checks because the file type is expected
    /// to come from a non-following stat.
    #[must_use]
    pub fn of(file_type: fs::FileType) -> Self {
        if file_type.is_symlink() {
            Self::Symlink
        } else if file_type.is_dir() {
            Self::Directory
        } else if file_type.is_file() {
            Self::Regular
        } else {
            Self::Other
        }
    }

    /// Returns `true` for [`EntryKind::Directory`].
    #[must_use]
    pub const fn is_dir(self) -> bool {
        matches!(self, Self::Directory)
    }

    /// Returns `true` for [`EntryKind::Regular`].
    #[must_use]
    pub const fn is_file(self) -> bool {
        matches!(self, Self::Regular)
    }

    /// Returns `true` for [`EntryKind::Symlink`].
    #[must_use]
    pub const fn is_symlink(self) -> bool {
        matches!(self, Self::Symlink)
    }
}

/// One step of a filesystem traversal.
///
/// Paths, kind, and metadata are captured when the entry is produced and
/// never refreshed; operations that need current state re-stat explicitly.
#[derive(Debug)]
pub struct WalkEntry {
    pub(crate) full_path: PathBuf,
    pub(crate) relative_path: PathBuf,
    pub(crate) kind: EntryKind,
    pub(crate) metadata: fs::Metadata,
    pub(crate) depth: usize,
}

impl WalkEntry {
    /// Returns the absolute path of the entry.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.full_path
    }

    /// Returns the path relative to the traversal root.
    ///
    /// The root entry itself has an empty relative path.
    #[must_use]
    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    /// Returns the entry's final path component, or `None` for the root.
    #[must_use]
    pub fn file_name(&self) -> Option<&OsStr> {
        self.relative_path.file_name()
    }

    /// Returns the captured [`EntryKind`].
    #[must_use]
    pub const fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Provides access to the metadata captured for the entry.
    #[must_use]
    pub const fn metadata(&self) -> &fs::Metadata {
        &self.metadata
    }

    /// Reports the depth below the traversal root (the root itself is `0`).
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Indicates whether this entry is the traversal root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.relative_path.as_os_str().is_empty()
    }
}
