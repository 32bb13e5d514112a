use std::collections::HashSet;
use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::builder::WalkOrder;
use crate::entry::{EntryKind, WalkEntry};
use crate::error::WalkError;

/// Lazy iterator over filesystem entries in the configured [`WalkOrder`].
///
/// The walker keeps one frame per open directory. In pre-order a directory
/// entry is yielded when the frame is pushed; in contents-first order the
/// entry travels with the frame and is yielded when the frame is exhausted,
/// which places it after every descendant.
pub struct Walker {
    order: WalkOrder,
    follow_symlinks: bool,
    pending_root: Option<WalkEntry>,
    stack: Vec<DirFrame>,
    visited: HashSet<PathBuf>,
    finished: bool,
}

impl Walker {
    pub(crate) fn new(
        root: PathBuf,
        order: WalkOrder,
        follow_symlinks: bool,
        include_root: bool,
    ) -> Result<Self, WalkError> {
        let root = absolutize(root)?;
        let metadata = fs::symlink_metadata(&root)
            .map_err(|error| WalkError::root(root.clone(), error))?;
        let kind = EntryKind::of(metadata.file_type());

        let mut walker = Self {
            order,
            follow_symlinks,
            pending_root: None,
            stack: Vec::new(),
            visited: HashSet::new(),
            finished: false,
        };

        // A root that is itself a symlink to a directory is traversed
        // through the link.
        let descend = kind.is_dir()
            || (kind.is_symlink() && fs::metadata(&root).is_ok_and(|target| target.is_dir()));

        let root_entry = include_root.then(|| WalkEntry {
            full_path: root.clone(),
            relative_path: PathBuf::new(),
            kind,
            metadata,
            depth: 0,
        });

        if descend && !walker.already_visited(&root)? {
            match order {
                WalkOrder::PreOrder => {
                    walker.pending_root = root_entry;
                    walker.push_frame(root, PathBuf::new(), 0, None)?;
                }
                WalkOrder::ContentsFirst => {
                    walker.push_frame(root, PathBuf::new(), 0, root_entry)?;
                }
            }
        } else {
            walker.pending_root = root_entry;
        }

        Ok(walker)
    }

    /// Records the canonical form of a directory about to be entered and
    /// reports whether it was seen before. Only active when symlink
    /// following is enabled; without it a traversal cannot revisit a
    /// directory.
    fn already_visited(&mut self, dir: &Path) -> Result<bool, WalkError> {
        if !self.follow_symlinks {
            return Ok(false);
        }
        let canonical = fs::canonicalize(dir)
            .map_err(|error| WalkError::resolve(dir.to_path_buf(), error))?;
        Ok(!self.visited.insert(canonical))
    }

    fn push_frame(
        &mut self,
        fs_path: PathBuf,
        relative_prefix: PathBuf,
        depth: usize,
        emit_after: Option<WalkEntry>,
    ) -> Result<(), WalkError> {
        let frame = DirFrame::open(fs_path, relative_prefix, depth, emit_after)?;
        self.stack.push(frame);
        Ok(())
    }

    /// Stats one child, decides whether to descend, and returns the entry
    /// to yield now (`None` when the entry is deferred until its frame is
    /// exhausted).
    fn visit(
        &mut self,
        full_path: PathBuf,
        relative_path: PathBuf,
        depth: usize,
    ) -> Result<Option<WalkEntry>, WalkError> {
        let metadata = fs::symlink_metadata(&full_path)
            .map_err(|error| WalkError::stat(full_path.clone(), error))?;
        let kind = EntryKind::of(metadata.file_type());

        let descend_path = match kind {
            EntryKind::Directory => Some(full_path.clone()),
            EntryKind::Symlink if self.follow_symlinks => match fs::metadata(&full_path) {
                Ok(target) if target.is_dir() => Some(
                    fs::canonicalize(&full_path)
                        .map_err(|error| WalkError::resolve(full_path.clone(), error))?,
                ),
                Ok(_) => None,
                Err(error) => return Err(WalkError::stat(full_path.clone(), error)),
            },
            _ => None,
        };

        let entry = WalkEntry {
            full_path,
            relative_path,
            kind,
            metadata,
            depth,
        };

        let Some(dir_path) = descend_path else {
            return Ok(Some(entry));
        };
        if self.already_visited(&dir_path)? {
            return Ok(Some(entry));
        }

        match self.order {
            WalkOrder::PreOrder => {
                self.push_frame(dir_path, entry.relative_path.clone(), depth, None)?;
                Ok(Some(entry))
            }
            WalkOrder::ContentsFirst => {
                let relative_prefix = entry.relative_path.clone();
                self.push_frame(dir_path, relative_prefix, depth, Some(entry))?;
                Ok(None)
            }
        }
    }
}

impl Iterator for Walker {
    type Item = Result<WalkEntry, WalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        if let Some(entry) = self.pending_root.take() {
            return Some(Ok(entry));
        }

        loop {
            let child = {
                let frame = self.stack.last_mut()?;
                match frame.next_name() {
                    Some(name) => {
                        let full_path = frame.fs_path.join(&name);
                        let relative_path = if frame.relative_prefix.as_os_str().is_empty() {
                            PathBuf::from(&name)
                        } else {
                            frame.relative_prefix.join(&name)
                        };
                        Some((full_path, relative_path, frame.depth + 1))
                    }
                    None => None,
                }
            };

            match child {
                Some((full_path, relative_path, depth)) => {
                    match self.visit(full_path, relative_path, depth) {
                        Ok(Some(entry)) => return Some(Ok(entry)),
                        Ok(None) => {}
                        Err(error) => {
                            self.finished = true;
                            return Some(Err(error));
                        }
                    }
                }
                None => {
                    if let Some(frame) = self.stack.pop() {
                        if let Some(entry) = frame.emit_after {
                            return Some(Ok(entry));
                        }
                    }
                }
            }
        }
    }
}

struct DirFrame {
    fs_path: PathBuf,
    relative_prefix: PathBuf,
    entries: Vec<OsString>,
    index: usize,
    depth: usize,
    emit_after: Option<WalkEntry>,
}

impl DirFrame {
    fn open(
        fs_path: PathBuf,
        relative_prefix: PathBuf,
        depth: usize,
        emit_after: Option<WalkEntry>,
    ) -> Result<Self, WalkError> {
        let read_dir =
            fs::read_dir(&fs_path).map_err(|error| WalkError::list(fs_path.clone(), error))?;
        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|error| WalkError::entry(fs_path.clone(), error))?;
            entries.push(entry.file_name());
        }
        entries.sort();

        Ok(Self {
            fs_path,
            relative_prefix,
            entries,
            index: 0,
            depth,
            emit_after,
        })
    }

    fn next_name(&mut self) -> Option<OsString> {
        let name = self.entries.get(self.index)?.clone();
        self.index += 1;
        Some(name)
    }
}

fn absolutize(path: PathBuf) -> Result<PathBuf, WalkError> {
    if path.is_absolute() {
        Ok(path)
    } else {
        let cwd = env::current_dir()
            .map_err(|error| WalkError::resolve(PathBuf::from("."), error))?;
        Ok(cwd.join(path))
    }
}
