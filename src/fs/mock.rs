// src/fs/mock.rs

use super::FileSystem;
use crate::errors::WatchError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File,
    Dir(Vec<String>), // List of child names
}

/// In-memory directory tree.
///
/// Clones share the same tree, so a test can keep a handle and grow the tree
/// while a watcher owns another clone.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    entries: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directory (and any missing parents).
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut entries = self.entries.lock().unwrap();
        Self::ensure_dir_entry(&mut entries, path.as_ref());
    }

    /// Add a file (and any missing parent directories).
    pub fn add_file(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut entries = self.entries.lock().unwrap();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Self::ensure_dir_entry(&mut entries, parent);
            Self::link_child(&mut entries, parent, path);
        }
        entries.insert(path.to_path_buf(), MockEntry::File);
    }

    /// Remove an entry and everything below it.
    pub fn remove(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut entries = self.entries.lock().unwrap();
        entries.retain(|p, _| !p.starts_with(path));
        if let Some(parent) = path.parent() {
            if let (Some(MockEntry::Dir(children)), Some(name)) =
                (entries.get_mut(parent), path.file_name().and_then(|n| n.to_str()))
            {
                children.retain(|c| c != name);
            }
        }
    }

    fn ensure_dir_entry(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        if entries.contains_key(path) {
            return;
        }
        entries.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if parent != path {
                Self::ensure_dir_entry(entries, parent);
                Self::link_child(entries, parent, path);
            }
        }
    }

    fn link_child(entries: &mut HashMap<PathBuf, MockEntry>, parent: &Path, child: &Path) {
        if let Some(MockEntry::Dir(children)) = entries.get_mut(parent) {
            if let Some(name) = child.file_name().and_then(|n| n.to_str()) {
                if !children.iter().any(|c| c == name) {
                    children.push(name.to_string());
                }
            }
        }
    }

    /// Directories in pre-order, starting at `root`.
    fn dirs_under(&self, root: &Path) -> Result<Vec<PathBuf>, WatchError> {
        let entries = self.entries.lock().unwrap();
        if !matches!(entries.get(root), Some(MockEntry::Dir(_))) {
            return Err(WatchError::Walk {
                path: root.to_path_buf(),
                reason: "no such directory".to_string(),
            });
        }

        let mut out = Vec::new();
        let mut stack = vec![root.to_path_buf()];
        while let Some(dir) = stack.pop() {
            if let Some(MockEntry::Dir(children)) = entries.get(&dir) {
                // Reverse so the first child is visited first.
                for name in children.iter().rev() {
                    let child = dir.join(name);
                    if matches!(entries.get(&child), Some(MockEntry::Dir(_))) {
                        stack.push(child);
                    }
                }
                out.push(dir);
            }
        }
        Ok(out)
    }
}

impl FileSystem for MockFileSystem {
    fn is_dir(&self, path: &Path) -> bool {
        let entries = self.entries.lock().unwrap();
        matches!(entries.get(path), Some(MockEntry::Dir(_)))
    }

    fn walk_dirs(
        &self,
        root: &Path,
        visit: &mut dyn FnMut(&Path) -> Result<(), WatchError>,
    ) -> Result<(), WatchError> {
        // Collect first so the lock is not held while `visit` runs.
        for dir in self.dirs_under(root)? {
            visit(&dir)?;
        }
        Ok(())
    }
}
