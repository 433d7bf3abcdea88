// src/fs/mod.rs

use std::fmt::Debug;
use std::path::Path;

use walkdir::WalkDir;

use crate::errors::WatchError;

pub mod mock;

/// Abstract filesystem interface used by the recursive watcher.
pub trait FileSystem: Send + Sync + Debug {
    fn is_dir(&self, path: &Path) -> bool;

    /// Visit every directory under `root` (including `root` itself) in
    /// pre-order. Stops at the first error returned by `visit`.
    fn walk_dirs(
        &self,
        root: &Path,
        visit: &mut dyn FnMut(&Path) -> Result<(), WatchError>,
    ) -> Result<(), WatchError>;
}

/// Implementation backed by the real filesystem.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn walk_dirs(
        &self,
        root: &Path,
        visit: &mut dyn FnMut(&Path) -> Result<(), WatchError>,
    ) -> Result<(), WatchError> {
        for entry in WalkDir::new(root) {
            let entry = entry.map_err(|e| WatchError::Walk {
                path: e.path().unwrap_or(root).to_path_buf(),
                reason: e.to_string(),
            })?;
            if entry.file_type().is_dir() {
                visit(entry.path())?;
            }
        }
        Ok(())
    }
}
