// src/gitignore.rs

//! Ignore filter backed by `git check-ignore`.
//!
//! Git is the source of truth for which paths are noise. Each query runs
//! `git check-ignore -q <path>` in the watched root:
//! - exit status 0: ignored
//! - exit status 1: not ignored
//! - anything else, or any output at all: evaluation error
//!
//! Git never reports its own `.git` directory as ignored, so paths inside it
//! are treated as ignored without asking.

use std::future::Future;
use std::path::{Component, Path, PathBuf};
use std::pin::Pin;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::FilterError;

/// Name of git's metadata directory.
pub const GIT_DIR: &str = ".git";

/// Decides whether a changed path can be skipped.
pub trait IgnoreFilter: Send + Sync {
    fn is_ignored<'a>(
        &'a self,
        path: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<bool, FilterError>> + Send + 'a>>;
}

/// [`IgnoreFilter`] that shells out to git.
#[derive(Debug, Clone)]
pub struct GitIgnore {
    git: PathBuf,
    root: PathBuf,
}

impl GitIgnore {
    /// Locate `git` on the search path.
    ///
    /// Fails with [`FilterError::Unavailable`] if it cannot be found; callers
    /// should treat that as fatal rather than watching everything.
    pub fn probe(root: impl Into<PathBuf>) -> Result<Self, FilterError> {
        let git = which::which("git")
            .map_err(|e| FilterError::Unavailable(format!("git not found on PATH: {e}")))?;
        let root = root.into();
        info!(git = ?git, root = ?root, "using git for ignore rules");
        Ok(Self { git, root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn check(&self, path: &Path) -> Result<bool, FilterError> {
        if is_vcs_metadata(&self.root, path) {
            debug!(path = ?path, "inside .git; ignoring");
            return Ok(true);
        }

        let output = Command::new(&self.git)
            .arg("check-ignore")
            .arg("-q")
            .arg(path)
            .current_dir(&self.root)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| evaluation_error(path, format!("running git: {e}")))?;

        let ignored = match output.status.code() {
            Some(0) => true,
            Some(1) => false,
            _ => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(evaluation_error(
                    path,
                    format!("git check-ignore {}: {}", output.status, stderr.trim()),
                ));
            }
        };

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            return Err(evaluation_error(path, stderr.trim().to_string()));
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            return Err(evaluation_error(path, stdout.trim().to_string()));
        }

        debug!(path = ?path, ignored, "git check-ignore");
        Ok(ignored)
    }
}

impl IgnoreFilter for GitIgnore {
    fn is_ignored<'a>(
        &'a self,
        path: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<bool, FilterError>> + Send + 'a>> {
        Box::pin(self.check(path))
    }
}

/// True if `path` lies inside a `.git` directory (or is one).
///
/// `path` is first made relative to `root` when possible, so a root that
/// itself lives under some `.git` directory does not ignore everything.
pub fn is_vcs_metadata(root: &Path, path: &Path) -> bool {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .any(|c| matches!(c, Component::Normal(name) if name == GIT_DIR))
}

fn evaluation_error(path: &Path, reason: String) -> FilterError {
    FilterError::Evaluation {
        path: path.to_path_buf(),
        reason,
    }
}
