// src/watch/watcher.rs

use std::collections::HashSet;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::Debounce;
use crate::errors::{Result, WatchError};
use crate::fs::FileSystem;
use crate::types::{EventKind, WatchNotification};
use crate::watch::adapter::FsWatcher;

/// Receiver of debounced notifications.
///
/// Returning an error stops the watch loop and the error is handed back to
/// the caller of [`DirWatcher::watch`].
pub trait NotificationHandler: Send {
    fn handle(
        &mut self,
        notification: WatchNotification,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Keeps a whole directory tree watched through a non-recursive
/// [`FsWatcher`], and collapses bursts of notifications into one.
///
/// Directories are only ever added to the watch set; a deleted directory
/// keeps its entry until the watcher is stopped, and is registered again if
/// it reappears.
pub struct DirWatcher<W: FsWatcher> {
    watcher: W,
    fs: Arc<dyn FileSystem>,
    debounce: Debounce,
    watched: HashSet<PathBuf>,
}

impl<W: FsWatcher> std::fmt::Debug for DirWatcher<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirWatcher")
            .field("debounce", &self.debounce)
            .field("watched", &self.watched.len())
            .finish_non_exhaustive()
    }
}

impl<W: FsWatcher> DirWatcher<W> {
    /// Create a watcher with the default debounce tuning.
    pub fn new(watcher: W, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            watcher,
            fs,
            debounce: Debounce::default(),
            watched: HashSet::new(),
        }
    }

    pub fn with_debounce(mut self, debounce: Debounce) -> Self {
        self.debounce = debounce;
        self
    }

    /// Directories currently registered with the underlying watcher.
    pub fn watched(&self) -> &HashSet<PathBuf> {
        &self.watched
    }

    /// Watch `root` and every directory below it, then feed debounced
    /// notifications to `handler` until the notification stream closes or
    /// `handler` fails.
    ///
    /// Any registration failure, initially or for a directory that appears
    /// later, ends the loop with that error.
    pub async fn watch<H>(&mut self, root: &Path, handler: &mut H) -> Result<()>
    where
        H: NotificationHandler + ?Sized,
    {
        self.watch_tree(root)?;
        info!(root = ?root, dirs = self.watched.len(), "watching directory tree");

        let mut events = self.watcher.events().ok_or_else(|| WatchError::Backend {
            reason: "notification stream already taken".to_string(),
        })?;

        loop {
            let Some(first) = events.recv().await else {
                debug!("notification stream closed");
                return Ok(());
            };
            self.process(&first)?;

            // Absorb the rest of the burst. Each item re-arms the timer.
            let mut closed = false;
            let mut absorbed = 0usize;
            while absorbed < self.debounce.count {
                match timeout(self.debounce.interval, events.recv()).await {
                    Ok(Some(next)) => {
                        self.process(&next)?;
                        absorbed += 1;
                    }
                    Ok(None) => {
                        closed = true;
                        break;
                    }
                    Err(_elapsed) => break,
                }
            }
            if absorbed > 0 {
                debug!(absorbed, "debounced notifications");
            }

            handler.handle(first).await?;

            if closed {
                debug!("notification stream closed");
                return Ok(());
            }
        }
    }

    /// Register `root` and every directory below it.
    ///
    /// Every directory is handed to the underlying watcher even if it is
    /// already in the watch set: a directory deleted and recreated at the
    /// same path has lost its native watch.
    pub fn watch_tree(&mut self, root: &Path) -> std::result::Result<(), WatchError> {
        let watcher = &mut self.watcher;
        let watched = &mut self.watched;

        self.fs.walk_dirs(root, &mut |dir| {
            watcher.watch(dir)?;
            if watched.insert(dir.to_path_buf()) {
                debug!(path = ?dir, "watching directory");
            } else {
                debug!(path = ?dir, "re-registered directory");
            }
            Ok(())
        })
    }

    /// Release the underlying watcher.
    pub fn stop(self) {
        self.watcher.stop();
    }

    /// Watch-set maintenance for a single notification.
    fn process(&mut self, notification: &WatchNotification) -> std::result::Result<(), WatchError> {
        match notification {
            WatchNotification::Failure(err) => {
                warn!(error = %err, "watch notification failure");
            }
            WatchNotification::Event(ev) => {
                debug!(event = %ev, "filesystem event");
                if ev.kind.contains(EventKind::CREATE) && self.fs.is_dir(&ev.path) {
                    self.watch_tree(&ev.path)?;
                }
            }
        }
        Ok(())
    }
}
