// src/watch/adapter.rs

//! Non-recursive filesystem watcher adapter.
//!
//! Wraps a native notification source behind [`FsWatcher`] and normalises its
//! output into a single channel of [`WatchNotification`]s. The production
//! implementation is [`NotifyWatcher`], backed by `notify`'s
//! `RecommendedWatcher`; tests use a scripted fake.

use std::path::Path;

use notify::event::{ModifyKind, RenameMode};
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::errors::WatchError;
use crate::types::{EventKind, FsEvent, WatchNotification};

/// Receiving end of an adapter's notification stream.
pub type NotificationReceiver = mpsc::UnboundedReceiver<WatchNotification>;

/// Capability surface of a single-path (non-recursive) watcher.
pub trait FsWatcher: Send {
    /// Start watching a single file or directory.
    fn watch(&mut self, path: &Path) -> Result<(), WatchError>;

    /// Stop watching a path previously passed to [`FsWatcher::watch`].
    fn unwatch(&mut self, path: &Path) -> Result<(), WatchError>;

    /// Take the notification stream.
    ///
    /// The stream can be taken once; later calls return `None`. It yields
    /// notifications until the watcher is stopped, then closes after the
    /// already-queued ones are drained.
    fn events(&mut self) -> Option<NotificationReceiver>;

    /// Release all native resources. Consumes the watcher, so it can only
    /// happen once.
    fn stop(self)
    where
        Self: Sized;
}

/// [`FsWatcher`] backed by `notify`.
///
/// `notify` runs its own background thread and invokes our callback there;
/// the callback is the only producer on the channel.
pub struct NotifyWatcher {
    inner: RecommendedWatcher,
    events: Option<NotificationReceiver>,
}

impl std::fmt::Debug for NotifyWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifyWatcher").finish_non_exhaustive()
    }
}

impl NotifyWatcher {
    pub fn new() -> Result<Self, WatchError> {
        let (tx, rx) = mpsc::unbounded_channel::<WatchNotification>();

        let inner = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    let normalized = normalize_event(&event);
                    if normalized.is_empty() {
                        trace!(kind = ?event.kind, paths = ?event.paths, "dropping unrecognised event");
                    }
                    for ev in normalized {
                        // Receiver gone means nobody is listening any more.
                        if tx.send(WatchNotification::Event(ev)).is_err() {
                            return;
                        }
                    }
                }
                Err(err) => {
                    let _ = tx.send(WatchNotification::Failure(WatchError::Backend {
                        reason: err.to_string(),
                    }));
                }
            },
            Config::default(),
        )
        .map_err(|e| WatchError::Backend {
            reason: e.to_string(),
        })?;

        Ok(Self {
            inner,
            events: Some(rx),
        })
    }
}

impl FsWatcher for NotifyWatcher {
    fn watch(&mut self, path: &Path) -> Result<(), WatchError> {
        self.inner
            .watch(path, RecursiveMode::NonRecursive)
            .map_err(|e| WatchError::Registration {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
    }

    fn unwatch(&mut self, path: &Path) -> Result<(), WatchError> {
        self.inner.unwatch(path).map_err(|e| match e.kind {
            notify::ErrorKind::WatchNotFound => WatchError::NotFound {
                path: path.to_path_buf(),
            },
            _ => WatchError::Backend {
                reason: e.to_string(),
            },
        })
    }

    fn events(&mut self) -> Option<NotificationReceiver> {
        self.events.take()
    }

    fn stop(self) {
        // Dropping the native watcher drops the callback and with it the
        // only sender, which closes the stream once it is drained.
        drop(self.inner);
        debug!("native watcher stopped");
    }
}

/// Map a native `notify` event onto zero or more [`FsEvent`]s, one per path.
///
/// Renames are reported the way a rename looks from the watched directory:
/// the source path as `RENAME`, the destination path as `CREATE` (so a
/// directory moved into the tree gets picked up like a new one).
pub fn normalize_event(event: &Event) -> Vec<FsEvent> {
    event
        .paths
        .iter()
        .enumerate()
        .filter_map(|(idx, path)| map_kind(&event.kind, idx).map(|k| FsEvent::new(path.clone(), k)))
        .collect()
}

fn map_kind(kind: &notify::EventKind, path_idx: usize) -> Option<EventKind> {
    match kind {
        notify::EventKind::Create(_) => Some(EventKind::CREATE),
        notify::EventKind::Remove(_) => Some(EventKind::REMOVE),
        notify::EventKind::Modify(ModifyKind::Name(mode)) => match mode {
            RenameMode::To => Some(EventKind::CREATE),
            RenameMode::Both if path_idx > 0 => Some(EventKind::CREATE),
            _ => Some(EventKind::RENAME),
        },
        notify::EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Any | ModifyKind::Other) => {
            Some(EventKind::WRITE)
        }
        notify::EventKind::Modify(ModifyKind::Metadata(_))
        | notify::EventKind::Access(_)
        | notify::EventKind::Any
        | notify::EventKind::Other => None,
    }
}
