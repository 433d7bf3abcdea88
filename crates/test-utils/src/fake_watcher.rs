use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use devloop::errors::WatchError;
use devloop::types::{EventKind, WatchNotification};
use devloop::watch::{FsWatcher, NotificationReceiver};
use tokio::sync::mpsc;

/// A scripted `FsWatcher`:
/// - records every `watch` call, in order
/// - fails `watch` for configured paths
/// - emits whatever the test pushes through its [`FakeWatcherControl`].
///
/// The stream closes once the control is dropped (or `close()`d).
#[derive(Debug)]
pub struct FakeWatcher {
    watch_calls: Arc<Mutex<Vec<PathBuf>>>,
    active: Arc<Mutex<HashSet<PathBuf>>>,
    fail_on: HashSet<PathBuf>,
    stopped: Arc<Mutex<bool>>,
    events: Option<NotificationReceiver>,
}

/// Test-side end of a [`FakeWatcher`].
#[derive(Debug)]
pub struct FakeWatcherControl {
    tx: mpsc::UnboundedSender<WatchNotification>,
    watch_calls: Arc<Mutex<Vec<PathBuf>>>,
    stopped: Arc<Mutex<bool>>,
}

impl FakeWatcher {
    pub fn new() -> (Self, FakeWatcherControl) {
        let (tx, rx) = mpsc::unbounded_channel();
        let watch_calls = Arc::new(Mutex::new(Vec::new()));
        let stopped = Arc::new(Mutex::new(false));

        let watcher = Self {
            watch_calls: Arc::clone(&watch_calls),
            active: Arc::new(Mutex::new(HashSet::new())),
            fail_on: HashSet::new(),
            stopped: Arc::clone(&stopped),
            events: Some(rx),
        };
        let control = FakeWatcherControl {
            tx,
            watch_calls,
            stopped,
        };
        (watcher, control)
    }

    /// Make `watch(path)` fail with a registration error.
    pub fn fail_on(mut self, path: impl Into<PathBuf>) -> Self {
        self.fail_on.insert(path.into());
        self
    }
}

impl FsWatcher for FakeWatcher {
    fn watch(&mut self, path: &Path) -> Result<(), WatchError> {
        self.watch_calls.lock().unwrap().push(path.to_path_buf());
        if self.fail_on.contains(path) {
            return Err(WatchError::Registration {
                path: path.to_path_buf(),
                reason: "scripted failure".to_string(),
            });
        }
        self.active.lock().unwrap().insert(path.to_path_buf());
        Ok(())
    }

    fn unwatch(&mut self, path: &Path) -> Result<(), WatchError> {
        if self.active.lock().unwrap().remove(path) {
            Ok(())
        } else {
            Err(WatchError::NotFound {
                path: path.to_path_buf(),
            })
        }
    }

    fn events(&mut self) -> Option<NotificationReceiver> {
        self.events.take()
    }

    fn stop(self) {
        *self.stopped.lock().unwrap() = true;
    }
}

impl FakeWatcherControl {
    pub fn send(&self, notification: WatchNotification) {
        self.tx
            .send(notification)
            .expect("fake watcher stream receiver dropped");
    }

    pub fn send_event(&self, path: impl Into<PathBuf>, kind: EventKind) {
        self.send(WatchNotification::event(path, kind));
    }

    pub fn send_failure(&self, reason: &str) {
        self.send(WatchNotification::Failure(WatchError::Backend {
            reason: reason.to_string(),
        }));
    }

    /// Paths passed to `watch`, in call order.
    pub fn watch_calls(&self) -> Vec<PathBuf> {
        self.watch_calls.lock().unwrap().clone()
    }

    pub fn is_stopped(&self) -> bool {
        *self.stopped.lock().unwrap()
    }

    /// Close the stream after what has been sent so far.
    pub fn close(self) -> ClosedFakeWatcher {
        ClosedFakeWatcher {
            watch_calls: self.watch_calls,
            stopped: self.stopped,
        }
    }
}

/// What remains observable after the stream has been closed.
#[derive(Debug)]
pub struct ClosedFakeWatcher {
    watch_calls: Arc<Mutex<Vec<PathBuf>>>,
    stopped: Arc<Mutex<bool>>,
}

impl ClosedFakeWatcher {
    pub fn watch_calls(&self) -> Vec<PathBuf> {
        self.watch_calls.lock().unwrap().clone()
    }

    pub fn is_stopped(&self) -> bool {
        *self.stopped.lock().unwrap()
    }
}
