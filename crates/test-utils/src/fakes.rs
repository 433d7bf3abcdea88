use std::collections::HashSet;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use devloop::errors::{DevloopError, FilterError, Result, SupervisorError};
use devloop::exec::{CommandSpec, SupervisorBackend};
use devloop::gitignore::IgnoreFilter;
use devloop::types::WatchNotification;
use devloop::watch::NotificationHandler;
use tokio::sync::mpsc;

/// Handler that records every notification it receives.
///
/// Optionally forwards each one on a channel (so tests can await delivery)
/// and optionally fails when it receives a failure notification.
#[derive(Debug, Default)]
pub struct RecordingHandler {
    seen: Arc<Mutex<Vec<WatchNotification>>>,
    forward: Option<mpsc::UnboundedSender<WatchNotification>>,
    fail_on_failure: bool,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also forward notifications to the returned receiver.
    pub fn forwarding() -> (Self, mpsc::UnboundedReceiver<WatchNotification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handler = Self {
            forward: Some(tx),
            ..Self::default()
        };
        (handler, rx)
    }

    /// Return an error when handed a failure notification.
    pub fn failing_on_failure(mut self) -> Self {
        self.fail_on_failure = true;
        self
    }

    pub fn seen(&self) -> Vec<WatchNotification> {
        self.seen.lock().unwrap().clone()
    }
}

impl NotificationHandler for RecordingHandler {
    fn handle(
        &mut self,
        notification: WatchNotification,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            self.seen.lock().unwrap().push(notification.clone());
            if let Some(tx) = &self.forward {
                let _ = tx.send(notification.clone());
            }
            match notification {
                WatchNotification::Failure(err) if self.fail_on_failure => {
                    Err(DevloopError::Watch(err))
                }
                _ => Ok(()),
            }
        })
    }
}

/// Ignore filter driven by fixed path sets.
#[derive(Debug, Default, Clone)]
pub struct FakeIgnoreFilter {
    ignored: HashSet<PathBuf>,
    erroring: HashSet<PathBuf>,
    queried: Arc<Mutex<Vec<PathBuf>>>,
}

impl FakeIgnoreFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ignore(mut self, path: impl Into<PathBuf>) -> Self {
        self.ignored.insert(path.into());
        self
    }

    /// Make evaluation fail for `path`.
    pub fn error_on(mut self, path: impl Into<PathBuf>) -> Self {
        self.erroring.insert(path.into());
        self
    }

    pub fn queried(&self) -> Vec<PathBuf> {
        self.queried.lock().unwrap().clone()
    }
}

impl IgnoreFilter for FakeIgnoreFilter {
    fn is_ignored<'a>(
        &'a self,
        path: &'a Path,
    ) -> Pin<Box<dyn Future<Output = std::result::Result<bool, FilterError>> + Send + 'a>> {
        Box::pin(async move {
            self.queried.lock().unwrap().push(path.to_path_buf());
            if self.erroring.contains(path) {
                return Err(FilterError::Evaluation {
                    path: path.to_path_buf(),
                    reason: "scripted failure".to_string(),
                });
            }
            Ok(self.ignored.contains(path))
        })
    }
}

/// One call observed by [`FakeSupervisor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisorCall {
    Start(u32),
    Stop(u32),
}

/// Supervisor that hands out sequential fake pids and records calls.
#[derive(Debug, Clone, Default)]
pub struct FakeSupervisor {
    calls: Arc<Mutex<Vec<SupervisorCall>>>,
    next_pid: Arc<Mutex<u32>>,
    fail_stop: bool,
    fail_start: bool,
}

impl FakeSupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_stop(mut self) -> Self {
        self.fail_stop = true;
        self
    }

    pub fn failing_start(mut self) -> Self {
        self.fail_start = true;
        self
    }

    pub fn calls(&self) -> Vec<SupervisorCall> {
        self.calls.lock().unwrap().clone()
    }

    fn do_start(&self, spec: &CommandSpec) -> std::result::Result<u32, SupervisorError> {
        if self.fail_start {
            return Err(SupervisorError::Start {
                command: spec.display(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "scripted failure"),
            });
        }
        let mut next = self.next_pid.lock().unwrap();
        *next += 1;
        let pid = *next;
        self.calls.lock().unwrap().push(SupervisorCall::Start(pid));
        Ok(pid)
    }

    fn do_stop(&self, pid: u32) -> std::result::Result<(), SupervisorError> {
        if self.fail_stop {
            return Err(SupervisorError::Stop {
                command: format!("pid {pid}"),
                reason: "scripted failure".to_string(),
            });
        }
        self.calls.lock().unwrap().push(SupervisorCall::Stop(pid));
        Ok(())
    }
}

impl SupervisorBackend for FakeSupervisor {
    type Handle = u32;

    fn start(&mut self, spec: &CommandSpec) -> std::result::Result<u32, SupervisorError> {
        self.do_start(spec)
    }

    fn stop(
        &mut self,
        handle: u32,
    ) -> Pin<Box<dyn Future<Output = std::result::Result<(), SupervisorError>> + Send + '_>> {
        Box::pin(async move { self.do_stop(handle) })
    }

    fn restart<'a>(
        &'a mut self,
        handle: u32,
        spec: &'a CommandSpec,
    ) -> Pin<Box<dyn Future<Output = std::result::Result<u32, SupervisorError>> + Send + 'a>>
    {
        Box::pin(async move {
            self.do_stop(handle)?;
            self.do_start(spec)
        })
    }
}
