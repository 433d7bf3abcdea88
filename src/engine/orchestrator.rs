// src/engine/orchestrator.rs

use std::future::Future;
use std::pin::Pin;

use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::exec::{CommandSpec, SupervisorBackend};
use crate::gitignore::IgnoreFilter;
use crate::types::{FsEvent, WatchNotification};
use crate::watch::NotificationHandler;

/// Restarts the supervised command for every change the ignore filter does
/// not rule out.
///
/// Tracks at most one running command. Any start/stop failure is returned
/// and ends the run; there are no automatic retries.
pub struct Orchestrator<F: IgnoreFilter, S: SupervisorBackend> {
    filter: F,
    supervisor: S,
    command: CommandSpec,
    current: Option<S::Handle>,
    restarts: u64,
}

impl<F: IgnoreFilter, S: SupervisorBackend> std::fmt::Debug for Orchestrator<F, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("command", &self.command)
            .field("running", &self.current.is_some())
            .field("restarts", &self.restarts)
            .finish_non_exhaustive()
    }
}

impl<F: IgnoreFilter, S: SupervisorBackend> Orchestrator<F, S> {
    pub fn new(filter: F, supervisor: S, command: CommandSpec) -> Self {
        Self {
            filter,
            supervisor,
            command,
            current: None,
            restarts: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.current.is_some()
    }

    /// Number of restarts performed so far.
    pub fn restarts(&self) -> u64 {
        self.restarts
    }

    /// Start the command for the first time.
    pub fn start(&mut self) -> Result<()> {
        let handle = self.supervisor.start(&self.command)?;
        self.current = Some(handle);
        Ok(())
    }

    /// Stop the tracked command, if any.
    pub async fn shutdown(&mut self) -> Result<()> {
        if let Some(handle) = self.current.take() {
            info!(command = %self.command, "stopping command before exit");
            self.supervisor.stop(handle).await?;
        }
        Ok(())
    }

    async fn on_notification(&mut self, notification: WatchNotification) -> Result<()> {
        let event = match notification {
            WatchNotification::Failure(err) => {
                warn!(error = %err, "skipping watch failure");
                return Ok(());
            }
            WatchNotification::Event(event) => event,
        };

        if Self::should_skip(&self.filter, &event).await {
            return Ok(());
        }

        info!(event = %event, command = %self.command, "change detected; restarting");
        self.restart().await
    }

    /// Ask the ignore filter. Evaluation errors count as "not ignored" so a
    /// real change is never hidden.
    async fn should_skip(filter: &F, event: &FsEvent) -> bool {
        match filter.is_ignored(&event.path).await {
            Ok(true) => {
                debug!(event = %event, "ignored change");
                true
            }
            Ok(false) => false,
            Err(err) => {
                warn!(event = %event, error = %err, "ignore check failed; treating change as relevant");
                false
            }
        }
    }

    async fn restart(&mut self) -> Result<()> {
        let handle = match self.current.take() {
            Some(handle) => self.supervisor.restart(handle, &self.command).await?,
            None => self.supervisor.start(&self.command)?,
        };
        self.current = Some(handle);
        self.restarts += 1;
        Ok(())
    }
}

impl<F: IgnoreFilter, S: SupervisorBackend> NotificationHandler for Orchestrator<F, S> {
    fn handle(
        &mut self,
        notification: WatchNotification,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(self.on_notification(notification))
    }
}
