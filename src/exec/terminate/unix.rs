// src/exec/terminate/unix.rs

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use nix::errno::Errno;
use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use tokio::process::Command;
use tracing::{debug, warn};

use super::ProcessTerminator;
use crate::config::model::DEFAULT_GRACE_PERIOD;
use crate::errors::SupervisorError;
use crate::exec::supervisor::ProcessHandle;

/// Runs the command as the leader of a new process group, and stops it by
/// signalling the whole group: `SIGINT`, a grace period, then `SIGKILL`.
#[derive(Debug, Clone, Copy)]
pub struct ProcessGroupTerminator {
    grace: Duration,
}

impl ProcessGroupTerminator {
    pub fn new(grace: Duration) -> Self {
        Self { grace }
    }

    pub fn grace(&self) -> Duration {
        self.grace
    }

    async fn stop_group(&self, handle: &mut ProcessHandle) -> Result<(), SupervisorError> {
        let pid = handle.pid();
        let group = Pid::from_raw(pid as i32);

        match killpg(group, Signal::SIGINT) {
            Ok(()) => tokio::time::sleep(self.grace).await,
            Err(err) => warn!(pid, error = %err, "failed to send SIGINT to process group"),
        }

        if let Err(err) = killpg(group, Signal::SIGKILL) {
            // A group that no longer exists is fine as long as our child is
            // gone too.
            let exited = matches!(handle.child_mut().try_wait(), Ok(Some(_)));
            if err != Errno::ESRCH || !exited {
                return Err(SupervisorError::Stop {
                    command: handle.command().display(),
                    reason: format!("sending SIGKILL to process group {pid}: {err}"),
                });
            }
            debug!(pid, "process group already gone");
        }

        // The exit status here is just "killed by signal".
        let _ = handle.child_mut().wait().await;
        Ok(())
    }
}

impl Default for ProcessGroupTerminator {
    fn default() -> Self {
        Self::new(DEFAULT_GRACE_PERIOD)
    }
}

impl ProcessTerminator for ProcessGroupTerminator {
    fn configure(&self, cmd: &mut Command) {
        cmd.process_group(0);
    }

    fn terminate<'a>(
        &'a self,
        handle: &'a mut ProcessHandle,
    ) -> Pin<Box<dyn Future<Output = Result<(), SupervisorError>> + Send + 'a>> {
        Box::pin(self.stop_group(handle))
    }
}
