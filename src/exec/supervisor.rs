// src/exec/supervisor.rs

//! Start / stop / restart of the supervised process.

use std::process::Stdio;

use tokio::process::{Child, Command};
use tracing::{debug, info};

use crate::errors::SupervisorError;
use crate::exec::command::CommandSpec;
use crate::exec::terminate::{PlatformTerminator, ProcessTerminator};

/// A running (or not yet reaped) supervised process.
///
/// The child is spawned with kill-on-drop, so dropping a handle without
/// stopping it still kills the primary process.
#[derive(Debug)]
pub struct ProcessHandle {
    child: Child,
    pid: u32,
    command: CommandSpec,
}

impl ProcessHandle {
    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn command(&self) -> &CommandSpec {
        &self.command
    }

    pub(crate) fn child_mut(&mut self) -> &mut Child {
        &mut self.child
    }
}

/// Owns the lifecycle of one command at a time.
///
/// How a process is stopped depends on the platform and is delegated to a
/// [`ProcessTerminator`].
#[derive(Debug, Clone)]
pub struct ProcessSupervisor<T: ProcessTerminator = PlatformTerminator> {
    terminator: T,
}

impl<T: ProcessTerminator> ProcessSupervisor<T> {
    pub fn new(terminator: T) -> Self {
        Self { terminator }
    }

    /// Launch `spec` with stdout/stderr inherited and stdin closed.
    pub fn start(&self, spec: &CommandSpec) -> Result<ProcessHandle, SupervisorError> {
        let mut cmd = Command::new(spec.program());
        cmd.args(spec.args())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        self.terminator.configure(&mut cmd);

        let child = cmd.spawn().map_err(|source| SupervisorError::Start {
            command: spec.display(),
            source,
        })?;
        let pid = child.id().ok_or_else(|| SupervisorError::Start {
            command: spec.display(),
            source: std::io::Error::other("spawned process has no pid"),
        })?;

        info!(pid, command = %spec, "started command");
        Ok(ProcessHandle {
            child,
            pid,
            command: spec.clone(),
        })
    }

    /// Stop the process behind `handle` and wait until it has been reaped.
    pub async fn stop(&self, handle: &mut ProcessHandle) -> Result<(), SupervisorError> {
        debug!(pid = handle.pid, command = %handle.command, "stopping command");
        self.terminator.terminate(handle).await?;
        info!(pid = handle.pid, command = %handle.command, "command stopped");
        Ok(())
    }

    /// Stop `handle`, then start `spec`.
    ///
    /// If stopping fails nothing new is started.
    pub async fn restart(
        &self,
        mut handle: ProcessHandle,
        spec: &CommandSpec,
    ) -> Result<ProcessHandle, SupervisorError> {
        self.stop(&mut handle).await?;
        drop(handle);
        self.start(spec)
    }
}
