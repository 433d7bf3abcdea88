// src/exec/terminate/windows.rs

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use super::ProcessTerminator;
use crate::errors::SupervisorError;
use crate::exec::supervisor::ProcessHandle;

/// Stops the command and all of its descendants with `taskkill /F /T`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskkillTerminator;

impl TaskkillTerminator {
    async fn kill_tree(&self, handle: &mut ProcessHandle) -> Result<(), SupervisorError> {
        let pid = handle.pid();
        let status = Command::new("taskkill")
            .args(["/F", "/T", "/PID"])
            .arg(pid.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| SupervisorError::Stop {
                command: handle.command().display(),
                reason: format!("invoking taskkill: {e}"),
            })?;

        if !status.success() {
            return Err(SupervisorError::Stop {
                command: handle.command().display(),
                reason: format!("taskkill on pid {pid} failed: {status}"),
            });
        }
        debug!(pid, "taskkill succeeded");

        // The exit status here is just "terminated".
        let _ = handle.child_mut().wait().await;
        Ok(())
    }
}

impl ProcessTerminator for TaskkillTerminator {
    fn configure(&self, _cmd: &mut Command) {}

    fn terminate<'a>(
        &'a self,
        handle: &'a mut ProcessHandle,
    ) -> Pin<Box<dyn Future<Output = Result<(), SupervisorError>> + Send + 'a>> {
        Box::pin(self.kill_tree(handle))
    }
}
