// src/exec/terminate/mod.rs

//! Platform-specific process termination.
//!
//! POSIX starts the command in its own process group so the whole group can
//! be interrupted and then killed. Windows has no process groups in that
//! sense and uses `taskkill /T` to take down the process tree instead.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::process::Command;

use crate::errors::SupervisorError;
use crate::exec::supervisor::ProcessHandle;

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

#[cfg(unix)]
pub use unix::ProcessGroupTerminator;
#[cfg(windows)]
pub use windows::TaskkillTerminator;

/// Strategy for starting and stopping a supervised process.
pub trait ProcessTerminator: Send + Sync {
    /// Adjust the command before it is spawned.
    fn configure(&self, cmd: &mut Command);

    /// Make sure the process is no longer running and has been reaped.
    fn terminate<'a>(
        &'a self,
        handle: &'a mut ProcessHandle,
    ) -> Pin<Box<dyn Future<Output = Result<(), SupervisorError>> + Send + 'a>>;
}

/// Terminator used on this platform.
#[cfg(unix)]
pub type PlatformTerminator = ProcessGroupTerminator;
#[cfg(windows)]
pub type PlatformTerminator = TaskkillTerminator;

/// Build the platform terminator. `grace` is the time between interrupt and
/// kill where the platform has such a step.
#[cfg(unix)]
pub fn platform_terminator(grace: Duration) -> PlatformTerminator {
    ProcessGroupTerminator::new(grace)
}

#[cfg(windows)]
pub fn platform_terminator(_grace: Duration) -> PlatformTerminator {
    TaskkillTerminator
}
