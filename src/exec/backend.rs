// src/exec/backend.rs

//! Pluggable supervisor backend abstraction.
//!
//! The orchestrator talks to a `SupervisorBackend` instead of a concrete
//! [`ProcessSupervisor`]. Production uses `ProcessSupervisor`; tests can
//! provide a fake that records restarts without spawning anything.

use std::future::Future;
use std::pin::Pin;

use crate::errors::SupervisorError;
use crate::exec::command::CommandSpec;
use crate::exec::supervisor::{ProcessHandle, ProcessSupervisor};
use crate::exec::terminate::ProcessTerminator;

/// Trait abstracting how the supervised command is started and stopped.
pub trait SupervisorBackend: Send {
    /// Whatever the backend needs to later stop what it started.
    type Handle: Send;

    fn start(&mut self, spec: &CommandSpec) -> Result<Self::Handle, SupervisorError>;

    fn stop(
        &mut self,
        handle: Self::Handle,
    ) -> Pin<Box<dyn Future<Output = Result<(), SupervisorError>> + Send + '_>>;

    /// Stop `handle`, then start `spec`. Must not start anything if the stop
    /// failed.
    fn restart<'a>(
        &'a mut self,
        handle: Self::Handle,
        spec: &'a CommandSpec,
    ) -> Pin<Box<dyn Future<Output = Result<Self::Handle, SupervisorError>> + Send + 'a>>;
}

impl<T: ProcessTerminator> SupervisorBackend for ProcessSupervisor<T> {
    type Handle = ProcessHandle;

    fn start(&mut self, spec: &CommandSpec) -> Result<ProcessHandle, SupervisorError> {
        ProcessSupervisor::start(self, spec)
    }

    fn stop(
        &mut self,
        mut handle: ProcessHandle,
    ) -> Pin<Box<dyn Future<Output = Result<(), SupervisorError>> + Send + '_>> {
        Box::pin(async move { ProcessSupervisor::stop(self, &mut handle).await })
    }

    fn restart<'a>(
        &'a mut self,
        handle: ProcessHandle,
        spec: &'a CommandSpec,
    ) -> Pin<Box<dyn Future<Output = Result<ProcessHandle, SupervisorError>> + Send + 'a>> {
        Box::pin(ProcessSupervisor::restart(self, handle, spec))
    }
}
