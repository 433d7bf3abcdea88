// src/exec/mod.rs

//! Process execution layer.
//!
//! Owns the single supervised command: starting it with inherited
//! stdout/stderr, and tearing it down deterministically before a restart.
//!
//! - [`command`] describes what to run and how to render it for humans.
//! - [`supervisor`] implements start / stop / restart.
//! - [`terminate`] holds the platform-specific ways of stopping a process
//!   (process-group signals on POSIX, `taskkill` on Windows).
//! - [`backend`] provides the `SupervisorBackend` trait the orchestrator
//!   talks to, so tests can substitute a fake supervisor.

pub mod backend;
pub mod command;
pub mod supervisor;
pub mod terminate;

pub use backend::SupervisorBackend;
pub use command::CommandSpec;
pub use supervisor::{ProcessHandle, ProcessSupervisor};
pub use terminate::{platform_terminator, PlatformTerminator, ProcessTerminator};
#[cfg(unix)]
pub use terminate::ProcessGroupTerminator;
#[cfg(windows)]
pub use terminate::TaskkillTerminator;
