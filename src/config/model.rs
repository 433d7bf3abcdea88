// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use crate::exec::CommandSpec;

/// How bursts of filesystem events are collapsed.
///
/// After a triggering notification, up to `count` further notifications are
/// absorbed as long as each arrives within `interval` of the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debounce {
    pub count: usize,
    pub interval: Duration,
}

impl Default for Debounce {
    fn default() -> Self {
        Self {
            count: 15,
            interval: Duration::from_secs(1),
        }
    }
}

/// Default time between the interrupt and the kill signal on POSIX.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_millis(200);

/// Fully validated settings for a single run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory to switch to before doing anything else.
    pub chdir: Option<PathBuf>,
    /// Root of the watched tree (relative to the working directory).
    pub root: PathBuf,
    pub command: CommandSpec,
    pub debounce: Debounce,
    pub grace_period: Duration,
}
