// src/types.rs

//! Value types shared between the watcher layers and the orchestrator.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::path::PathBuf;

use crate::errors::WatchError;

/// Kind of filesystem change.
///
/// A small flag set. Each native event is mapped to exactly one kind today,
/// but kinds can be combined with `|`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EventKind(u32);

impl EventKind {
    pub const CREATE: EventKind = EventKind(1);
    pub const WRITE: EventKind = EventKind(1 << 1);
    pub const REMOVE: EventKind = EventKind(1 << 2);
    pub const RENAME: EventKind = EventKind(1 << 3);

    /// Empty set (no recognised kind).
    pub const fn empty() -> Self {
        EventKind(0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if every flag in `other` is also set in `self`.
    pub const fn contains(self, other: EventKind) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }
}

impl BitOr for EventKind {
    type Output = EventKind;

    fn bitor(self, rhs: Self) -> Self::Output {
        EventKind(self.0 | rhs.0)
    }
}

impl BitOrAssign for EventKind {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for EventKind {
    /// Renders as `CREATE|WRITE`; the empty set renders as an empty string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (EventKind::CREATE, "CREATE"),
            (EventKind::REMOVE, "REMOVE"),
            (EventKind::WRITE, "WRITE"),
            (EventKind::RENAME, "RENAME"),
        ];

        let mut first = true;
        for (kind, name) in names {
            if self.contains(kind) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// A single normalised filesystem event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEvent {
    pub path: PathBuf,
    pub kind: EventKind,
}

impl FsEvent {
    pub fn new(path: impl Into<PathBuf>, kind: EventKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

impl fmt::Display for FsEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.path.display())
    }
}

/// What the watcher adapter publishes: either an event or an out-of-band
/// failure from the native backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchNotification {
    Event(FsEvent),
    Failure(WatchError),
}

impl WatchNotification {
    pub fn event(path: impl Into<PathBuf>, kind: EventKind) -> Self {
        WatchNotification::Event(FsEvent::new(path, kind))
    }
}
