// src/watch/mod.rs

//! File watching.
//!
//! This module is responsible for:
//! - Normalising a native, non-recursive notification source into a channel
//!   of [`WatchNotification`](crate::types::WatchNotification)s ([`adapter`]).
//! - Keeping an entire directory tree covered by those non-recursive watches
//!   as directories appear, and debouncing bursts ([`watcher`]).
//!
//! It does **not** decide whether a change matters; that is the job of the
//! ignore filter and the orchestrator.

pub mod adapter;
pub mod watcher;

pub use adapter::{normalize_event, FsWatcher, NotificationReceiver, NotifyWatcher};
pub use watcher::{DirWatcher, NotificationHandler};
