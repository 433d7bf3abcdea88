// src/engine/mod.rs

//! Orchestration engine for devloop.
//!
//! Ties the pieces together for each debounced notification:
//! - failures from the watcher are logged and skipped
//! - events are checked against the ignore filter
//! - everything else restarts the supervised command
//!
//! The orchestrator plugs into the directory watcher as its
//! [`NotificationHandler`](crate::watch::NotificationHandler).

pub mod orchestrator;

pub use orchestrator::Orchestrator;
