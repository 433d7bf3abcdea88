// src/errors.rs

//! Crate-wide error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the watcher adapter and the recursive directory watcher.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WatchError {
    #[error("failed to watch {path:?}: {reason}")]
    Registration { path: PathBuf, reason: String },

    #[error("path is not watched: {path:?}")]
    NotFound { path: PathBuf },

    #[error("failed to walk {path:?}: {reason}")]
    Walk { path: PathBuf, reason: String },

    /// Out-of-band failure reported by the native notification backend.
    #[error("file watch error: {reason}")]
    Backend { reason: String },
}

/// Errors raised by the ignore filter.
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("ignore filter unavailable: {0}")]
    Unavailable(String),

    #[error("ignore check failed for {path:?}: {reason}")]
    Evaluation { path: PathBuf, reason: String },
}

/// Errors raised while starting or stopping the supervised process.
#[derive(Error, Debug)]
pub enum SupervisorError {
    #[error("failed to start `{command}`: {source}")]
    Start {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to stop `{command}`: {reason}")]
    Stop { command: String, reason: String },
}

#[derive(Error, Debug)]
pub enum DevloopError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Watch(#[from] WatchError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Supervisor(#[from] SupervisorError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, DevloopError>;
