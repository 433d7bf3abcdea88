// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod gitignore;
pub mod logging;
pub mod types;
pub mod watch;

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use crate::cli::CliArgs;
use crate::config::Settings;
use crate::engine::Orchestrator;
use crate::errors::Result;
use crate::exec::{platform_terminator, ProcessSupervisor};
use crate::fs::{FileSystem, RealFileSystem};
use crate::gitignore::GitIgnore;
use crate::watch::{DirWatcher, NotifyWatcher};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - settings validation and the optional `--chdir`
/// - the git ignore filter (fails fast if git is missing)
/// - the process supervisor and the initial start of the command
/// - the recursive directory watcher driving the orchestrator
/// - Ctrl-C handling, which stops the command before returning
pub async fn run(args: CliArgs) -> Result<()> {
    let settings = Settings::from_cli(&args)?;

    if let Some(dir) = &settings.chdir {
        std::env::set_current_dir(dir)
            .with_context(|| format!("changing directory to {}", dir.display()))?;
    }

    // Canonicalize once so event paths and git agree on a base.
    let root = settings
        .root
        .canonicalize()
        .with_context(|| format!("resolving {}", settings.root.display()))?;

    let filter = GitIgnore::probe(&root)?;
    let supervisor = ProcessSupervisor::new(platform_terminator(settings.grace_period));
    let mut orchestrator = Orchestrator::new(filter, supervisor, settings.command.clone());

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let mut dir_watcher =
        DirWatcher::new(NotifyWatcher::new()?, fs).with_debounce(settings.debounce);

    orchestrator.start()?;

    let outcome = tokio::select! {
        res = dir_watcher.watch(&root, &mut orchestrator) => res,
        _ = interrupted() => {
            info!("interrupt received; shutting down");
            Ok(())
        }
    };

    // Stop the command whatever ended the loop, but report the loop's error
    // first.
    let stopped = orchestrator.shutdown().await;
    dir_watcher.stop();
    outcome?;
    stopped
}

/// Resolves on Ctrl-C. Never resolves if the signal handler can't be
/// installed.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}
