// src/config/validate.rs

use std::path::PathBuf;
use std::time::Duration;

use crate::cli::CliArgs;
use crate::config::model::{Debounce, Settings};
use crate::errors::{DevloopError, Result};
use crate::exec::CommandSpec;

impl TryFrom<&CliArgs> for Settings {
    type Error = DevloopError;

    fn try_from(args: &CliArgs) -> std::result::Result<Self, Self::Error> {
        let command = command_from_args(&args.command)?;
        let debounce = debounce_from_args(args.debounce_count, args.debounce_ms)?;

        Ok(Settings {
            chdir: args.chdir.clone(),
            root: PathBuf::from("."),
            command,
            debounce,
            grace_period: Duration::from_millis(args.grace_ms),
        })
    }
}

impl Settings {
    /// Validate parsed CLI arguments.
    pub fn from_cli(args: &CliArgs) -> Result<Self> {
        Settings::try_from(args)
    }
}

fn command_from_args(words: &[String]) -> Result<CommandSpec> {
    match words.split_first() {
        Some((program, rest)) if !program.trim().is_empty() => {
            Ok(CommandSpec::new(program.clone(), rest.to_vec()))
        }
        _ => Err(DevloopError::ConfigError(
            "a command to run is required".to_string(),
        )),
    }
}

fn debounce_from_args(count: usize, interval_ms: u64) -> Result<Debounce> {
    if interval_ms == 0 {
        return Err(DevloopError::ConfigError(
            "--debounce-ms must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(Debounce {
        count,
        interval: Duration::from_millis(interval_ms),
    })
}
