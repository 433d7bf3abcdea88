// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

/// Command-line arguments for `devloop`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "devloop",
    version,
    disable_version_flag = true,
    about = "Restart a command whenever files in the current directory change.",
    long_about = "Watches the current directory tree and restarts <CMD> whenever a \
                  file that git does not ignore is created, written, removed or renamed."
)]
pub struct CliArgs {
    /// Change to this directory before watching and starting the command.
    #[arg(short = 'C', long, value_name = "DIR")]
    pub chdir: Option<PathBuf>,

    /// Enable diagnostic logging to stderr.
    #[arg(short = 'L', long)]
    pub log: bool,

    /// Logging level used with `--log` (error, warn, info, debug, trace).
    ///
    /// If omitted, `DEVLOOP_LOG` or `debug` is used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Maximum number of extra events folded into one restart.
    #[arg(long, value_name = "N", default_value_t = 15)]
    pub debounce_count: usize,

    /// Quiet period (milliseconds) that closes a burst of events.
    #[arg(long, value_name = "MS", default_value_t = 1000)]
    pub debounce_ms: u64,

    /// Time (milliseconds) the command gets to exit after an interrupt
    /// before it is killed.
    #[arg(long, value_name = "MS", default_value_t = 200)]
    pub grace_ms: u64,

    /// Print version.
    #[arg(short = 'v', long, action = ArgAction::Version)]
    pub version: Option<bool>,

    /// Command to run, followed by its arguments.
    #[arg(
        value_name = "CMD",
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Parse process arguments.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
