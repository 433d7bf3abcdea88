// src/logging.rs

//! Diagnostics for `devloop`, via `tracing` + `tracing-subscriber`.
//!
//! Nothing is installed unless `--log` is given, so by default every
//! `tracing` event is discarded. Once enabled, the level comes from
//! `--log-level`, then `DEVLOOP_LOG`, then `debug`.
//!
//! Output goes to stderr; stdout belongs to the supervised command.

use anyhow::{anyhow, Result};
use tracing::Level;

use crate::cli::LogLevel;

/// Environment variable consulted when `--log-level` is absent.
pub const LOG_ENV: &str = "DEVLOOP_LOG";

/// Install the global subscriber when `enabled`.
///
/// Call once at startup.
pub fn init_logging(enabled: bool, cli_level: Option<LogLevel>) -> Result<()> {
    if !enabled {
        return Ok(());
    }

    let env_level = std::env::var(LOG_ENV).ok();
    let level = resolve_level(cli_level, env_level.as_deref());

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("installing log subscriber: {e}"))
}

/// Pick the effective level. An unparsable env value is ignored.
pub fn resolve_level(cli_level: Option<LogLevel>, env_level: Option<&str>) -> Level {
    cli_level
        .map(Level::from)
        .or_else(|| env_level.and_then(parse_level_str))
        .unwrap_or(Level::DEBUG)
}

/// Parse a level name such as `info` or `WARN`. `warning` is accepted too.
pub fn parse_level_str(s: &str) -> Option<Level> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("warning") {
        return Some(Level::WARN);
    }
    s.parse().ok()
}
