// src/logging.rs

//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining this crate's log level:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `NGINX_VIEWER_LOG` environment variable (e.g. "info", "debug")
//! 3. default to `info`
//!
//! Dependencies (axum, hyper, notify) are held at `warn` regardless.
//! Logs go to STDERR; `--dry-run` output stays alone on stdout.

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

/// Environment variable consulted when no `--log-level` is given.
pub const LOG_ENV_VAR: &str = "NGINX_VIEWER_LOG";

const CRATE_TARGET: &str = env!("CARGO_CRATE_NAME");

/// Install the global subscriber. Fails if one is already set.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let level = cli_level
        .map(LogLevel::as_directive)
        .or_else(|| {
            std::env::var(LOG_ENV_VAR)
                .ok()
                .and_then(|s| parse_level_str(&s))
        })
        .unwrap_or("info");

    fmt()
        .with_env_filter(filter_for(level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("cannot install log subscriber: {err}"))
}

impl LogLevel {
    fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

fn filter_for(level: &str) -> EnvFilter {
    EnvFilter::new(format!("warn,{CRATE_TARGET}={level}"))
}

fn parse_level_str(s: &str) -> Option<&'static str> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some("error"),
        "warn" | "warning" => Some("warn"),
        "info" => Some("info"),
        "debug" => Some("debug"),
        "trace" => Some("trace"),
        _ => None,
    }
}
