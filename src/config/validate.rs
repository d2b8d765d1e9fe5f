// src/config/validate.rs

use std::path::PathBuf;
use std::time::Duration;

use crate::config::model::{MAX_INTERVAL, RawConfigFile, ViewerConfig};
use crate::errors::{Result, ViewerError};

impl TryFrom<RawConfigFile> for ViewerConfig {
    type Error = crate::errors::ViewerError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let addr = raw.server.addr.trim();
        if addr.is_empty() {
            return Err(ViewerError::ConfigError(
                "[server].addr must not be empty".to_string(),
            ));
        }

        if raw.server.path.trim().is_empty() {
            return Err(ViewerError::ConfigError(
                "[server].path must not be empty".to_string(),
            ));
        }

        let debounce = non_zero_duration("[watch].debounce", &raw.watch.debounce)?;
        let heartbeat = non_zero_duration("[stream].heartbeat", &raw.stream.heartbeat)?;

        if raw.stream.inbox_capacity == 0 {
            return Err(ViewerError::ConfigError(
                "[stream].inbox_capacity must be >= 1 (got 0)".to_string(),
            ));
        }

        Ok(ViewerConfig::new_unchecked(
            normalize_addr(addr),
            PathBuf::from(raw.server.path),
            raw.server.cors,
            debounce,
            heartbeat,
            raw.stream.inbox_capacity,
        ))
    }
}

fn non_zero_duration(key: &str, value: &str) -> Result<Duration> {
    let dur = parse_duration(value)
        .map_err(|e| ViewerError::ConfigError(format!("{key}: {e}")))?;
    if dur.is_zero() {
        return Err(ViewerError::ConfigError(format!(
            "{key} must be greater than zero (got \"{value}\")"
        )));
    }
    if dur > MAX_INTERVAL {
        return Err(ViewerError::ConfigError(format!(
            "{key} must be at most {}h (got \"{value}\")",
            MAX_INTERVAL.as_secs() / 3600
        )));
    }
    Ok(dur)
}

/// Expand a Go-style `:port` address to `0.0.0.0:port`.
///
/// Anything else (`127.0.0.1:80`, `localhost:8080`, `[::]:80`) is passed
/// through untouched for the listener to resolve.
pub fn normalize_addr(addr: &str) -> String {
    match addr.strip_prefix(':') {
        Some(port) => format!("0.0.0.0:{port}"),
        None => addr.to_string(),
    }
}

/// Parse a simple duration string like `"200ms"`, `"30s"`, `"1m"`, `"2h"`.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    let secs_per_unit = match unit.as_str() {
        "ms" => return Ok(Duration::from_millis(value)),
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        _ => {
            return Err(format!(
                "unsupported duration unit '{}'; expected ms, s, m, or h",
                unit
            ));
        }
    };

    value
        .checked_mul(secs_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("duration '{}' is too large", s))
}
