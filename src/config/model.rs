// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::hub::DEFAULT_INBOX_CAPACITY;

pub const DEFAULT_ADDR: &str = ":8080";
pub const DEFAULT_PATH: &str = "/etc/nginx/nginx.conf";
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);
pub const DEFAULT_HEARTBEAT: Duration = Duration::from_secs(30);

/// Upper bound for `debounce` and `heartbeat`. Timers are clamped to it too.
pub const MAX_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [server]
/// addr = ":8080"
/// path = "/etc/nginx/nginx.conf"
/// cors = false
///
/// [watch]
/// debounce = "200ms"
///
/// [stream]
/// heartbeat = "30s"
/// inbox_capacity = 8
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub stream: StreamSection,
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    /// Listen address. A bare `:port` listens on all interfaces.
    #[serde(default = "default_addr")]
    pub addr: String,

    /// The file that is served on `/raw` and watched for changes.
    #[serde(default = "default_path")]
    pub path: String,

    /// Adds `Access-Control-Allow-Origin: *` to `/raw` responses.
    #[serde(default)]
    pub cors: bool,
}

fn default_addr() -> String {
    DEFAULT_ADDR.to_string()
}

fn default_path() -> String {
    DEFAULT_PATH.to_string()
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            path: default_path(),
            cors: false,
        }
    }
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Quiet window after the last relevant event before a reload is sent.
    #[serde(default = "default_debounce")]
    pub debounce: String,
}

fn default_debounce() -> String {
    "200ms".to_string()
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            debounce: default_debounce(),
        }
    }
}

/// `[stream]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamSection {
    /// Interval between `: ping` comments on idle event streams.
    #[serde(default = "default_heartbeat")]
    pub heartbeat: String,

    /// Per-client buffer of undelivered reload signals.
    #[serde(default = "default_inbox_capacity")]
    pub inbox_capacity: usize,
}

fn default_heartbeat() -> String {
    "30s".to_string()
}

fn default_inbox_capacity() -> usize {
    DEFAULT_INBOX_CAPACITY
}

impl Default for StreamSection {
    fn default() -> Self {
        Self {
            heartbeat: default_heartbeat(),
            inbox_capacity: default_inbox_capacity(),
        }
    }
}

/// Validated settings the rest of the application runs on.
///
/// Only obtainable through `TryFrom<RawConfigFile>` (or `Default`), so
/// durations are parsed and the address is normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerConfig {
    /// Bindable listen address (`:port` already expanded).
    pub addr: String,
    /// Tracked file as configured; made absolute at startup.
    pub path: PathBuf,
    pub cors: bool,
    pub debounce: Duration,
    pub heartbeat: Duration,
    pub inbox_capacity: usize,
}

impl ViewerConfig {
    pub(crate) fn new_unchecked(
        addr: String,
        path: PathBuf,
        cors: bool,
        debounce: Duration,
        heartbeat: Duration,
        inbox_capacity: usize,
    ) -> Self {
        Self {
            addr,
            path,
            cors,
            debounce,
            heartbeat,
            inbox_capacity,
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self::new_unchecked(
            super::validate::normalize_addr(DEFAULT_ADDR),
            PathBuf::from(DEFAULT_PATH),
            false,
            DEFAULT_DEBOUNCE,
            DEFAULT_HEARTBEAT,
            DEFAULT_INBOX_CAPACITY,
        )
    }
}
