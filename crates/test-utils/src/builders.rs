#![allow(dead_code)]

use nginx_config_viewer::config::{RawConfigFile, ViewerConfig};

/// Builder for `ViewerConfig` to simplify test setup.
///
/// Goes through the same `TryFrom<RawConfigFile>` validation as a config
/// file, so invalid combinations fail the same way.
pub struct ConfigBuilder {
    config: RawConfigFile,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn addr(mut self, addr: &str) -> Self {
        self.config.server.addr = addr.to_string();
        self
    }

    pub fn path(mut self, path: &str) -> Self {
        self.config.server.path = path.to_string();
        self
    }

    pub fn cors(mut self, cors: bool) -> Self {
        self.config.server.cors = cors;
        self
    }

    pub fn debounce(mut self, debounce: &str) -> Self {
        self.config.watch.debounce = debounce.to_string();
        self
    }

    pub fn heartbeat(mut self, heartbeat: &str) -> Self {
        self.config.stream.heartbeat = heartbeat.to_string();
        self
    }

    pub fn inbox_capacity(mut self, capacity: usize) -> Self {
        self.config.stream.inbox_capacity = capacity;
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ViewerConfig {
        ViewerConfig::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
