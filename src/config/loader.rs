// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::cli::CliArgs;
use crate::config::model::{RawConfigFile, ViewerConfig};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ViewerConfig> {
    let raw_config = load_from_path(&path)?;
    ViewerConfig::try_from(raw_config)
}

/// Build the effective settings for a CLI invocation.
///
/// - Starts from `--config` if given, otherwise from built-in defaults.
/// - Overlays the flags that were actually passed.
/// - Validates the merged result.
pub fn resolve_config(args: &CliArgs) -> Result<ViewerConfig> {
    let mut raw = match args.config {
        Some(ref path) => load_from_path(path)?,
        None => RawConfigFile::default(),
    };

    apply_cli_overrides(&mut raw, args);
    ViewerConfig::try_from(raw)
}

fn apply_cli_overrides(raw: &mut RawConfigFile, args: &CliArgs) {
    if let Some(ref addr) = args.addr {
        raw.server.addr = addr.clone();
    }
    if let Some(ref path) = args.path {
        raw.server.path = path.clone();
    }
    if args.cors {
        raw.server.cors = true;
    }
}
