// src/config/mod.rs

//! Configuration loading and validation.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk and merge CLI flags (`loader.rs`).
//! - Validate and normalize into [`ViewerConfig`] (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, resolve_config};
pub use model::{
    MAX_INTERVAL, RawConfigFile, ServerSection, StreamSection, ViewerConfig, WatchSection,
};
pub use validate::{normalize_addr, parse_duration};
