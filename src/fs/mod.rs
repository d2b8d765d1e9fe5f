// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::path::Path;
use std::time::SystemTime;

use anyhow::{Context, Result};

pub mod mock;

/// Point-in-time view of a file, as served on `/raw`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSnapshot {
    pub contents: Vec<u8>,
    /// `None` when the platform or backend cannot report it.
    pub modified: Option<SystemTime>,
}

/// Abstract filesystem interface.
pub trait FileSystem: Send + Sync + Debug {
    /// Read the whole file together with its modification time.
    fn snapshot(&self, path: &Path) -> Result<FileSnapshot>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn snapshot(&self, path: &Path) -> Result<FileSnapshot> {
        let contents = fs::read(path).with_context(|| format!("reading file {:?}", path))?;
        let modified = fs::metadata(path).and_then(|m| m.modified()).ok();
        Ok(FileSnapshot { contents, modified })
    }
}
