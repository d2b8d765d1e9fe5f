#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tempfile::TempDir;

/// A config file living in its own temporary directory.
///
/// The directory is removed when the fixture is dropped.
pub struct TrackedFile {
    dir: TempDir,
    path: PathBuf,
}

impl TrackedFile {
    /// Create `<tmpdir>/<name>` with `contents`.
    pub fn new(name: &str, contents: &str) -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(name);
        fs::write(&path, contents)?;
        Ok(Self { dir, path })
    }

    /// Reserve `<tmpdir>/<name>` without creating the file.
    pub fn missing(name: &str) -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(name);
        Ok(Self { dir, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Overwrite the file in place.
    pub fn write(&self, contents: &str) -> Result<()> {
        fs::write(&self.path, contents)?;
        Ok(())
    }

    /// Editor-style save: write a sibling temp file, then rename it over.
    pub fn replace_atomically(&self, contents: &str) -> Result<()> {
        let tmp = self.dir.path().join(".tracked.tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Write an unrelated file next to the tracked one.
    pub fn write_sibling(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.dir.path().join(name);
        fs::write(&path, contents)?;
        Ok(path)
    }
}
