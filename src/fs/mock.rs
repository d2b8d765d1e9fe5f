// src/fs/mock.rs

use super::{FileSnapshot, FileSystem};
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime};

/// In-memory filesystem for exercising HTTP handlers without touching disk.
///
/// Clones share state, so a test can keep one handle and mutate files after
/// handing another to the server.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, FileSnapshot>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a file. Its mtime is fixed at the Unix epoch plus
    /// `epoch_secs` so header values are predictable.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>, epoch_secs: u64) {
        let snapshot = FileSnapshot {
            contents: content.into(),
            modified: Some(SystemTime::UNIX_EPOCH + Duration::from_secs(epoch_secs)),
        };
        self.files().insert(path.as_ref().to_path_buf(), snapshot);
    }

    pub fn remove_file(&self, path: impl AsRef<Path>) {
        self.files().remove(path.as_ref());
    }

    fn files(&self) -> MutexGuard<'_, HashMap<PathBuf, FileSnapshot>> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FileSystem for MockFileSystem {
    fn snapshot(&self, path: &Path) -> Result<FileSnapshot> {
        self.files()
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("File not found: {:?}", path))
    }
}
