// src/watch/event.rs

//! Backend-neutral view of filesystem events and the relevance rule for the
//! tracked file.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use notify::EventKind;
use notify::event::ModifyKind;

use crate::errors::{Result, ViewerError};

/// What happened to a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsEventKind {
    Write,
    Create,
    Rename,
    Remove,
    /// Attribute-only change (permissions, timestamps, ...).
    Chmod,
}

impl FsEventKind {
    /// Map a `notify` kind onto ours.
    ///
    /// Access/open notifications are not changes and map to `None`. Serving
    /// `/raw` produces them on every read.
    pub fn from_notify(kind: &EventKind) -> Option<Self> {
        match kind {
            EventKind::Create(_) => Some(FsEventKind::Create),
            EventKind::Remove(_) => Some(FsEventKind::Remove),
            EventKind::Modify(ModifyKind::Name(_)) => Some(FsEventKind::Rename),
            EventKind::Modify(ModifyKind::Metadata(_)) => Some(FsEventKind::Chmod),
            EventKind::Modify(_) => Some(FsEventKind::Write),
            EventKind::Access(_) | EventKind::Any | EventKind::Other => None,
        }
    }

    fn touches_content(self) -> bool {
        !matches!(self, FsEventKind::Chmod)
    }
}

/// One path affected by one backend event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEvent {
    pub path: PathBuf,
    pub kind: FsEventKind,
}

impl FsEvent {
    pub fn new(path: impl Into<PathBuf>, kind: FsEventKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// Split a `notify` event into one [`FsEvent`] per path.
pub fn fs_events(event: &notify::Event) -> impl Iterator<Item = FsEvent> + '_ {
    let kind = FsEventKind::from_notify(&event.kind);
    event
        .paths
        .iter()
        .filter_map(move |path| kind.map(|kind| FsEvent::new(path.clone(), kind)))
}

/// The single file this process serves and watches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedPath {
    path: PathBuf,
}

impl TrackedPath {
    /// Make `path` absolute against the working directory.
    ///
    /// Symlinks are left alone and the file does not need to exist yet.
    pub fn resolve(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let absolute =
            std::path::absolute(path).map_err(|source| ViewerError::PathResolution {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self { path: absolute })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory to watch so renames onto the file are seen.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or(&self.path)
    }

    pub fn file_name(&self) -> Option<&OsStr> {
        self.path.file_name()
    }

    /// Does this event concern the tracked file?
    ///
    /// True when the exact path was written, created, renamed or removed,
    /// or when any event names an entry with the same base name (a temp file
    /// renamed over the target may only be reported that way). The base-name
    /// match is not canonicalized.
    pub fn is_event_for(&self, event: &FsEvent) -> bool {
        if event.path == self.path && event.kind.touches_content() {
            return true;
        }
        match (event.path.file_name(), self.file_name()) {
            (Some(name), Some(tracked)) => name == tracked,
            _ => false,
        }
    }

    /// True when any path of a backend event is relevant.
    pub fn matches(&self, event: &notify::Event) -> bool {
        fs_events(event).any(|ev| self.is_event_for(&ev))
    }
}
