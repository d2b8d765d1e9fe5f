// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Deciding which raw filesystem events concern the tracked file.
//! - Debouncing bursts of such events into a single reload.
//! - Wiring up a cross-platform directory watcher (`notify`).
//!
//! It does **not** know about HTTP; it only talks to the [`crate::hub::Hub`].

pub mod debounce;
pub mod detector;
pub mod event;
pub mod watcher;

pub use debounce::Debouncer;
pub use detector::{ChangeDetector, WatchMessage};
pub use event::{fs_events, FsEvent, FsEventKind, TrackedPath};
pub use watcher::{spawn_watcher, WatcherHandle};
