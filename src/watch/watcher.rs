// src/watch/watcher.rs

use std::sync::Arc;
use std::time::Duration;

use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::errors::Result;
use crate::hub::Hub;
use crate::watch::detector::{ChangeDetector, WatchMessage};
use crate::watch::event::TrackedPath;

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive for
/// as long as needed. Dropping this handle will stop file watching; the
/// detector task then sends any pending reload and exits.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Watch the directory containing `tracked` and spawn the change detector
/// that broadcasts debounced reloads through `hub`.
///
/// - The directory watch is mandatory; failing to add it is an error.
/// - A direct watch on the file is attempted as well. If the file does not
///   exist yet that is fine: its creation shows up through the directory.
///
/// Must be called from within a Tokio runtime.
pub fn spawn_watcher(
    tracked: TrackedPath,
    debounce: Duration,
    hub: Arc<Hub>,
) -> Result<WatcherHandle> {
    // Channel from the blocking notify callback into the async world.
    let (event_tx, event_rx) = mpsc::unbounded_channel::<WatchMessage>();

    // Closure called synchronously by notify whenever an event arrives.
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<notify::Event>| {
            let msg = match res {
                Ok(event) => WatchMessage::Event(event),
                Err(err) => WatchMessage::Error(err),
            };
            if let Err(err) = event_tx.send(msg) {
                // Detector is gone; we can't do anything useful with the event.
                eprintln!("nginx-config-viewer: failed to forward notify event: {err}");
            }
        },
        Config::default(),
    )?;

    watcher.watch(tracked.dir(), RecursiveMode::NonRecursive)?;

    if let Err(err) = watcher.watch(tracked.path(), RecursiveMode::NonRecursive) {
        debug!(
            path = %tracked.path().display(),
            error = %err,
            "no direct watch on tracked file; relying on directory watch"
        );
    }

    info!(
        dir = %tracked.dir().display(),
        file = %tracked.path().display(),
        ?debounce,
        "file watcher started"
    );

    let detector = ChangeDetector::new(tracked, debounce, hub);
    tokio::spawn(detector.run(event_rx));

    Ok(WatcherHandle { _inner: watcher })
}
