// src/watch/detector.rs

//! Turns the raw event feed of the watched directory into debounced reload
//! broadcasts.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::hub::{Hub, RELOAD};
use crate::watch::debounce::Debouncer;
use crate::watch::event::TrackedPath;

/// Item forwarded from the `notify` callback into the async world.
#[derive(Debug)]
pub enum WatchMessage {
    Event(notify::Event),
    Error(notify::Error),
}

/// Event loop owning the debounce timer.
#[derive(Debug)]
pub struct ChangeDetector {
    tracked: TrackedPath,
    debouncer: Debouncer,
    hub: Arc<Hub>,
}

impl ChangeDetector {
    pub fn new(tracked: TrackedPath, quiet: Duration, hub: Arc<Hub>) -> Self {
        Self {
            tracked,
            debouncer: Debouncer::new(quiet),
            hub,
        }
    }

    /// Consume `messages` until the sender side goes away.
    ///
    /// Watch errors are logged and otherwise ignored. A reload that is
    /// already scheduled when the feed closes is still sent.
    pub async fn run(mut self, mut messages: mpsc::UnboundedReceiver<WatchMessage>) {
        loop {
            tokio::select! {
                msg = messages.recv() => match msg {
                    Some(WatchMessage::Event(event)) => self.handle_event(&event),
                    Some(WatchMessage::Error(err)) => {
                        warn!(error = %err, "file watch error; continuing");
                    }
                    None => break,
                },
                () = self.debouncer.expired() => self.emit(),
            }
        }

        if self.debouncer.is_pending() {
            self.debouncer.expired().await;
            self.emit();
        }
        debug!("change detector finished (event feed closed)");
    }

    fn handle_event(&mut self, event: &notify::Event) {
        if !self.tracked.matches(event) {
            return;
        }
        debug!(kind = ?event.kind, paths = ?event.paths, "relevant event; (re)arming debounce");
        self.debouncer.touch();
    }

    fn emit(&self) {
        let delivered = self.hub.broadcast(RELOAD);
        info!(
            path = %self.tracked.path().display(),
            delivered,
            "tracked file changed; reload broadcast"
        );
    }
}
