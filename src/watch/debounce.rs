// src/watch/debounce.rs

use std::time::Duration;

use tokio::time::{self, Instant};

use crate::config::MAX_INTERVAL;

/// Single-slot trailing-edge debounce timer.
///
/// Each [`touch`](Debouncer::touch) replaces the pending deadline, so only
/// the last event of a burst leads to [`expired`](Debouncer::expired)
/// resolving. Runs on the tokio clock, which tests can pause and advance.
/// The quiet window is capped at [`MAX_INTERVAL`].
#[derive(Debug)]
pub struct Debouncer {
    quiet: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet: quiet.min(MAX_INTERVAL),
            deadline: None,
        }
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    /// Cancel any pending deadline and schedule a new one `quiet` from now.
    pub fn touch(&mut self) {
        self.deadline = Some(Instant::now() + self.quiet);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Resolve once the pending deadline passes, leaving the timer idle.
    /// Never resolves while idle.
    ///
    /// Cancel safe: dropping the future keeps the deadline as it was.
    pub async fn expired(&mut self) {
        match self.deadline {
            Some(deadline) => {
                time::sleep_until(deadline).await;
                self.deadline = None;
            }
            None => std::future::pending::<()>().await,
        }
    }
}
