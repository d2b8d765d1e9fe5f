// src/hub.rs

//! Best-effort fan-out of change signals to connected clients.
//!
//! Every subscriber owns a small bounded inbox. `broadcast` only ever uses
//! `try_send`, so a stalled client loses signals instead of stalling the
//! watcher or the other clients. Nothing is replayed: a subscriber that
//! registers after a broadcast never sees it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::{TryRecvError, TrySendError};
use tracing::{debug, trace, warn};

/// Inbox size used when none is configured.
pub const DEFAULT_INBOX_CAPACITY: usize = 8;

/// Payload pushed to every client when the tracked file changed.
pub const RELOAD: &str = "reload";

/// Opaque payload carried through the hub.
pub type Signal = Arc<str>;

/// Identity of one registered subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Receiving half handed out by [`Hub::register`].
#[derive(Debug)]
pub struct Subscription {
    id: SubscriberId,
    inbox: mpsc::Receiver<Signal>,
}

impl Subscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Wait for the next signal. `None` once the hub unregistered us and the
    /// inbox has drained.
    pub async fn recv(&mut self) -> Option<Signal> {
        self.inbox.recv().await
    }

    pub fn try_recv(&mut self) -> Result<Signal, TryRecvError> {
        self.inbox.try_recv()
    }
}

/// Registry of live subscribers.
///
/// The lock is only held while the map is touched; delivery inside
/// `broadcast` is `try_send`, which never waits.
#[derive(Debug)]
pub struct Hub {
    inbox_capacity: usize,
    next_id: AtomicU64,
    subscribers: Mutex<HashMap<SubscriberId, mpsc::Sender<Signal>>>,
}

impl Default for Hub {
    fn default() -> Self {
        Self::new()
    }
}

impl Hub {
    pub fn new() -> Self {
        Self::with_inbox_capacity(DEFAULT_INBOX_CAPACITY)
    }

    /// A capacity of zero is bumped to one; tokio channels need room for at
    /// least a single message.
    pub fn with_inbox_capacity(inbox_capacity: usize) -> Self {
        Self {
            inbox_capacity: inbox_capacity.max(1),
            next_id: AtomicU64::new(1),
            subscribers: Mutex::new(HashMap::new()),
        }
    }

    pub fn inbox_capacity(&self) -> usize {
        self.inbox_capacity
    }

    /// Add a new subscriber and return its inbox.
    pub fn register(&self) -> Subscription {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, inbox) = mpsc::channel(self.inbox_capacity);

        let count = {
            let mut subscribers = self.lock();
            subscribers.insert(id, tx);
            subscribers.len()
        };
        debug!(subscriber = %id, subscribers = count, "subscriber registered");

        Subscription { id, inbox }
    }

    /// Remove a subscriber and close its inbox.
    ///
    /// Returns `false` if it was already gone, so calling this twice is
    /// harmless.
    pub fn unregister(&self, id: SubscriberId) -> bool {
        // Dropping the sender closes the inbox once it drains.
        let (removed, count) = {
            let mut subscribers = self.lock();
            let removed = subscribers.remove(&id);
            (removed, subscribers.len())
        };

        match removed {
            Some(_) => {
                debug!(subscriber = %id, subscribers = count, "subscriber unregistered");
                true
            }
            None => {
                trace!(subscriber = %id, "unregister for unknown subscriber ignored");
                false
            }
        }
    }

    /// Offer `signal` to every registered subscriber without waiting.
    ///
    /// Returns how many inboxes accepted it; full inboxes are skipped.
    pub fn broadcast(&self, signal: impl Into<Signal>) -> usize {
        let signal = signal.into();
        let subscribers = self.lock();

        let mut delivered = 0;
        for (id, tx) in subscribers.iter() {
            match tx.try_send(Arc::clone(&signal)) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    debug!(subscriber = %id, "inbox full; dropping signal");
                }
                Err(TrySendError::Closed(_)) => {
                    trace!(subscriber = %id, "inbox closed before unregister");
                }
            }
        }
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SubscriberId, mpsc::Sender<Signal>>> {
        self.subscribers.lock().unwrap_or_else(|poisoned: PoisonError<_>| {
            warn!("subscriber registry mutex poisoned; continuing with inner state");
            poisoned.into_inner()
        })
    }
}
