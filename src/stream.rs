// src/stream.rs

//! Per-connection relay between a hub subscription and one client.
//!
//! The relay knows nothing about HTTP. It pushes [`StreamFrame`]s into an
//! outbound channel; the server encodes them as server-sent events and
//! closes the channel's receiving side when the client goes away.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

use crate::config::MAX_INTERVAL;
use crate::hub::{Hub, Signal, Subscription};

/// First message every client receives.
pub const GREETING: &str = "hello";

/// One unit of output towards a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamFrame {
    /// Payload relayed verbatim (`data: ...`).
    Message(Signal),
    /// Content-free keep-alive (`: ping`).
    Heartbeat,
}

impl StreamFrame {
    pub fn greeting() -> Self {
        StreamFrame::Message(Signal::from(GREETING))
    }
}

/// Relay signals from `subscription` into `out` until the client is gone.
///
/// Waits on three sources at once:
/// - `out` closing (client disconnected),
/// - a signal arriving in the inbox,
/// - the heartbeat ticker, first firing one `heartbeat` after the greeting.
///   The period is capped at [`MAX_INTERVAL`].
///
/// The subscription is always unregistered before returning.
pub async fn relay(
    hub: Arc<Hub>,
    mut subscription: Subscription,
    out: mpsc::Sender<StreamFrame>,
    heartbeat: Duration,
) {
    let id = subscription.id();
    let heartbeat = heartbeat.min(MAX_INTERVAL);

    if out.send(StreamFrame::greeting()).await.is_ok() {
        let mut ticker = time::interval_at(Instant::now() + heartbeat, heartbeat);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                () = out.closed() => {
                    debug!(subscriber = %id, "client disconnected");
                    break;
                }
                msg = subscription.recv() => {
                    let Some(signal) = msg else {
                        debug!(subscriber = %id, "inbox closed by hub");
                        break;
                    };
                    if out.send(StreamFrame::Message(signal)).await.is_err() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    if out.send(StreamFrame::Heartbeat).await.is_err() {
                        break;
                    }
                }
            }
        }
    }

    hub.unregister(id);
}
