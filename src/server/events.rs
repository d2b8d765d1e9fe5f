// src/server/events.rs

//! `GET /events`: server-sent event stream of reload signals.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::State;
use axum::response::sse::{Event, Sse};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::{Stream, StreamExt};
use tracing::debug;

use crate::server::AppState;
use crate::stream::{relay, StreamFrame};

/// Frames buffered between the relay task and the HTTP body.
const FRAME_BUFFER: usize = 4;

impl From<StreamFrame> for Event {
    fn from(frame: StreamFrame) -> Self {
        match frame {
            StreamFrame::Message(payload) => Event::default().data(&*payload),
            StreamFrame::Heartbeat => Event::default().comment("ping"),
        }
    }
}

/// Register a subscriber and stream its frames until the client hangs up.
///
/// `Sse` sets `Content-Type: text/event-stream` and `Cache-Control: no-cache`.
/// When the client disconnects the body (and with it the receiver) is
/// dropped, which the relay observes and answers by unregistering.
pub async fn stream_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let subscription = state.hub.register();
    debug!(subscriber = %subscription.id(), "event stream opened");

    let (tx, rx) = mpsc::channel(FRAME_BUFFER);
    tokio::spawn(relay(
        Arc::clone(&state.hub),
        subscription,
        tx,
        state.heartbeat,
    ));

    Sse::new(ReceiverStream::new(rx).map(|frame| Ok(Event::from(frame))))
}
