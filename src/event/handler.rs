//! Terminal event reader.

use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use crossterm::event::EventStream;
use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::IntervalStream;
use tokio_util::sync::CancellationToken;

use super::Event;

/// Stream of application events.
///
/// A local task reads crossterm's [`EventStream`] and a tick interval and
/// forwards both over a channel. The task stops when the handler is dropped.
pub struct EventHandler {
    event_rx: mpsc::UnboundedReceiver<Event>,
    shutdown: CancellationToken,
}

impl EventHandler {
    /// Starts reading terminal events. Must be called inside a `LocalSet`.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();

        tokio::task::spawn_local(async move {
            let mut reader = EventStream::new();
            let mut ticks = IntervalStream::new(tokio::time::interval(tick_rate));

            loop {
                let event = tokio::select! {
                    _ = token.cancelled() => break,
                    Some(_) = ticks.next() => Event::Tick,
                    maybe = reader.next() => match maybe {
                        Some(Ok(raw)) => match Event::from_terminal(raw) {
                            Some(event) => event,
                            None => continue,
                        },
                        Some(Err(err)) => {
                            tracing::warn!(%err, "failed to read terminal event");
                            continue;
                        }
                        None => break,
                    },
                };

                if tx.send(event).is_err() {
                    break;
                }
            }
            tracing::debug!("event reader stopped");
        });

        Self {
            event_rx: rx,
            shutdown,
        }
    }

    fn poll_event(&mut self, cx: &mut Context<'_>) -> Poll<Option<Event>> {
        Pin::new(&mut self.event_rx).poll_recv(cx)
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

// Stream for EventHandler
impl Stream for EventHandler {
    type Item = Event;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.poll_event(cx)
    }
}
