//! Runtime for a single chat widget instance
//!
//! Owns the widget state, executes effects and publishes view updates.

mod executor;

#[cfg(test)]
pub mod testing;

pub use executor::WidgetRuntime;

use crate::client::ReplyClient;
use crate::widget::{Event, WidgetState};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};

/// Updates published to whatever renders the widget
///
/// `inputs` counts the non-reply events the runtime has handled so far, so a
/// view that predicts state locally can tell which of its inputs a snapshot
/// already reflects.
#[derive(Debug, Clone)]
pub enum ViewEvent {
    /// State after an accepted event
    Snapshot { state: WidgetState, inputs: u64 },
    /// The most recently appended message should be brought into view
    ScrollToLatest,
    /// An event was rejected; the state is unchanged
    Rejected { reason: String, inputs: u64 },
}

/// Handle to interact with a running widget
#[derive(Clone)]
pub struct WidgetHandle {
    event_tx: mpsc::Sender<Event>,
    broadcast_tx: broadcast::Sender<ViewEvent>,
}

impl WidgetHandle {
    /// Queue an event for the runtime
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.event_tx
            .send(event)
            .await
            .map_err(|_| "Widget runtime has stopped".to_string())
    }

    /// Queue an event from synchronous code (never call inside an async task)
    pub fn blocking_send(&self, event: Event) -> Result<(), String> {
        self.event_tx
            .blocking_send(event)
            .map_err(|_| "Widget runtime has stopped".to_string())
    }

    pub async fn open(&self) -> Result<(), String> {
        self.send(Event::Open).await
    }

    pub async fn close(&self) -> Result<(), String> {
        self.send(Event::Close).await
    }

    pub async fn toggle_minimize(&self) -> Result<(), String> {
        self.send(Event::ToggleMinimize).await
    }

    pub async fn submit(&self, text: impl Into<String>) -> Result<(), String> {
        self.send(Event::submit(text)).await
    }

    /// Subscribe to view updates published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<ViewEvent> {
        self.broadcast_tx.subscribe()
    }
}

/// Start a runtime for `state` on the current tokio runtime.
///
/// The runtime stops, cancelling any outstanding request, once every handle
/// has been dropped.
pub fn spawn_widget<C>(state: WidgetState, client: C, reply_timeout: Duration) -> WidgetHandle
where
    C: ReplyClient + 'static,
{
    let (event_tx, event_rx) = mpsc::channel(32);
    let (broadcast_tx, _) = broadcast::channel(128);

    let runtime = WidgetRuntime::new(
        state,
        client,
        reply_timeout,
        event_rx,
        event_tx.downgrade(),
        broadcast_tx.clone(),
    );
    tokio::spawn(runtime.run());

    WidgetHandle {
        event_tx,
        broadcast_tx,
    }
}
