//! Widget runtime executor

use super::ViewEvent;
use crate::client::{ClientErrorKind, ReplyClient};
use crate::widget::{transition, Effect, Event, TransitionError, WidgetState};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;

/// Generic widget runtime that can work with any reply client implementation
pub struct WidgetRuntime<C>
where
    C: ReplyClient + 'static,
{
    state: WidgetState,
    client: Arc<C>,
    /// Deadline for each request; expiry resolves to the failure path
    reply_timeout: Duration,
    event_rx: mpsc::Receiver<Event>,
    /// Weak so that dropping every handle stops the runtime
    event_tx: mpsc::WeakSender<Event>,
    broadcast_tx: broadcast::Sender<ViewEvent>,
    /// Token to cancel the outstanding request
    request_cancel_token: Option<CancellationToken>,
    /// Non-reply events handled, accepted or not
    inputs_processed: u64,
}

impl<C> WidgetRuntime<C>
where
    C: ReplyClient + 'static,
{
    pub fn new(
        state: WidgetState,
        client: C,
        reply_timeout: Duration,
        event_rx: mpsc::Receiver<Event>,
        event_tx: mpsc::WeakSender<Event>,
        broadcast_tx: broadcast::Sender<ViewEvent>,
    ) -> Self {
        Self {
            state,
            client: Arc::new(client),
            reply_timeout,
            event_rx,
            event_tx,
            broadcast_tx,
            request_cancel_token: None,
            inputs_processed: 0,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(
            messages = self.state.messages.len(),
            timeout_ms = %self.reply_timeout.as_millis(),
            "Starting widget runtime"
        );

        while let Some(event) = self.event_rx.recv().await {
            if let Err(e) = self.process_event(event) {
                tracing::debug!(error = %e, "Event rejected");
            }
        }

        if let Some(token) = self.request_cancel_token.take() {
            tracing::debug!("Cancelling outstanding request");
            token.cancel();
        }

        tracing::info!("Widget runtime stopped");
    }

    fn process_event(&mut self, event: Event) -> Result<(), TransitionError> {
        let is_reply = event.is_reply();
        if !is_reply {
            self.inputs_processed += 1;
        }

        let result = match transition(&self.state, event) {
            Ok(r) => r,
            Err(e) => {
                if is_reply {
                    tracing::warn!(error = %e, "Discarding reply with no matching request");
                } else {
                    // Rejections of user actions are shown to the user
                    let _ = self.broadcast_tx.send(ViewEvent::Rejected {
                        reason: e.to_string(),
                        inputs: self.inputs_processed,
                    });
                }
                return Err(e);
            }
        };

        self.state = result.new_state;
        if is_reply {
            self.request_cancel_token = None;
        }
        let _ = self.broadcast_tx.send(ViewEvent::Snapshot {
            state: self.state.clone(),
            inputs: self.inputs_processed,
        });

        for effect in result.effects {
            self.execute_effect(effect);
        }

        Ok(())
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::SendMessage { request_id, text } => self.spawn_request(request_id, text),
            Effect::ScrollToLatest => {
                let _ = self.broadcast_tx.send(ViewEvent::ScrollToLatest);
            }
        }
    }

    fn spawn_request(&mut self, request_id: u64, text: String) {
        let token = CancellationToken::new();
        if let Some(previous) = self.request_cancel_token.replace(token.clone()) {
            previous.cancel();
        }

        let client = self.client.clone();
        let reply_timeout = self.reply_timeout;
        let event_tx = self.event_tx.clone();

        tracing::info!(request_id, chars = text.chars().count(), "Sending message");

        tokio::spawn(async move {
            let start = std::time::Instant::now();
            let outcome = tokio::select! {
                () = token.cancelled() => {
                    tracing::debug!(request_id, "Request cancelled");
                    return;
                }
                outcome = tokio::time::timeout(reply_timeout, client.send(&text)) => outcome,
            };

            let event = match outcome {
                Ok(Ok(reply)) => {
                    tracing::info!(
                        request_id,
                        duration_ms = %start.elapsed().as_millis(),
                        "Reply received"
                    );
                    Event::ReplyReceived {
                        request_id,
                        text: reply,
                    }
                }
                Ok(Err(e)) => {
                    tracing::warn!(
                        request_id,
                        kind = e.kind.as_str(),
                        error = %e,
                        "Reply request failed"
                    );
                    Event::ReplyFailed {
                        request_id,
                        kind: e.kind,
                    }
                }
                Err(_) => {
                    tracing::warn!(
                        request_id,
                        timeout_ms = %reply_timeout.as_millis(),
                        "Reply deadline expired"
                    );
                    Event::ReplyFailed {
                        request_id,
                        kind: ClientErrorKind::Timeout,
                    }
                }
            };

            if let Some(tx) = event_tx.upgrade() {
                let _ = tx.send(event).await;
            }
        });
    }
}
