//! Mock implementations for testing
//!
//! These mocks enable runtime testing without real network I/O.

use crate::client::{ClientError, ReplyClient};
use crate::reply::reply;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

// ============================================================================
// Mock Reply Client
// ============================================================================

/// Mock reply client that returns queued outcomes, echoing when the queue is empty
pub struct MockReplyClient {
    outcomes: Mutex<VecDeque<Result<String, ClientError>>>,
    /// Record of all messages sent
    pub requests: Mutex<Vec<String>>,
}

impl MockReplyClient {
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful reply
    pub fn queue_reply(&self, text: impl Into<String>) {
        self.outcomes.lock().unwrap().push_back(Ok(text.into()));
    }

    /// Queue a failure
    pub fn queue_error(&self, error: ClientError) {
        self.outcomes.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded messages
    pub fn recorded_requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockReplyClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReplyClient for MockReplyClient {
    async fn send(&self, message: &str) -> Result<String, ClientError> {
        self.requests.lock().unwrap().push(message.to_string());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(reply(message)))
    }
}

// ============================================================================
// Gated Reply Client
// ============================================================================

/// Echo client that holds each reply until released
pub struct GatedReplyClient {
    gate: Notify,
    pub requests: Mutex<Vec<String>>,
}

impl GatedReplyClient {
    pub fn new() -> Self {
        Self {
            gate: Notify::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Let one waiting (or the next) request complete
    pub fn release(&self) {
        self.gate.notify_one();
    }

    pub fn recorded_requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReplyClient for GatedReplyClient {
    async fn send(&self, message: &str) -> Result<String, ClientError> {
        self.requests.lock().unwrap().push(message.to_string());
        self.gate.notified().await;
        Ok(reply(message))
    }
}

// ============================================================================
// Hanging Reply Client
// ============================================================================

/// Client whose requests never complete; records when a request starts and
/// when it is abandoned
pub struct HangingReplyClient {
    started: Arc<AtomicBool>,
    abandoned: Arc<AtomicBool>,
}

struct AbandonGuard(Arc<AtomicBool>);

impl Drop for AbandonGuard {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl HangingReplyClient {
    pub fn new() -> Self {
        Self {
            started: Arc::new(AtomicBool::new(false)),
            abandoned: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag set once a request future is first polled
    pub fn started_flag(&self) -> Arc<AtomicBool> {
        self.started.clone()
    }

    /// Flag set once an in-flight request future is dropped
    pub fn abandoned_flag(&self) -> Arc<AtomicBool> {
        self.abandoned.clone()
    }
}

#[async_trait]
impl ReplyClient for HangingReplyClient {
    async fn send(&self, _message: &str) -> Result<String, ClientError> {
        self.started.store(true, Ordering::SeqCst);
        let _guard = AbandonGuard(self.abandoned.clone());
        std::future::pending().await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientErrorKind;
    use crate::runtime::{spawn_widget, ViewEvent, WidgetHandle};
    use crate::widget::{
        Message, Sender, Visibility, WidgetState, DEFAULT_GREETING, FALLBACK_REPLY,
    };
    use std::time::Duration;
    use tokio::sync::broadcast;

    const WAIT: Duration = Duration::from_secs(2);

    fn widget<C: ReplyClient + 'static>(client: C) -> WidgetHandle {
        spawn_widget(WidgetState::default(), client, Duration::from_secs(5))
    }

    /// Wait for the first snapshot matching `pred`
    async fn wait_for(
        rx: &mut broadcast::Receiver<ViewEvent>,
        pred: impl Fn(&WidgetState) -> bool,
    ) -> WidgetState {
        tokio::time::timeout(WAIT, async {
            loop {
                match rx.recv().await {
                    Ok(ViewEvent::Snapshot { state, .. }) if pred(&state) => return state,
                    Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                    Err(broadcast::error::RecvError::Closed) => panic!("runtime stopped"),
                }
            }
        })
        .await
        .expect("timed out waiting for snapshot")
    }

    async fn wait_for_rejection(rx: &mut broadcast::Receiver<ViewEvent>) -> String {
        tokio::time::timeout(WAIT, async {
            loop {
                if let Ok(ViewEvent::Rejected { reason, .. }) = rx.recv().await {
                    return reason;
                }
            }
        })
        .await
        .expect("timed out waiting for rejection")
    }

    fn transcript(state: &WidgetState) -> Vec<(Sender, String)> {
        state
            .messages
            .iter()
            .map(|m| (m.sender, m.text.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_mock_reply_client() {
        let mock = MockReplyClient::new();
        mock.queue_reply("queued");
        mock.queue_error(ClientError::network("down"));

        assert_eq!(mock.send("a").await.unwrap(), "queued");
        assert_eq!(mock.send("b").await.unwrap_err().kind, ClientErrorKind::Network);
        // Falls back to the echo contract once the queue is drained
        assert_eq!(mock.send("c").await.unwrap(), "This is a response to: c");
        assert_eq!(mock.recorded_requests(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_submit_and_receive_reply() {
        let handle = widget(MockReplyClient::new());
        let mut rx = handle.subscribe();

        handle.open().await.unwrap();
        handle.submit("  hello  ").await.unwrap();

        let awaiting = wait_for(&mut rx, WidgetState::is_awaiting_reply).await;
        assert_eq!(awaiting.last_message(), Some(&Message::user("hello")));

        let done = wait_for(&mut rx, |s| !s.is_awaiting_reply() && s.messages.len() == 3).await;
        assert_eq!(
            done.last_message(),
            Some(&Message::bot("This is a response to: hello"))
        );
    }

    #[tokio::test]
    async fn test_service_unreachable_shows_fallback() {
        let mock = MockReplyClient::new();
        mock.queue_error(ClientError::network("connection refused"));
        let handle = widget(mock);
        let mut rx = handle.subscribe();

        handle.open().await.unwrap();
        handle.submit("What are your hours?").await.unwrap();

        let done = wait_for(&mut rx, |s| s.messages.len() == 3).await;
        assert_eq!(
            transcript(&done),
            vec![
                (Sender::Bot, DEFAULT_GREETING.to_string()),
                (Sender::User, "What are your hours?".to_string()),
                (Sender::Bot, FALLBACK_REPLY.to_string()),
            ]
        );
        assert!(!done.is_awaiting_reply());
    }

    #[tokio::test]
    async fn test_second_submit_rejected_while_awaiting() {
        let client = Arc::new(GatedReplyClient::new());
        let handle = widget(client.clone());
        let mut rx = handle.subscribe();

        handle.open().await.unwrap();
        handle.submit("first").await.unwrap();
        wait_for(&mut rx, WidgetState::is_awaiting_reply).await;

        handle.submit("second").await.unwrap();
        let reason = wait_for_rejection(&mut rx).await;
        assert!(reason.contains("waiting"), "unexpected reason: {reason}");

        client.release();
        let done = wait_for(&mut rx, |s| !s.is_awaiting_reply()).await;
        assert_eq!(done.messages.len(), 3);
        assert_eq!(client.recorded_requests(), vec!["first"]);
    }

    #[tokio::test]
    async fn test_blank_submit_sends_nothing() {
        let client = Arc::new(MockReplyClient::new());
        let handle = widget(client.clone());
        let mut rx = handle.subscribe();

        handle.open().await.unwrap();
        handle.submit("   ").await.unwrap();
        let reason = wait_for_rejection(&mut rx).await;
        assert!(reason.contains("empty"));

        // A later real message proves the blank one never reached the client
        handle.submit("real").await.unwrap();
        let done = wait_for(&mut rx, |s| s.messages.len() == 3).await;
        assert!(!done.is_awaiting_reply());
        assert_eq!(client.recorded_requests(), vec!["real"]);
    }

    #[tokio::test]
    async fn test_view_events_count_inputs() {
        let handle = widget(MockReplyClient::new());
        let mut rx = handle.subscribe();

        handle.open().await.unwrap();
        handle.submit("   ").await.unwrap();
        handle.submit("hello").await.unwrap();

        // Replies do not count as inputs
        let mut seen = Vec::new();
        tokio::time::timeout(WAIT, async {
            while seen.len() < 4 {
                match rx.recv().await.unwrap() {
                    ViewEvent::Snapshot { inputs, .. } => seen.push(("snapshot", inputs)),
                    ViewEvent::Rejected { inputs, .. } => seen.push(("rejected", inputs)),
                    ViewEvent::ScrollToLatest => {}
                }
            }
        })
        .await
        .expect("timed out waiting for view events");

        assert_eq!(
            seen,
            vec![("snapshot", 1), ("rejected", 2), ("snapshot", 3), ("snapshot", 3)]
        );
    }

    #[tokio::test]
    async fn test_reply_arrives_while_minimized() {
        let client = Arc::new(GatedReplyClient::new());
        let handle = widget(client.clone());
        let mut rx = handle.subscribe();

        handle.open().await.unwrap();
        handle.submit("hello").await.unwrap();
        handle.toggle_minimize().await.unwrap();
        wait_for(&mut rx, |s| s.is_minimized() && s.is_awaiting_reply()).await;

        client.release();
        let minimized = wait_for(&mut rx, |s| !s.is_awaiting_reply()).await;
        assert_eq!(minimized.visibility, Visibility::Minimized);
        assert_eq!(minimized.messages.len(), 3);

        handle.toggle_minimize().await.unwrap();
        let restored = wait_for(&mut rx, |s| s.visibility == Visibility::Open).await;
        assert_eq!(restored.messages, minimized.messages);
    }

    #[tokio::test]
    async fn test_close_and_reopen_preserves_conversation() {
        let handle = widget(MockReplyClient::new());
        let mut rx = handle.subscribe();

        handle.open().await.unwrap();
        handle.submit("hello").await.unwrap();
        let before = wait_for(&mut rx, |s| s.messages.len() == 3).await;

        handle.close().await.unwrap();
        wait_for(&mut rx, |s| !s.is_open()).await;
        handle.open().await.unwrap();
        let after = wait_for(&mut rx, WidgetState::is_open).await;

        assert_eq!(after.messages, before.messages);
    }

    #[tokio::test]
    async fn test_reply_scrolls_to_latest() {
        let handle = widget(MockReplyClient::new());
        let mut rx = handle.subscribe();

        handle.open().await.unwrap();
        handle.submit("hello").await.unwrap();
        wait_for(&mut rx, |s| s.messages.len() == 3).await;

        let next = tokio::time::timeout(WAIT, rx.recv()).await.unwrap().unwrap();
        assert!(matches!(next, ViewEvent::ScrollToLatest));
    }

    #[tokio::test]
    async fn test_hung_request_times_out_to_fallback() {
        let handle = spawn_widget(
            WidgetState::default(),
            HangingReplyClient::new(),
            Duration::from_millis(50),
        );
        let mut rx = handle.subscribe();

        handle.open().await.unwrap();
        handle.submit("anyone there?").await.unwrap();

        let done = wait_for(&mut rx, |s| s.messages.len() == 3).await;
        assert_eq!(done.last_message(), Some(&Message::bot(FALLBACK_REPLY)));
        assert!(!done.is_awaiting_reply());

        // Input is usable again after the timeout
        handle.submit("retry").await.unwrap();
        wait_for(&mut rx, |s| s.messages.len() == 4).await;
    }

    #[tokio::test]
    async fn test_dropping_handles_cancels_request() {
        let client = HangingReplyClient::new();
        let started = client.started_flag();
        let abandoned = client.abandoned_flag();
        let handle = widget(client);
        let mut rx = handle.subscribe();

        handle.open().await.unwrap();
        handle.submit("hello").await.unwrap();
        wait_for(&mut rx, WidgetState::is_awaiting_reply).await;
        tokio::time::timeout(WAIT, async {
            while !started.load(Ordering::SeqCst) {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("request never started");
        drop(handle);

        tokio::time::timeout(WAIT, async {
            while !abandoned.load(Ordering::SeqCst) {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("request was not cancelled");
    }
}
