//! Effects produced by state transitions

/// Effects to be executed after a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send one message to the Reply Service
    SendMessage { request_id: u64, text: String },

    /// Bring the most recently appended message into view
    ScrollToLatest,
}

impl Effect {
    pub fn send_message(request_id: u64, text: impl Into<String>) -> Self {
        Effect::SendMessage {
            request_id,
            text: text.into(),
        }
    }
}
