//! Events that can occur in a chat widget

use crate::client::ClientErrorKind;

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // Visibility events
    Open,
    Close,
    ToggleMinimize,

    // Input events
    EditDraft(DraftEdit),
    /// Submit the given text; the draft is cleared either way
    Submit { text: String },
    /// Submit whatever the draft currently holds
    SubmitDraft,

    // Reply Service events
    ReplyReceived { request_id: u64, text: String },
    ReplyFailed { request_id: u64, kind: ClientErrorKind },
}

/// A single change to the draft input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftEdit {
    Insert(char),
    /// Literal newline, bound to the modifier-held submit key
    Newline,
    Backspace,
    Replace(String),
}

impl Event {
    pub fn submit(text: impl Into<String>) -> Self {
        Event::Submit { text: text.into() }
    }

    /// Whether this event reports the outcome of a request
    pub fn is_reply(&self) -> bool {
        matches!(
            self,
            Event::ReplyReceived { .. } | Event::ReplyFailed { .. }
        )
    }
}
