//! Chat widget state types

use serde::{Deserialize, Serialize};

/// First bot message of a new widget
pub const DEFAULT_GREETING: &str = "Hi! I'm your Test Centre assistant. How can I help you today?";

/// Bot message recorded when a request fails for any reason
pub const FALLBACK_REPLY: &str = "Sorry, I'm having trouble connecting. Please try again.";

// ============================================================================
// Messages
// ============================================================================

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

/// A single entry in the conversation. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}

// ============================================================================
// Widget State
// ============================================================================

/// Which part of the widget is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Only the launcher is shown
    #[default]
    Closed,
    /// Full window: header, messages and input
    Open,
    /// Header only
    Minimized,
}

impl Visibility {
    pub fn is_open(self) -> bool {
        !matches!(self, Visibility::Closed)
    }
}

/// Whether a request to the Reply Service is outstanding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplyStatus {
    /// No request in flight; submission permitted
    #[default]
    Idle,
    /// Exactly one request in flight
    Awaiting { request_id: u64 },
}

/// Complete state of one widget instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetState {
    pub visibility: Visibility,
    /// Append-only, in display order
    pub messages: Vec<Message>,
    pub reply: ReplyStatus,
    pub draft: String,
    /// Id handed to the next submitted request
    pub(crate) next_request_id: u64,
}

impl WidgetState {
    /// A closed widget whose conversation starts with `greeting`
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            visibility: Visibility::Closed,
            messages: vec![Message::bot(greeting)],
            reply: ReplyStatus::Idle,
            draft: String::new(),
            next_request_id: 1,
        }
    }

    pub fn is_open(&self) -> bool {
        self.visibility.is_open()
    }

    pub fn is_minimized(&self) -> bool {
        self.visibility == Visibility::Minimized
    }

    pub fn is_awaiting_reply(&self) -> bool {
        matches!(self.reply, ReplyStatus::Awaiting { .. })
    }

    /// Id of the outstanding request, if any
    pub fn pending_request(&self) -> Option<u64> {
        match self.reply {
            ReplyStatus::Awaiting { request_id } => Some(request_id),
            ReplyStatus::Idle => None,
        }
    }

    /// Whether the send affordance should be enabled for the current draft
    pub fn can_submit_draft(&self) -> bool {
        self.is_open() && !self.is_awaiting_reply() && !self.draft.trim().is_empty()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

impl Default for WidgetState {
    fn default() -> Self {
        Self::new(DEFAULT_GREETING)
    }
}
