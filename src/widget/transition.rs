//! Pure state transition function

use super::state::FALLBACK_REPLY;
use super::{DraftEdit, Effect, Event, Message, ReplyStatus, Visibility, WidgetState};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: WidgetState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: WidgetState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition. The state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Widget is closed")]
    WidgetClosed,
    #[error("Message is empty")]
    EmptyMessage,
    #[error("Still waiting for a reply to the previous message")]
    AwaitingReply,
    #[error("No request {request_id} is outstanding")]
    UnexpectedReply { request_id: u64 },
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs, with no I/O.
pub fn transition(state: &WidgetState, event: Event) -> Result<TransitionResult, TransitionError> {
    match event {
        // ============================================================
        // Visibility
        // ============================================================
        Event::Open => match state.visibility {
            Visibility::Closed => Ok(TransitionResult::new(with_visibility(state, Visibility::Open))
                .with_effect(Effect::ScrollToLatest)),
            Visibility::Open | Visibility::Minimized => Err(TransitionError::InvalidTransition(
                "Widget is already open".to_string(),
            )),
        },

        Event::Close => match state.visibility {
            Visibility::Closed => Err(TransitionError::WidgetClosed),
            Visibility::Open | Visibility::Minimized => Ok(TransitionResult::new(
                with_visibility(state, Visibility::Closed),
            )),
        },

        Event::ToggleMinimize => match state.visibility {
            Visibility::Closed => Err(TransitionError::WidgetClosed),
            Visibility::Open => Ok(TransitionResult::new(with_visibility(
                state,
                Visibility::Minimized,
            ))),
            Visibility::Minimized => Ok(TransitionResult::new(with_visibility(
                state,
                Visibility::Open,
            ))
            .with_effect(Effect::ScrollToLatest)),
        },

        // ============================================================
        // Draft Input
        // ============================================================
        Event::EditDraft(edit) => {
            if !state.is_open() {
                return Err(TransitionError::WidgetClosed);
            }
            let mut new_state = state.clone();
            apply_edit(&mut new_state.draft, edit);
            Ok(TransitionResult::new(new_state))
        }

        // ============================================================
        // Submission
        // ============================================================
        Event::Submit { text } => submit(state, &text),

        Event::SubmitDraft => submit(state, &state.draft),

        // ============================================================
        // Reply Outcomes
        // ============================================================
        Event::ReplyReceived { request_id, text } => resolve(state, request_id, text),

        Event::ReplyFailed { request_id, .. } => resolve(state, request_id, FALLBACK_REPLY),
    }
}

fn submit(state: &WidgetState, text: &str) -> Result<TransitionResult, TransitionError> {
    if !state.is_open() {
        return Err(TransitionError::WidgetClosed);
    }
    let text = text.trim();
    if text.is_empty() {
        return Err(TransitionError::EmptyMessage);
    }
    if state.is_awaiting_reply() {
        return Err(TransitionError::AwaitingReply);
    }

    let request_id = state.next_request_id;
    let mut new_state = state.clone();
    new_state.messages.push(Message::user(text));
    new_state.draft.clear();
    new_state.reply = ReplyStatus::Awaiting { request_id };
    new_state.next_request_id = request_id + 1;

    Ok(TransitionResult::new(new_state)
        .with_effect(Effect::ScrollToLatest)
        .with_effect(Effect::send_message(request_id, text)))
}

fn resolve(
    state: &WidgetState,
    request_id: u64,
    text: impl Into<String>,
) -> Result<TransitionResult, TransitionError> {
    match state.reply {
        ReplyStatus::Awaiting { request_id: pending } if pending == request_id => {
            let mut new_state = state.clone();
            new_state.messages.push(Message::bot(text));
            new_state.reply = ReplyStatus::Idle;
            Ok(TransitionResult::new(new_state).with_effect(Effect::ScrollToLatest))
        }
        _ => Err(TransitionError::UnexpectedReply { request_id }),
    }
}

fn with_visibility(state: &WidgetState, visibility: Visibility) -> WidgetState {
    WidgetState {
        visibility,
        ..state.clone()
    }
}

fn apply_edit(draft: &mut String, edit: DraftEdit) {
    match edit {
        DraftEdit::Insert(ch) => draft.push(ch),
        DraftEdit::Newline => draft.push('\n'),
        DraftEdit::Backspace => {
            draft.pop();
        }
        DraftEdit::Replace(text) => *draft = text,
    }
}
