//! Key bindings for the terminal widget

use crate::widget::{DraftEdit, Event, Visibility, WidgetState};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key press asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Widget(Event),
    ScrollUp,
    ScrollDown,
    Quit,
    Ignore,
}

/// Map a key press to an action given the widget state the view shows.
///
/// Enter without a modifier submits the draft; Shift or Alt held inserts a
/// literal newline instead. Whether a submission is allowed is left to the
/// state machine, which rejects it with a reason.
pub fn map_key(key: KeyEvent, state: &WidgetState) -> Action {
    if key.kind != KeyEventKind::Press {
        return Action::Ignore;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let newline_modifier = key
        .modifiers
        .intersects(KeyModifiers::SHIFT | KeyModifiers::ALT);

    match (state.visibility, key.code) {
        (_, KeyCode::Char('c')) if ctrl => Action::Quit,

        // Launcher
        (Visibility::Closed, KeyCode::Enter) => Action::Widget(Event::Open),
        (Visibility::Closed, KeyCode::Char('o')) if ctrl => Action::Widget(Event::Open),
        (Visibility::Closed, KeyCode::Char('q') | KeyCode::Esc) => Action::Quit,
        (Visibility::Closed, _) => Action::Ignore,

        // Header actions
        (_, KeyCode::Esc) => Action::Widget(Event::Close),
        (_, KeyCode::Char('t')) if ctrl => Action::Widget(Event::ToggleMinimize),
        (Visibility::Minimized, KeyCode::Enter) => Action::Widget(Event::ToggleMinimize),
        (Visibility::Minimized, _) => Action::Ignore,

        // Input area
        (Visibility::Open, KeyCode::Enter) if newline_modifier => {
            Action::Widget(Event::EditDraft(DraftEdit::Newline))
        }
        (Visibility::Open, KeyCode::Enter) => Action::Widget(Event::SubmitDraft),
        (Visibility::Open, KeyCode::Backspace) => {
            Action::Widget(Event::EditDraft(DraftEdit::Backspace))
        }
        (Visibility::Open, KeyCode::Char(ch)) if !ctrl => {
            Action::Widget(Event::EditDraft(DraftEdit::Insert(ch)))
        }
        (Visibility::Open, KeyCode::PageUp) => Action::ScrollUp,
        (Visibility::Open, KeyCode::PageDown) => Action::ScrollDown,
        (Visibility::Open, _) => Action::Ignore,
    }
}
