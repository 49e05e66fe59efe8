//! Terminal front end for the chat widget

pub mod input;
pub mod render;

use crate::runtime::{ViewEvent, WidgetHandle};
use crate::widget::{transition, Event, WidgetState};
use crossterm::event::{
    self, Event as TermEvent, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use input::Action;
use std::collections::VecDeque;
use std::io;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::TryRecvError};

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const SCROLL_STEP: u16 = 5;

/// Lets terminals that support it report Shift+Enter apart from Enter
const KEYBOARD_FLAGS: KeyboardEnhancementFlags =
    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES;

/// What the terminal shows: the widget state plus view-only state.
///
/// Inputs are applied locally as soon as they are sent, so keys typed before
/// the runtime catches up are interpreted against the state they will
/// actually meet. Snapshots from the runtime replace the local state, with
/// any inputs they do not reflect yet replayed on top. The view assumes it
/// is the only source of inputs.
#[derive(Debug, Clone)]
pub struct View {
    pub state: WidgetState,
    /// Rows scrolled up from the newest message
    pub scroll: u16,
    /// Last rejected action, cleared by the next key press
    pub notice: Option<String>,
    /// Inputs sent but not yet reflected by the runtime, oldest first
    unacked: VecDeque<Event>,
    /// Inputs sent so far
    sent: u64,
}

impl View {
    pub fn new(state: WidgetState) -> Self {
        Self {
            state,
            scroll: 0,
            notice: None,
            unacked: VecDeque::new(),
            sent: 0,
        }
    }

    /// Record an input sent to the runtime and apply it locally
    pub fn predict(&mut self, event: Event) {
        self.state = replay(self.state.clone(), std::iter::once(event.clone()));
        self.unacked.push_back(event);
        self.sent += 1;
    }

    pub fn apply(&mut self, event: ViewEvent) {
        match event {
            ViewEvent::Snapshot { state, inputs } => {
                self.acknowledge(inputs);
                self.state = replay(state, self.unacked.iter().cloned());
            }
            ViewEvent::ScrollToLatest => self.scroll = 0,
            ViewEvent::Rejected { reason, inputs } => {
                self.acknowledge(inputs);
                self.notice = Some(reason);
            }
        }
    }

    /// Drop inputs the runtime has handled
    fn acknowledge(&mut self, inputs: u64) {
        let pending = usize::try_from(self.sent.saturating_sub(inputs)).unwrap_or(usize::MAX);
        while self.unacked.len() > pending {
            self.unacked.pop_front();
        }
    }

    fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_add(SCROLL_STEP);
    }

    fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_sub(SCROLL_STEP);
    }
}

/// Run the terminal loop until the user quits. Blocking; call from a
/// dedicated thread, not from an async task.
pub fn run(
    handle: &WidgetHandle,
    initial: WidgetState,
    mut updates: broadcast::Receiver<ViewEvent>,
) -> io::Result<()> {
    let mut terminal = ratatui::init();
    let enhanced = crossterm::terminal::supports_keyboard_enhancement().unwrap_or(false)
        && execute!(io::stdout(), PushKeyboardEnhancementFlags(KEYBOARD_FLAGS)).is_ok();
    if !enhanced {
        tracing::debug!("Keyboard enhancement unavailable, Shift+Enter reads as Enter");
    }

    let result = event_loop(&mut terminal, handle, View::new(initial), &mut updates);

    if enhanced {
        let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
    }
    ratatui::restore();
    result
}

/// Apply `events` in order, skipping any the state machine rejects
fn replay(state: WidgetState, events: impl Iterator<Item = Event>) -> WidgetState {
    events.fold(state, |state, event| match transition(&state, event) {
        Ok(result) => result.new_state,
        Err(_) => state,
    })
}

fn event_loop(
    terminal: &mut ratatui::DefaultTerminal,
    handle: &WidgetHandle,
    mut view: View,
    updates: &mut broadcast::Receiver<ViewEvent>,
) -> io::Result<()> {
    loop {
        loop {
            match updates.try_recv() {
                Ok(update) => view.apply(update),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "View fell behind runtime updates");
                }
                Err(TryRecvError::Closed) => return Ok(()),
            }
        }

        terminal.draw(|frame| render::render(frame, &view))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let TermEvent::Key(key) = event::read()? else {
            continue;
        };

        match input::map_key(key, &view.state) {
            Action::Quit => return Ok(()),
            Action::Widget(event) => {
                view.notice = None;
                view.predict(event.clone());
                if let Err(e) = handle.blocking_send(event) {
                    tracing::error!(error = %e, "Widget runtime unavailable");
                    return Ok(());
                }
            }
            Action::ScrollUp => view.scroll_up(),
            Action::ScrollDown => view.scroll_down(),
            Action::Ignore => {}
        }
    }
}
