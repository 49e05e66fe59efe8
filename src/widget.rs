//! Chat widget state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.
//! Network calls and view updates are described as effects and executed by
//! the runtime.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;


pub use effect::Effect;
pub use event::{DraftEdit, Event};
pub use state::{
    Message, ReplyStatus, Sender, Visibility, WidgetState, DEFAULT_GREETING, FALLBACK_REPLY,
};
pub use transition::{transition, TransitionError, TransitionResult};
