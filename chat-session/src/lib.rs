//! Session control for the topic-gated chat assistant.
//!
//! One [`SessionContext`] per chat session owns the conversation memory, a
//! relevance classifier, and the answer engine. [`handle_message`] runs each
//! incoming message through the gate → answer → gate pipeline, owning the
//! refusal policy and all user-facing status messages. [`SharedServices`]
//! holds the process-wide read-only collaborators and [`start_session`]
//! builds fresh per-session state from them.

mod bootstrap;
mod controller;
mod error;
mod frontend;
mod messages;
mod session;

pub use bootstrap::{SharedServices, start_session};
pub use controller::{TurnOutcome, handle_message};
pub use error::SessionError;
pub use frontend::{ChatFrontend, StatusId};
pub use messages::{
    NOT_INITIALIZED_TEXT, REFUSAL_TEXT, SETUP_STARTED_TEXT, THINKING_TEXT, setup_complete_text,
};
pub use session::SessionContext;
