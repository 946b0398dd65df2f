//! Fixed user-facing texts.
//!
//! The refusal text is identical no matter which gating step triggered it,
//! so callers cannot tell a rejected query from a rejected answer.

/// Sent instead of an answer whenever the gate refuses.
pub const REFUSAL_TEXT: &str = "Let's keep the conversation to Paul Allen related topics.";

/// Status shown while a message is being processed.
pub const THINKING_TEXT: &str = "Thinking...";

/// Status shown when the answer engine is missing from the session.
pub const NOT_INITIALIZED_TEXT: &str =
    "Error: answer engine not initialized. Please restart the chat.";

/// Sent when session setup begins.
pub const SETUP_STARTED_TEXT: &str = "Setting up the chatbot with the Qdrant index...";

/// Sent when session setup finished, with the indexed point count for user
/// confidence.
pub fn setup_complete_text(points: u64) -> String {
    format!(
        "Setup complete! Connected to the index with {points} vectors. Ask me anything about Paul Allen."
    )
}
