//! Chat message types shared by all provider clients.

/// Role of a single chat turn, in the usual chat-completion sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    /// Steering instructions, sent first.
    System,
    /// End-user input.
    User,
    /// Model output from a previous turn.
    Assistant,
}

impl ChatRole {
    /// Wire name of the role (`"system"`, `"user"`, `"assistant"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// One message in a chat-completion conversation.
///
/// # Example
/// ```
/// use ai_llm_service::chat::{ChatMessage, ChatRole};
///
/// let msg = ChatMessage::user("Who founded the Allen Institute?");
/// assert_eq!(msg.role, ChatRole::User);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Who speaks this turn.
    pub role: ChatRole,
    /// Plain-text content of the turn.
    pub content: String,
}

impl ChatMessage {
    /// A system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    /// A user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// An assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}
