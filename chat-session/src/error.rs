//! Typed error for the chat-session crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// Errors from the LLM service during setup.
    #[error("LLM error: {0}")]
    Llm(#[from] ai_llm_service::AiLlmError),

    /// Errors from the vector index during setup or stats.
    #[error("index error: {0}")]
    Index(#[from] rag_index::RagIndexError),

    /// Errors from the answering pipeline, re-raised after being reported to
    /// the user.
    #[error("answering failed: {0}")]
    Answer(#[from] answer_engine::AnswerEngineError),
}
