//! Typed error for the answer-engine crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnswerEngineError {
    /// Errors from the LLM service (chat or embeddings).
    #[error("LLM error: {0}")]
    Llm(#[from] ai_llm_service::AiLlmError),

    /// Errors from the vector index.
    #[error("index error: {0}")]
    Index(#[from] rag_index::RagIndexError),
}
