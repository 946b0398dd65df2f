//! Unified error types for the crate.

use thiserror::Error;

/// Top-level error for rag-index operations.
#[derive(Debug, Error)]
pub enum RagIndexError {
    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Qdrant client errors (wrapped).
    #[error("qdrant error: {0}")]
    Qdrant(String),

    /// Embedding provider errors.
    #[error("embedding error: {0}")]
    Embedding(#[from] ai_llm_service::AiLlmError),

    /// JSON parsing / serialization errors.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
