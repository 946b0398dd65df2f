//! Embedding provider interface.
//!
//! Implement [`EmbeddingsProvider`] to plug in an embedding backend. The
//! trait is dyn-compatible (boxed futures) so callers can hold
//! `Arc<dyn EmbeddingsProvider>` without committing to a concrete client.

use std::{future::Future, pin::Pin};

use crate::error_handler::AiLlmError;
use crate::service_profiles::LlmServiceProfiles;

/// Provider interface for embedding generation.
///
/// Async is required because real providers (Ollama, OpenAI) perform HTTP
/// requests.
pub trait EmbeddingsProvider: Send + Sync {
    /// Maps text to a fixed-dimension vector.
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, AiLlmError>> + Send + 'a>>;
}

impl EmbeddingsProvider for LlmServiceProfiles {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, AiLlmError>> + Send + 'a>> {
        // Resolves to the inherent method on `LlmServiceProfiles`.
        Box::pin(self.embed(text))
    }
}

/// Provider that always fails; useful as a placeholder and in tests that
/// assert the embedding path is not taken.
#[derive(Clone)]
pub struct NoopEmbedder;

impl EmbeddingsProvider for NoopEmbedder {
    fn embed<'a>(
        &'a self,
        _text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, AiLlmError>> + Send + 'a>> {
        Box::pin(async { Err(AiLlmError::EmbeddingsUnavailable) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_embedder_always_errors() {
        let e = NoopEmbedder;
        assert!(e.embed("anything").await.is_err());
    }
}
