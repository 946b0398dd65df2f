//! Verifier interface: a deterministic yes/no oracle.
//!
//! Dyn-compatible (boxed futures) so the classifier can hold
//! `Arc<dyn Verifier>` and tests can script replies.

use std::sync::Arc;
use std::{future::Future, pin::Pin};

use ai_llm_service::{AiLlmError, LlmServiceProfiles};

/// A yes/no oracle consulted by the llm stage.
pub trait Verifier: Send + Sync {
    /// Sends one verification prompt and returns the raw reply.
    fn verify<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, AiLlmError>> + Send + 'a>>;
}

/// Production verifier backed by the zero-temperature verification profile.
pub struct LlmVerifier {
    svc: Arc<LlmServiceProfiles>,
}

impl LlmVerifier {
    /// Wraps the shared profile bundle.
    pub fn new(svc: Arc<LlmServiceProfiles>) -> Self {
        Self { svc }
    }
}

impl Verifier for LlmVerifier {
    fn verify<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, AiLlmError>> + Send + 'a>> {
        Box::pin(self.svc.verify(prompt))
    }
}
