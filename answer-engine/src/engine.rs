//! The retrieval-augmented answerer.

use std::sync::Arc;
use std::{future::Future, pin::Pin};

use ai_llm_service::{ChatMessage, LlmServiceProfiles};
use rag_index::{ContextQuery, IndexConfig, QdrantFacade, retrieve_context};
use tracing::{debug, info};

use crate::api_types::{AnswerOptions, QaAnswer, UsedChunk, clamp_preview};
use crate::error::AnswerEngineError;
use crate::memory::ChatMemoryBuffer;
use crate::prompt::{DEFAULT_SYSTEM, build_user_prompt};

/// Retrieval/prompt knobs for the engine.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Number of context chunks retrieved per question.
    pub top_k: u64,
    /// Character budget for the context block in the prompt.
    pub max_ctx_chars: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            top_k: 2,
            max_ctx_chars: 8500,
        }
    }
}

impl EngineConfig {
    /// Build from environment variables with defaults
    /// (`RAG_TOP_K`, `MAX_CTX_CHARS`).
    pub fn from_env() -> Self {
        let dflt = Self::default();
        Self {
            top_k: parse("RAG_TOP_K", dflt.top_k),
            max_ctx_chars: parse("MAX_CTX_CHARS", dflt.max_ctx_chars),
        }
    }
}

/// The answering contract the session controller depends on.
///
/// Dyn-compatible (boxed futures) so controllers can hold
/// `Box<dyn Answerer>` and tests can substitute stubs.
pub trait Answerer: Send + Sync {
    /// Produces a grounded answer for `query`, reading and extending
    /// `memory` with the new exchange.
    fn answer<'a>(
        &'a self,
        query: &'a str,
        memory: &'a mut ChatMemoryBuffer,
    ) -> Pin<Box<dyn Future<Output = Result<QaAnswer, AnswerEngineError>> + Send + 'a>>;
}

/// Production answerer: embed → retrieve → prompt → chat.
pub struct AnswerEngine {
    svc: Arc<LlmServiceProfiles>,
    facade: Arc<QdrantFacade>,
    index_cfg: IndexConfig,
    cfg: EngineConfig,
}

impl AnswerEngine {
    /// Wires the engine to its collaborators.
    pub fn new(
        svc: Arc<LlmServiceProfiles>,
        facade: Arc<QdrantFacade>,
        index_cfg: IndexConfig,
        cfg: EngineConfig,
    ) -> Self {
        Self {
            svc,
            facade,
            index_cfg,
            cfg,
        }
    }

    /// Runs the full pipeline for one question with the configured knobs.
    ///
    /// # Errors
    /// Propagates retrieval and chat failures; nothing is swallowed here.
    pub async fn answer(
        &self,
        query: &str,
        memory: &mut ChatMemoryBuffer,
    ) -> Result<QaAnswer, AnswerEngineError> {
        self.answer_with_opts(query, memory, AnswerOptions::default())
            .await
    }

    /// Runs the full pipeline for one question.
    ///
    /// Any `AnswerOptions` field set to `0` is replaced by the corresponding
    /// engine config value. The memory's prior turns ride along as chat
    /// history; on success the raw query and the answer are recorded back
    /// into memory (never the context-stuffed prompt, so retrieval text does
    /// not accumulate).
    ///
    /// # Errors
    /// Propagates retrieval and chat failures; nothing is swallowed here.
    pub async fn answer_with_opts(
        &self,
        query: &str,
        memory: &mut ChatMemoryBuffer,
        opts: AnswerOptions,
    ) -> Result<QaAnswer, AnswerEngineError> {
        let top_k = if opts.top_k == 0 {
            self.cfg.top_k
        } else {
            opts.top_k
        };

        let hits = retrieve_context(
            &self.index_cfg,
            &self.facade,
            ContextQuery {
                text: query,
                top_k,
            },
            self.svc.as_ref(),
        )
        .await?;

        debug!(hits = hits.len(), top_k, "context retrieved");

        let user_prompt = build_user_prompt(query, &hits, self.cfg.max_ctx_chars);

        let mut messages = Vec::with_capacity(memory.len() + 2);
        messages.push(ChatMessage::system(DEFAULT_SYSTEM));
        messages.extend(memory.messages().cloned());
        messages.push(ChatMessage::user(user_prompt));

        let answer = self.svc.chat_answer(&messages).await?;

        memory.record_exchange(query, &answer);

        info!(
            answer_len = answer.len(),
            history_turns = memory.len(),
            "answer generated"
        );

        let context = hits
            .into_iter()
            .map(|h| UsedChunk {
                score: h.score,
                source: h.source,
                title: h.title,
                text: clamp_preview(&h.text, 800),
            })
            .collect();

        Ok(QaAnswer { answer, context })
    }
}

impl Answerer for AnswerEngine {
    fn answer<'a>(
        &'a self,
        query: &'a str,
        memory: &'a mut ChatMemoryBuffer,
    ) -> Pin<Box<dyn Future<Output = Result<QaAnswer, AnswerEngineError>> + Send + 'a>> {
        // Resolves to the inherent method above.
        Box::pin(self.answer(query, memory))
    }
}

fn parse<T: std::str::FromStr>(k: &str, dflt: T) -> T {
    std::env::var(k)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(dflt)
}
