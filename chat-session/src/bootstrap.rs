//! Session lifecycle: shared collaborators + per-session setup.
//!
//! The process builds [`SharedServices`] once (LLM profiles, index facade,
//! embedded route table); every chat session then gets its own fresh
//! [`SessionContext`] from [`start_session`], which also emits the
//! user-facing setup status messages.

use std::sync::Arc;

use ai_llm_service::{EmbeddingsProvider, LlmServiceProfiles};
use answer_engine::{AnswerEngine, ChatMemoryBuffer, EngineConfig};
use rag_index::{IndexConfig, QdrantFacade};
use topic_gate::{
    LlmVerifier, PAUL_ALLEN, RelevanceClassifier, SemanticRouter, TopicSpec, route_table,
};
use tracing::info;

use crate::error::SessionError;
use crate::frontend::ChatFrontend;
use crate::messages::{SETUP_STARTED_TEXT, setup_complete_text};
use crate::session::SessionContext;

/// Default cosine threshold for a route match.
const DEFAULT_ROUTE_THRESHOLD: f32 = 0.75;

/// Process-wide read-only collaborators, shared by all sessions.
pub struct SharedServices {
    /// LLM profile bundle (answer/verification/embedding).
    pub svc: Arc<LlmServiceProfiles>,
    /// Route table embedded once at startup.
    pub router: Arc<SemanticRouter>,
    /// Connection to the vector index.
    pub facade: Arc<QdrantFacade>,
    /// Index location/namespace configuration.
    pub index_cfg: IndexConfig,
    /// Retrieval/prompt knobs for new engines.
    pub engine_cfg: EngineConfig,
    /// The gated topic.
    pub topic: TopicSpec,
}

impl SharedServices {
    /// Builds all shared collaborators from environment configuration and
    /// embeds the route table exemplars.
    ///
    /// # Errors
    /// Fails when profile config is incomplete, the index client cannot be
    /// constructed, or exemplar embedding fails.
    pub async fn from_env() -> Result<Self, SessionError> {
        let svc = Arc::new(LlmServiceProfiles::from_env()?);

        let index_cfg = IndexConfig::from_env();
        let facade = Arc::new(QdrantFacade::new(&index_cfg)?);

        let threshold = std::env::var("ROUTE_SCORE_THRESHOLD")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_ROUTE_THRESHOLD);
        let router =
            Arc::new(SemanticRouter::build(route_table(), svc.as_ref(), threshold).await?);

        info!(
            collection = %index_cfg.collection,
            exemplars = router.len(),
            "shared services ready"
        );

        Ok(Self {
            svc,
            router,
            facade,
            index_cfg,
            engine_cfg: EngineConfig::from_env(),
            topic: PAUL_ALLEN,
        })
    }
}

/// Initializes one chat session.
///
/// Emits a setup status, reads index stats (point count) for the completion
/// message, and assembles a fresh memory, classifier and engine. Runs once
/// per session start.
///
/// # Errors
/// Propagates index stat failures; a session without a reachable index
/// would answer nothing anyway.
pub async fn start_session(
    shared: &SharedServices,
    frontend: &dyn ChatFrontend,
) -> Result<SessionContext, SessionError> {
    frontend.send(SETUP_STARTED_TEXT).await;

    let stats = shared.facade.stats().await?;

    let embedder: Arc<dyn EmbeddingsProvider> = shared.svc.clone();
    let classifier = RelevanceClassifier::new(
        shared.topic,
        shared.router.clone(),
        embedder,
        Arc::new(LlmVerifier::new(shared.svc.clone())),
    );

    let engine = AnswerEngine::new(
        shared.svc.clone(),
        shared.facade.clone(),
        shared.index_cfg.clone(),
        shared.engine_cfg,
    );

    let ctx = SessionContext {
        memory: ChatMemoryBuffer::from_env(),
        classifier,
        engine: Some(Box::new(engine)),
    };

    frontend.send(&setup_complete_text(stats.points_count)).await;

    info!(
        points = stats.points_count,
        "session initialized"
    );

    Ok(ctx)
}
