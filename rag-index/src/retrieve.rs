//! Retrieval helpers: low-level vector search and high-level context lookup.

use crate::config::IndexConfig;
use crate::errors::RagIndexError;
use crate::filters::namespace_filter;
use crate::qdrant_facade::QdrantFacade;
use crate::record::{ContextHit, ContextQuery};

use ai_llm_service::EmbeddingsProvider;
use qdrant_client::qdrant::Filter;
use tracing::trace;

/// Performs a low-level similarity search given a ready query vector.
///
/// # Errors
/// Returns `RagIndexError::Qdrant` on client failures.
pub async fn search_by_vector(
    client: &QdrantFacade,
    query_vector: Vec<f32>,
    top_k: u64,
    filter: Option<Filter>,
) -> Result<Vec<(f32, serde_json::Value)>, RagIndexError> {
    trace!("retrieve::search_by_vector top_k={top_k}");
    client.search(query_vector, top_k, filter, true).await
}

/// Embeds the query text and returns normalized context hits, restricted to
/// the configured namespace when one is set.
///
/// # Errors
/// Returns embedding/provider errors or Qdrant failures.
pub async fn retrieve_context(
    cfg: &IndexConfig,
    client: &QdrantFacade,
    query: ContextQuery<'_>,
    provider: &dyn EmbeddingsProvider,
) -> Result<Vec<ContextHit>, RagIndexError> {
    trace!(
        "retrieve::retrieve_context top_k={} namespace={:?}",
        query.top_k, cfg.namespace
    );

    let qv = provider.embed(query.text).await?;
    let filter = cfg.namespace.as_deref().map(namespace_filter);

    let hits = search_by_vector(client, qv, query.top_k, filter).await?;

    let out = hits
        .into_iter()
        .map(|(score, payload)| ContextHit::from_payload(score, payload))
        .collect::<Vec<_>>();

    trace!("retrieve::retrieve_context hits={}", out.len());
    Ok(out)
}
