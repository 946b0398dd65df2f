//! Thin adapter around `qdrant-client` to isolate API usage.
//!
//! This facade concentrates all Qdrant interactions behind a minimal API,
//! hiding away the verbose builder pattern and keeping the rest of the
//! application decoupled from `qdrant-client`.

use crate::config::IndexConfig;
use crate::errors::RagIndexError;

use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    Filter, SearchParamsBuilder, SearchPointsBuilder, Value as QValue,
};
use tracing::{debug, info};

/// Counters reported by the retrieval backend for diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct IndexStats {
    /// Total number of indexed points in the collection.
    pub points_count: u64,
}

/// A facade over the Qdrant client to keep the rest of the code clean and
/// stable.
///
/// This struct encapsulates:
/// - The underlying Qdrant client.
/// - The target collection name.
/// - The exact-search flag from config.
pub struct QdrantFacade {
    client: Qdrant,
    collection: String,
    exact_search: bool,
}

impl QdrantFacade {
    /// Creates a new facade from the given configuration.
    ///
    /// Uses the builder-based API of `qdrant-client` and supports optional
    /// API key authentication. Does **not** touch any collections.
    pub fn new(cfg: &IndexConfig) -> Result<Self, RagIndexError> {
        cfg.validate()?; // Early validation of config.

        let mut builder = Qdrant::from_url(&cfg.qdrant_url);
        if let Some(key) = &cfg.qdrant_api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder
            .build()
            .map_err(|e| RagIndexError::Qdrant(format!("client build: {e}")))?;

        Ok(Self {
            client,
            collection: cfg.collection.clone(),
            exact_search: cfg.exact_search,
        })
    }

    /// Fetches collection statistics (total point count).
    ///
    /// # Errors
    /// Returns `RagIndexError::Qdrant` on transport/server failures or when
    /// the collection is missing.
    pub async fn stats(&self) -> Result<IndexStats, RagIndexError> {
        let info = self
            .client
            .collection_info(&self.collection)
            .await
            .map_err(|e| RagIndexError::Qdrant(format!("collection_info: {e}")))?;

        let points_count = info
            .result
            .and_then(|r| r.points_count)
            .unwrap_or_default();

        info!(
            collection = %self.collection,
            points_count,
            "collection stats fetched"
        );

        Ok(IndexStats { points_count })
    }

    /// Performs a similarity search in Qdrant.
    ///
    /// Returns `(score, payload)` tuples with results sorted by score.
    pub async fn search(
        &self,
        vector: Vec<f32>,
        top_k: u64,
        filter: Option<Filter>,
        with_payload: bool,
    ) -> Result<Vec<(f32, serde_json::Value)>, RagIndexError> {
        debug!(
            collection = %self.collection,
            top_k,
            with_payload,
            exact = self.exact_search,
            "running k-NN search"
        );

        let mut builder =
            SearchPointsBuilder::new(&self.collection, vector, top_k).with_payload(with_payload);

        if let Some(f) = filter {
            builder = builder.filter(f);
        }
        if self.exact_search {
            builder = builder.params(SearchParamsBuilder::default().exact(true));
        }

        let res = self
            .client
            .search_points(builder)
            .await
            .map_err(|e| RagIndexError::Qdrant(format!("search_points: {e}")))?;

        // Convert raw Qdrant payloads into JSON.
        let mut out = Vec::with_capacity(res.result.len());
        for r in res.result.into_iter() {
            let score = r.score;
            let payload_json = qpayload_to_json(r.payload);
            out.push((score, payload_json));
        }

        debug!("search completed: {} hits returned", out.len());
        Ok(out)
    }
}

/// Converts a Qdrant payload (`HashMap<String, qdrant::Value>`) into JSON.
///
/// Unsupported nested objects/arrays are mapped to `Null`.
fn qpayload_to_json(mut p: std::collections::HashMap<String, QValue>) -> serde_json::Value {
    use qdrant_client::qdrant::value::Kind as K;
    let mut m = serde_json::Map::new();
    for (k, v) in p.drain() {
        let j = match v.kind {
            Some(K::StringValue(s)) => serde_json::Value::String(s),
            Some(K::IntegerValue(i)) => serde_json::Value::Number(i.into()),
            Some(K::DoubleValue(f)) => serde_json::json!(f),
            Some(K::BoolValue(b)) => serde_json::Value::Bool(b),
            None => serde_json::Value::Null,
            // For unsupported nested types, fallback to Null for safety.
            _ => serde_json::Value::Null,
        };
        m.insert(k, j);
    }
    serde_json::Value::Object(m)
}
