//! Runtime and collection configuration.

use crate::errors::RagIndexError;

/// Distance function used for the vector space.
#[derive(Clone, Copy, Debug)]
pub enum DistanceKind {
    /// Cosine distance (recommended for most embeddings).
    Cosine,
    /// Dot product (useful for normalized vectors).
    Dot,
    /// Euclidean distance (L2).
    Euclid,
}

/// Configuration for read-only index access.
///
/// The documents live in one collection; the logical namespace (e.g. `info`)
/// is a payload field every point carries, applied as an equality filter at
/// search time.
#[derive(Clone, Debug)]
pub struct IndexConfig {
    /// Qdrant gRPC endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Target collection name.
    pub collection: String,
    /// Payload namespace restricting searches (None = whole collection).
    pub namespace: Option<String>,
    /// Distance function (Cosine by default).
    pub distance: DistanceKind,
    /// Exact search flag (false = HNSW ANN).
    pub exact_search: bool,
}

impl IndexConfig {
    /// Creates a sane default config for a given collection name and Qdrant
    /// endpoint.
    pub fn new_default(url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            qdrant_url: url.into(),
            qdrant_api_key: None,
            collection: collection.into(),
            namespace: None,
            distance: DistanceKind::Cosine,
            exact_search: false,
        }
    }

    /// Builds the config from environment variables with defaults:
    /// `QDRANT_URL`, `QDRANT_API_KEY`, `QDRANT_COLLECTION` (default
    /// `paul-allen`), `QDRANT_NAMESPACE` (default `info`, empty disables),
    /// `RAG_EXACT_SEARCH`.
    pub fn from_env() -> Self {
        let namespace = match std::env::var("QDRANT_NAMESPACE") {
            Ok(ns) if ns.trim().is_empty() => None,
            Ok(ns) => Some(ns),
            Err(_) => Some("info".to_string()),
        };

        Self {
            qdrant_url: env_or("QDRANT_URL", "http://127.0.0.1:6334"),
            qdrant_api_key: std::env::var("QDRANT_API_KEY").ok(),
            collection: env_or("QDRANT_COLLECTION", "paul-allen"),
            namespace,
            distance: DistanceKind::Cosine,
            exact_search: env_or("RAG_EXACT_SEARCH", "false") == "true",
        }
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), RagIndexError> {
        if self.qdrant_url.trim().is_empty() {
            return Err(RagIndexError::Config("qdrant_url is empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(RagIndexError::Config("collection is empty".into()));
        }
        if let Some(ns) = &self.namespace {
            if ns.trim().is_empty() {
                return Err(RagIndexError::Config("namespace is empty".into()));
            }
        }
        Ok(())
    }
}

fn env_or(k: &str, dflt: &str) -> String {
    std::env::var(k).unwrap_or_else(|_| dflt.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let cfg = IndexConfig::new_default("http://127.0.0.1:6334", "paul-allen");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn empty_collection_is_rejected() {
        let cfg = IndexConfig::new_default("http://127.0.0.1:6334", "  ");
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn blank_namespace_is_rejected() {
        let mut cfg = IndexConfig::new_default("http://127.0.0.1:6334", "paul-allen");
        cfg.namespace = Some(" ".into());
        assert!(cfg.validate().is_err());
    }
}
