//! Query/hit records exchanged with callers.
//!
//! Payload keys expected from ingestion: `text`, `source`, `title`,
//! `namespace`. Missing fields degrade gracefully to empty/`None`.

use serde_json::Value;

/// A retrieval request: free text plus the number of candidates wanted.
#[derive(Debug, Clone, Copy)]
pub struct ContextQuery<'a> {
    /// Natural-language query text.
    pub text: &'a str,
    /// Number of top candidates to fetch.
    pub top_k: u64,
}

/// One scored context chunk returned from the index.
#[derive(Debug, Clone)]
pub struct ContextHit {
    /// Similarity score from the vector search.
    pub score: f32,
    /// Chunk body fed to prompts.
    pub text: String,
    /// Where the chunk came from (URL or document id), if recorded.
    pub source: Option<String>,
    /// Human-readable chunk/document title, if recorded.
    pub title: Option<String>,
    /// Full payload for callers that need more fields.
    pub payload: Value,
}

impl ContextHit {
    /// Maps a `(score, payload)` search result into a hit, extracting the
    /// common fields best-effort.
    pub fn from_payload(score: f32, payload: Value) -> Self {
        let text = payload
            .get("text")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        let source = payload
            .get("source")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());
        let title = payload
            .get("title")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        Self {
            score,
            text,
            source,
            title,
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_known_fields() {
        let hit = ContextHit::from_payload(
            0.87,
            json!({
                "text": "Paul Allen co-founded Microsoft in 1975.",
                "source": "https://en.wikipedia.org/wiki/Paul_Allen",
                "title": "Paul Allen",
                "namespace": "info"
            }),
        );
        assert_eq!(hit.score, 0.87);
        assert!(hit.text.contains("Microsoft"));
        assert_eq!(hit.title.as_deref(), Some("Paul Allen"));
    }

    #[test]
    fn tolerates_sparse_payload() {
        let hit = ContextHit::from_payload(0.5, json!({ "namespace": "info" }));
        assert!(hit.text.is_empty());
        assert!(hit.source.is_none());
        assert!(hit.title.is_none());
    }
}
