//! Semantic router: nearest-exemplar match via embedding similarity.
//!
//! At startup every utterance in the route table is embedded once; at match
//! time the input is embedded and compared to all exemplars by cosine. A
//! route counts as matched only when the best exemplar reaches the score
//! threshold, so unrelated text maps to "no route" rather than the least-bad
//! route.

use ai_llm_service::{AiLlmError, EmbeddingsProvider};
use tracing::{debug, info};

use crate::routes::Route;

/// Result of a successful route match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteMatch {
    /// Name of the matched route.
    pub name: &'static str,
    /// Cosine similarity of the best exemplar.
    pub score: f32,
}

pub(crate) struct Exemplar {
    pub(crate) route: &'static str,
    pub(crate) vector: Vec<f32>,
}

/// Read-only nearest-exemplar matcher, shared across all sessions.
pub struct SemanticRouter {
    pub(crate) threshold: f32,
    pub(crate) entries: Vec<Exemplar>,
}

impl SemanticRouter {
    /// Embeds all route utterances through `provider` and builds the router.
    ///
    /// Runs once per process; the result is immutable.
    ///
    /// # Errors
    /// Propagates embedding failures; a router with missing exemplars would
    /// silently misroute, so construction is strict.
    pub async fn build(
        routes: &[Route],
        provider: &dyn EmbeddingsProvider,
        threshold: f32,
    ) -> Result<Self, AiLlmError> {
        let mut entries = Vec::new();
        for route in routes {
            for utterance in route.utterances {
                let vector = provider.embed(utterance).await?;
                entries.push(Exemplar {
                    route: route.name,
                    vector,
                });
            }
        }

        info!(
            routes = routes.len(),
            exemplars = entries.len(),
            threshold,
            "semantic router built"
        );

        Ok(Self { threshold, entries })
    }

    /// Matches a pre-computed embedding against all exemplars.
    ///
    /// Returns the route of the best-scoring exemplar, or `None` when no
    /// exemplar reaches the threshold.
    pub fn match_vector(&self, vector: &[f32]) -> Option<RouteMatch> {
        let mut best: Option<RouteMatch> = None;
        for e in &self.entries {
            let score = cosine(vector, &e.vector);
            if best.is_none_or(|b| score > b.score) {
                best = Some(RouteMatch {
                    name: e.route,
                    score,
                });
            }
        }

        match best {
            Some(m) if m.score >= self.threshold => {
                debug!(route = m.name, score = m.score, "route matched");
                Some(m)
            }
            Some(m) => {
                debug!(
                    route = m.name,
                    score = m.score,
                    threshold = self.threshold,
                    "best route below threshold"
                );
                None
            }
            None => None,
        }
    }

    /// Embeds `text` and returns the best route, if any.
    ///
    /// # Errors
    /// Propagates embedding failures to the caller, which treats them as an
    /// inconclusive stage.
    pub async fn best_route(
        &self,
        text: &str,
        provider: &dyn EmbeddingsProvider,
    ) -> Result<Option<RouteMatch>, AiLlmError> {
        let vector = provider.embed(text).await?;
        Ok(self.match_vector(&vector))
    }

    /// Number of embedded exemplars.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the router holds no exemplars.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cosine similarity over the common prefix of two vectors.
pub(crate) fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let (mut dot, mut na, mut nb) = (0.0f32, 0.0f32, 0.0f32);
    let len = a.len().min(b.len());
    for i in 0..len {
        dot += a[i] * b[i];
        na += a[i] * a[i];
        nb += b[i] * b[i];
    }
    if na == 0.0 || nb == 0.0 {
        0.0
    } else {
        dot / (na.sqrt() * nb.sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router(entries: Vec<(&'static str, Vec<f32>)>, threshold: f32) -> SemanticRouter {
        SemanticRouter {
            threshold,
            entries: entries
                .into_iter()
                .map(|(route, vector)| Exemplar { route, vector })
                .collect(),
        }
    }

    #[test]
    fn cosine_basics() {
        assert!((cosine(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn picks_best_exemplar_across_routes() {
        let r = router(
            vec![
                ("paul", vec![1.0, 0.0]),
                ("paul", vec![0.9, 0.1]),
                ("other", vec![0.0, 1.0]),
            ],
            0.5,
        );
        let m = r.match_vector(&[1.0, 0.05]).unwrap();
        assert_eq!(m.name, "paul");
        assert!(m.score > 0.9);
    }

    #[test]
    fn below_threshold_is_no_route() {
        let r = router(vec![("paul", vec![1.0, 0.0])], 0.9);
        assert!(r.match_vector(&[0.4, 0.6]).is_none());
    }

    #[test]
    fn empty_router_never_matches() {
        let r = router(vec![], 0.0);
        assert!(r.match_vector(&[1.0, 0.0]).is_none());
        assert!(r.is_empty());
    }
}
