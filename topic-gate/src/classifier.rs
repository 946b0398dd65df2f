//! The relevance classifier: ordered stages + explicit combination.

use std::sync::Arc;

use ai_llm_service::EmbeddingsProvider;
use tracing::{debug, warn};

use crate::policy::{GatePolicy, combine_answer, combine_query};
use crate::prompts::{answer_verification_prompt, parse_verifier_reply, query_verification_prompt};
use crate::router::SemanticRouter;
use crate::topic::TopicSpec;
use crate::verdict::{RelevanceVerdict, Signal, StageVerdict};
use crate::verifier::Verifier;

/// Classifies queries and answers as on-topic or off-topic.
///
/// Holds only shared read-only collaborators, so one instance per session is
/// cheap and instances never interfere.
pub struct RelevanceClassifier {
    topic: TopicSpec,
    router: Arc<SemanticRouter>,
    embedder: Arc<dyn EmbeddingsProvider>,
    verifier: Arc<dyn Verifier>,
    policy: GatePolicy,
}

impl RelevanceClassifier {
    /// Builds a classifier with the default fail-open policy.
    pub fn new(
        topic: TopicSpec,
        router: Arc<SemanticRouter>,
        embedder: Arc<dyn EmbeddingsProvider>,
        verifier: Arc<dyn Verifier>,
    ) -> Self {
        Self::with_policy(topic, router, embedder, verifier, GatePolicy::default())
    }

    /// Builds a classifier with an explicit policy.
    pub fn with_policy(
        topic: TopicSpec,
        router: Arc<SemanticRouter>,
        embedder: Arc<dyn EmbeddingsProvider>,
        verifier: Arc<dyn Verifier>,
        policy: GatePolicy,
    ) -> Self {
        Self {
            topic,
            router,
            embedder,
            verifier,
            policy,
        }
    }

    /// Classifies an incoming user query.
    ///
    /// Keyword hit short-circuits; otherwise the route and llm stages are
    /// both computed and OR-ed by [`combine_query`].
    pub async fn classify_query(&self, text: &str) -> RelevanceVerdict {
        if self.topic.keyword_in(text) {
            debug!(signal = "keyword", "query admitted by keyword fast-path");
            return RelevanceVerdict::related(Signal::Keyword);
        }

        let route = self.route_stage(text).await;
        let llm = self
            .llm_stage(&query_verification_prompt(&self.topic, text))
            .await;

        let verdict = combine_query(route, llm, self.policy);
        debug!(
            related = verdict.related,
            signal = ?verdict.signal,
            route = ?route,
            llm = ?llm,
            "query classified"
        );
        verdict
    }

    /// Classifies a generated answer.
    ///
    /// Keyword hit short-circuits; otherwise only the llm stage is consulted.
    /// The semantic route is not applied to answers.
    pub async fn classify_answer(&self, text: &str) -> RelevanceVerdict {
        if self.topic.keyword_in(text) {
            debug!(signal = "keyword", "answer admitted by keyword fast-path");
            return RelevanceVerdict::related(Signal::Keyword);
        }

        let llm = self
            .llm_stage(&answer_verification_prompt(&self.topic, text))
            .await;

        let verdict = combine_answer(llm, self.policy);
        debug!(
            related = verdict.related,
            signal = ?verdict.signal,
            llm = ?llm,
            "answer classified"
        );
        verdict
    }

    /// Route stage: embed the text and ask the router for the nearest route.
    async fn route_stage(&self, text: &str) -> StageVerdict {
        match self.router.best_route(text, self.embedder.as_ref()).await {
            Ok(Some(m)) if m.name == self.topic.route => StageVerdict::Match,
            Ok(_) => StageVerdict::NoMatch,
            Err(err) => {
                warn!(error = %err, "route stage failed; treating as inconclusive");
                StageVerdict::Inconclusive
            }
        }
    }

    /// LLM stage: run the verification prompt and parse the reply.
    async fn llm_stage(&self, prompt: &str) -> StageVerdict {
        match self.verifier.verify(prompt).await {
            Ok(reply) => {
                debug!(reply = %reply.trim(), "verifier replied");
                parse_verifier_reply(&reply)
            }
            Err(err) => {
                warn!(error = %err, "llm stage failed; treating as inconclusive");
                StageVerdict::Inconclusive
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::Exemplar;
    use crate::topic::PAUL_ALLEN;
    use ai_llm_service::AiLlmError;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Embedder returning one fixed vector for any text, counting calls.
    struct FixedEmbedder {
        vector: Vec<f32>,
        calls: AtomicUsize,
    }

    impl FixedEmbedder {
        fn new(vector: Vec<f32>) -> Arc<Self> {
            Arc::new(Self {
                vector,
                calls: AtomicUsize::new(0),
            })
        }
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl EmbeddingsProvider for FixedEmbedder {
        fn embed<'a>(
            &'a self,
            _text: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, AiLlmError>> + Send + 'a>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let v = self.vector.clone();
            Box::pin(async move { Ok(v) })
        }
    }

    /// Embedder that always fails.
    struct FailingEmbedder;

    impl EmbeddingsProvider for FailingEmbedder {
        fn embed<'a>(
            &'a self,
            _text: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, AiLlmError>> + Send + 'a>> {
            Box::pin(async { Err(AiLlmError::EmbeddingsUnavailable) })
        }
    }

    /// Verifier returning a fixed reply (or error), counting calls.
    struct StaticVerifier {
        reply: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl StaticVerifier {
        fn replying(reply: &'static str) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(reply),
                calls: AtomicUsize::new(0),
            })
        }
        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: None,
                calls: AtomicUsize::new(0),
            })
        }
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Verifier for StaticVerifier {
        fn verify<'a>(
            &'a self,
            _prompt: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<String, AiLlmError>> + Send + 'a>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let reply = self.reply;
            Box::pin(async move {
                match reply {
                    Some(r) => Ok(r.to_string()),
                    None => Err(AiLlmError::EmbeddingsUnavailable),
                }
            })
        }
    }

    fn paul_router(threshold: f32) -> Arc<SemanticRouter> {
        Arc::new(SemanticRouter {
            threshold,
            entries: vec![Exemplar {
                route: "paul",
                vector: vec![1.0, 0.0],
            }],
        })
    }

    fn empty_router() -> Arc<SemanticRouter> {
        Arc::new(SemanticRouter {
            threshold: 0.75,
            entries: vec![],
        })
    }

    #[tokio::test]
    async fn keyword_short_circuits_query() {
        let embedder = FixedEmbedder::new(vec![1.0, 0.0]);
        let verifier = StaticVerifier::replying("NO");
        let clf = RelevanceClassifier::new(
            PAUL_ALLEN,
            paul_router(0.75),
            embedder.clone(),
            verifier.clone(),
        );

        let v = clf.classify_query("Who is PAUL ALLEN?").await;
        assert!(v.related);
        assert_eq!(v.signal, Signal::Keyword);
        assert_eq!(verifier.calls(), 0);
        assert_eq!(embedder.calls(), 0);
    }

    #[tokio::test]
    async fn route_match_overrides_llm_no() {
        // Query embeds onto the exemplar exactly, so the route matches even
        // though the verifier votes NO.
        let embedder = FixedEmbedder::new(vec![1.0, 0.0]);
        let verifier = StaticVerifier::replying("NO");
        let clf = RelevanceClassifier::new(
            PAUL_ALLEN,
            paul_router(0.75),
            embedder,
            verifier.clone(),
        );

        let v = clf.classify_query("the co-founder's yacht").await;
        assert!(v.related);
        assert_eq!(v.signal, Signal::Route);
        assert_eq!(verifier.calls(), 1, "llm stage is still computed");
    }

    #[tokio::test]
    async fn llm_yes_admits_when_route_misses() {
        let embedder = FixedEmbedder::new(vec![0.0, 1.0]); // orthogonal to exemplar
        let verifier = StaticVerifier::replying("YES");
        let clf =
            RelevanceClassifier::new(PAUL_ALLEN, paul_router(0.75), embedder, verifier);

        let v = clf.classify_query("what about the seattle seahawks owner").await;
        assert!(v.related);
        assert_eq!(v.signal, Signal::Llm);
    }

    #[tokio::test]
    async fn double_no_refuses_query() {
        let embedder = FixedEmbedder::new(vec![0.0, 1.0]);
        let verifier = StaticVerifier::replying("NO");
        let clf =
            RelevanceClassifier::new(PAUL_ALLEN, paul_router(0.75), embedder, verifier);

        let v = clf.classify_query("What is the capital of France?").await;
        assert!(!v.related);
    }

    #[tokio::test]
    async fn verifier_error_fails_open() {
        let embedder = FixedEmbedder::new(vec![0.0, 1.0]);
        let verifier = StaticVerifier::failing();
        let clf =
            RelevanceClassifier::new(PAUL_ALLEN, paul_router(0.75), embedder, verifier);

        let v = clf.classify_query("anything at all").await;
        assert!(v.related);
        assert_eq!(v.signal, Signal::FailOpen);
    }

    #[tokio::test]
    async fn embedder_error_fails_open_despite_llm_no() {
        let verifier = StaticVerifier::replying("NO");
        let clf = RelevanceClassifier::new(
            PAUL_ALLEN,
            paul_router(0.75),
            Arc::new(FailingEmbedder),
            verifier,
        );

        let v = clf.classify_query("off topic text").await;
        assert!(v.related);
        assert_eq!(v.signal, Signal::FailOpen);
    }

    #[tokio::test]
    async fn empty_query_falls_through_to_verifier() {
        let embedder = FixedEmbedder::new(vec![0.0, 1.0]);
        let verifier = StaticVerifier::replying("YES");
        let clf = RelevanceClassifier::new(
            PAUL_ALLEN,
            empty_router(),
            embedder,
            verifier.clone(),
        );

        let v = clf.classify_query("").await;
        assert!(v.related);
        assert_eq!(verifier.calls(), 1);
    }

    #[tokio::test]
    async fn answer_keyword_skips_verifier() {
        let embedder = FixedEmbedder::new(vec![1.0, 0.0]);
        let verifier = StaticVerifier::replying("NO");
        let clf = RelevanceClassifier::new(
            PAUL_ALLEN,
            paul_router(0.75),
            embedder,
            verifier.clone(),
        );

        let v = clf
            .classify_answer("Paul Allen co-founded Microsoft with Bill Gates.")
            .await;
        assert!(v.related);
        assert_eq!(v.signal, Signal::Keyword);
        assert_eq!(verifier.calls(), 0);
    }

    #[tokio::test]
    async fn answer_mode_never_touches_the_router() {
        // Even with an exemplar that would match everything, answers are
        // judged by keyword + verifier only.
        let embedder = FixedEmbedder::new(vec![1.0, 0.0]);
        let verifier = StaticVerifier::replying("NO");
        let clf = RelevanceClassifier::new(
            PAUL_ALLEN,
            paul_router(0.0),
            embedder.clone(),
            verifier.clone(),
        );

        let v = clf.classify_answer("The capital of France is Paris.").await;
        assert!(!v.related);
        assert_eq!(embedder.calls(), 0, "no embedding in answer mode");
        assert_eq!(verifier.calls(), 1);
    }

    #[tokio::test]
    async fn answer_verifier_error_fails_open() {
        let embedder = FixedEmbedder::new(vec![0.0, 1.0]);
        let verifier = StaticVerifier::failing();
        let clf =
            RelevanceClassifier::new(PAUL_ALLEN, paul_router(0.75), embedder, verifier);

        let v = clf.classify_answer("some answer text").await;
        assert!(v.related);
        assert_eq!(v.signal, Signal::FailOpen);
    }

    #[tokio::test]
    async fn rambling_verifier_reply_counts_as_related() {
        let embedder = FixedEmbedder::new(vec![0.0, 1.0]);
        let verifier = StaticVerifier::replying("Well, probably NO, but hard to say.");
        let clf =
            RelevanceClassifier::new(PAUL_ALLEN, paul_router(0.75), embedder, verifier);

        let v = clf.classify_answer("something vague").await;
        assert!(v.related);
    }
}
