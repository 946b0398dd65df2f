//! Per-message state machine.
//!
//! Flow: classify query → answer → classify answer → deliver, with a refusal
//! exit from either classification and an error exit from any step. Refusals
//! always render the same fixed text; errors are reported to the user once
//! and then re-raised for operator-side logging.

use tracing::{debug, error, info};

use crate::error::SessionError;
use crate::frontend::ChatFrontend;
use crate::messages::{NOT_INITIALIZED_TEXT, REFUSAL_TEXT, THINKING_TEXT};
use crate::session::SessionContext;

/// Terminal state of one processed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The generated answer was delivered to the user.
    Delivered(String),
    /// The gate refused the query or the answer.
    Refused,
    /// The session is not usable (engine missing); the user was told to
    /// restart.
    Failed,
}

/// Processes one incoming message to completion.
///
/// Classifier faults never surface here (the gate fails open internally);
/// answering faults are sent to the user as `Error: {detail}` and then
/// returned so the caller can log them. Session state stays intact either
/// way.
pub async fn handle_message(
    ctx: &mut SessionContext,
    frontend: &dyn ChatFrontend,
    query: &str,
) -> Result<TurnOutcome, SessionError> {
    let thinking = frontend.send_status(THINKING_TEXT).await;

    let query_verdict = ctx.classifier.classify_query(query).await;
    debug!(
        related = query_verdict.related,
        signal = ?query_verdict.signal,
        "query gated"
    );
    if !query_verdict.related {
        frontend.remove_status(thinking).await;
        frontend.send(REFUSAL_TEXT).await;
        info!("query refused");
        return Ok(TurnOutcome::Refused);
    }

    let Some(engine) = ctx.engine.as_ref() else {
        frontend.update_status(thinking, NOT_INITIALIZED_TEXT).await;
        error!("answer engine missing from session");
        return Ok(TurnOutcome::Failed);
    };

    let qa = match engine.answer(query, &mut ctx.memory).await {
        Ok(qa) => qa,
        Err(err) => {
            frontend.remove_status(thinking).await;
            frontend.send(&format!("Error: {err}")).await;
            error!(error = %err, "answering failed");
            return Err(err.into());
        }
    };

    let answer_verdict = ctx.classifier.classify_answer(&qa.answer).await;
    debug!(
        related = answer_verdict.related,
        signal = ?answer_verdict.signal,
        "answer gated"
    );
    if !answer_verdict.related {
        frontend.remove_status(thinking).await;
        frontend.send(REFUSAL_TEXT).await;
        info!("answer refused");
        return Ok(TurnOutcome::Refused);
    }

    frontend.remove_status(thinking).await;
    frontend.send(&qa.answer).await;
    Ok(TurnOutcome::Delivered(qa.answer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::StatusId;
    use crate::messages::REFUSAL_TEXT;

    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use ai_llm_service::{AiLlmError, EmbeddingsProvider};
    use answer_engine::{
        Answerer, AnswerEngineError, ChatMemoryBuffer, QaAnswer,
    };
    use topic_gate::{
        PAUL_ALLEN, RelevanceClassifier, Route, SemanticRouter, Verifier, route_table,
    };

    /* ---------------- frontend recorder ---------------- */

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Message(String),
        Status(StatusId, String),
        StatusUpdate(StatusId, String),
        StatusRemoved(StatusId),
    }

    #[derive(Default)]
    struct RecordingFrontend {
        events: Mutex<Vec<Event>>,
        next_id: AtomicU64,
    }

    impl RecordingFrontend {
        fn messages(&self) -> Vec<String> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .filter_map(|e| match e {
                    Event::Message(m) => Some(m.clone()),
                    _ => None,
                })
                .collect()
        }

        fn open_statuses(&self) -> Vec<(StatusId, String)> {
            let events = self.events.lock().unwrap();
            let mut open: Vec<(StatusId, String)> = Vec::new();
            for e in events.iter() {
                match e {
                    Event::Status(id, content) => open.push((*id, content.clone())),
                    Event::StatusUpdate(id, content) => {
                        if let Some(s) = open.iter_mut().find(|(sid, _)| sid == id) {
                            s.1 = content.clone();
                        }
                    }
                    Event::StatusRemoved(id) => open.retain(|(sid, _)| sid != id),
                    Event::Message(_) => {}
                }
            }
            open
        }
    }

    impl ChatFrontend for RecordingFrontend {
        fn send<'a>(&'a self, content: &'a str) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
            self.events
                .lock()
                .unwrap()
                .push(Event::Message(content.to_string()));
            Box::pin(async {})
        }

        fn send_status<'a>(
            &'a self,
            content: &'a str,
        ) -> Pin<Box<dyn Future<Output = StatusId> + Send + 'a>> {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            self.events
                .lock()
                .unwrap()
                .push(Event::Status(id, content.to_string()));
            Box::pin(async move { id })
        }

        fn update_status<'a>(
            &'a self,
            id: StatusId,
            content: &'a str,
        ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
            self.events
                .lock()
                .unwrap()
                .push(Event::StatusUpdate(id, content.to_string()));
            Box::pin(async {})
        }

        fn remove_status<'a>(
            &'a self,
            id: StatusId,
        ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
            self.events
                .lock()
                .unwrap()
                .push(Event::StatusRemoved(id));
            Box::pin(async {})
        }
    }

    /* ---------------- classifier stubs ---------------- */

    struct FixedEmbedder;

    impl EmbeddingsProvider for FixedEmbedder {
        fn embed<'a>(
            &'a self,
            _text: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, AiLlmError>> + Send + 'a>> {
            Box::pin(async { Ok(vec![1.0, 0.0]) })
        }
    }

    struct StaticVerifier {
        reply: &'static str,
        calls: AtomicUsize,
    }

    impl StaticVerifier {
        fn new(reply: &'static str) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl Verifier for StaticVerifier {
        fn verify<'a>(
            &'a self,
            _prompt: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<String, AiLlmError>> + Send + 'a>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let reply = self.reply;
            Box::pin(async move { Ok(reply.to_string()) })
        }
    }

    /// Classifier whose router matches everything (all exemplars and inputs
    /// embed to the same vector).
    async fn admit_all_classifier(verifier_reply: &'static str) -> RelevanceClassifier {
        let router = SemanticRouter::build(route_table(), &FixedEmbedder, 0.75)
            .await
            .unwrap();
        RelevanceClassifier::new(
            PAUL_ALLEN,
            Arc::new(router),
            Arc::new(FixedEmbedder),
            StaticVerifier::new(verifier_reply),
        )
    }

    /// Classifier with an empty route table, so only keyword and verifier
    /// decide.
    async fn strict_classifier(verifier_reply: &'static str) -> RelevanceClassifier {
        let no_routes: &[Route] = &[];
        let router = SemanticRouter::build(no_routes, &FixedEmbedder, 0.75)
            .await
            .unwrap();
        RelevanceClassifier::new(
            PAUL_ALLEN,
            Arc::new(router),
            Arc::new(FixedEmbedder),
            StaticVerifier::new(verifier_reply),
        )
    }

    /* ---------------- answerer stub ---------------- */

    struct StubAnswerer {
        reply: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl StubAnswerer {
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

    /// Local newtype so a `dyn Answerer` can be handed to the controller
    /// while the test keeps an `Arc<StubAnswerer>` handle to inspect. A bare
    /// `impl Answerer for Arc<StubAnswerer>` would violate the orphan rule
    /// (both the trait and `Arc` are foreign to this crate).
    #[derive(Clone)]
    struct SharedStub(Arc<StubAnswerer>);

    impl Answerer for SharedStub {
        fn answer<'a>(
            &'a self,
            query: &'a str,
            memory: &'a mut ChatMemoryBuffer,
        ) -> Pin<Box<dyn Future<Output = Result<QaAnswer, AnswerEngineError>> + Send + 'a>>
        {
            self.0.calls.fetch_add(1, Ordering::SeqCst);
            let reply = self.0.reply;
            Box::pin(async move {
                match reply {
                    Some(r) => {
                        memory.record_exchange(query, r);
                        Ok(QaAnswer {
                            answer: r.to_string(),
                            context: vec![],
                        })
                    }
                    None => Err(AnswerEngineError::Llm(AiLlmError::EmbeddingsUnavailable)),
                }
            })
        }
    }

    fn ctx(classifier: RelevanceClassifier, engine: Option<Box<dyn Answerer>>) -> SessionContext {
        SessionContext {
            memory: ChatMemoryBuffer::new(3900),
            classifier,
            engine,
        }
    }

    /* ---------------- tests ---------------- */

    #[tokio::test]
    async fn on_topic_query_is_answered_and_delivered() {
        let answerer = StubAnswerer::replying("Paul Allen co-founded Microsoft in 1975.");
        let mut ctx = ctx(
            strict_classifier("NO").await,
            Some(Box::new(SharedStub(answerer.clone()))),
        );
        let frontend = RecordingFrontend::default();

        let out = handle_message(&mut ctx, &frontend, "Who is Paul Allen?")
            .await
            .unwrap();

        assert!(matches!(out, TurnOutcome::Delivered(_)));
        assert_eq!(
            frontend.messages(),
            vec!["Paul Allen co-founded Microsoft in 1975.".to_string()]
        );
        assert!(frontend.open_statuses().is_empty(), "thinking was discarded");
        assert_eq!(answerer.calls(), 1);
    }

    #[tokio::test]
    async fn off_topic_query_refuses_and_never_answers() {
        let answerer = StubAnswerer::replying("unused");
        let mut ctx = ctx(
            strict_classifier("NO").await,
            Some(Box::new(SharedStub(answerer.clone()))),
        );
        let frontend = RecordingFrontend::default();

        let out = handle_message(&mut ctx, &frontend, "What is the capital of France?")
            .await
            .unwrap();

        assert_eq!(out, TurnOutcome::Refused);
        assert_eq!(frontend.messages(), vec![REFUSAL_TEXT.to_string()]);
        assert_eq!(answerer.calls(), 0, "answerer must never be invoked");
        assert!(frontend.open_statuses().is_empty());
    }

    #[tokio::test]
    async fn off_topic_answer_gets_the_same_refusal_text() {
        // Query passes the keyword gate; the generated answer drifts off
        // topic and the verifier votes NO on it.
        let answerer = StubAnswerer::replying("The capital of France is Paris.");
        let mut ctx = ctx(
            strict_classifier("NO").await,
            Some(Box::new(SharedStub(answerer.clone()))),
        );
        let frontend = RecordingFrontend::default();

        let out = handle_message(&mut ctx, &frontend, "paul allen question")
            .await
            .unwrap();

        assert_eq!(out, TurnOutcome::Refused);
        assert_eq!(frontend.messages(), vec![REFUSAL_TEXT.to_string()]);
        assert!(
            !frontend
                .messages()
                .iter()
                .any(|m| m.contains("Paris")),
            "generated answer must never be emitted"
        );
    }

    #[tokio::test]
    async fn route_match_admits_even_when_verifier_says_no() {
        // No keyword in the query and a NO-voting verifier; only the route
        // match lets this through. The answer passes on its keyword.
        let answerer = StubAnswerer::replying("Paul Allen owned the Seattle Seahawks.");
        let mut ctx = ctx(
            admit_all_classifier("NO").await,
            Some(Box::new(SharedStub(answerer.clone()))),
        );
        let frontend = RecordingFrontend::default();

        let out = handle_message(&mut ctx, &frontend, "tell me about the seahawks owner")
            .await
            .unwrap();

        assert!(matches!(out, TurnOutcome::Delivered(_)));
        assert_eq!(answerer.calls(), 1);
    }

    #[tokio::test]
    async fn missing_engine_turns_thinking_into_restart_instruction() {
        let mut ctx = ctx(strict_classifier("YES").await, None);
        let frontend = RecordingFrontend::default();

        let out = handle_message(&mut ctx, &frontend, "Who is Paul Allen?")
            .await
            .unwrap();

        assert_eq!(out, TurnOutcome::Failed);
        assert!(frontend.messages().is_empty());
        let open = frontend.open_statuses();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].1, NOT_INITIALIZED_TEXT);
    }

    #[tokio::test]
    async fn answerer_error_is_reported_then_reraised() {
        let answerer = StubAnswerer::failing();
        let mut ctx = ctx(
            strict_classifier("YES").await,
            Some(Box::new(SharedStub(answerer.clone()))),
        );
        let frontend = RecordingFrontend::default();

        let result = handle_message(&mut ctx, &frontend, "Who is Paul Allen?").await;

        assert!(result.is_err(), "error must propagate upstream");
        let messages = frontend.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("Error: "));
        assert!(frontend.open_statuses().is_empty());
    }

    #[tokio::test]
    async fn repeated_queries_keep_memory_ordering() {
        let answerer = StubAnswerer::replying("Paul Allen founded Vulcan Inc.");
        let mut ctx = ctx(
            strict_classifier("YES").await,
            Some(Box::new(SharedStub(answerer.clone()))),
        );
        let frontend = RecordingFrontend::default();

        for _ in 0..2 {
            let out = handle_message(&mut ctx, &frontend, "Who is Paul Allen?")
                .await
                .unwrap();
            assert!(matches!(out, TurnOutcome::Delivered(_)));
        }

        let contents: Vec<&str> = ctx.memory.messages().map(|m| m.content.as_str()).collect();
        assert_eq!(
            contents,
            vec![
                "Who is Paul Allen?",
                "Paul Allen founded Vulcan Inc.",
                "Who is Paul Allen?",
                "Paul Allen founded Vulcan Inc.",
            ]
        );
    }
}
