//! Per-session state.

use answer_engine::{Answerer, ChatMemoryBuffer};
use topic_gate::RelevanceClassifier;

/// Everything one chat session owns.
///
/// Created by [`crate::start_session`], dropped at session end. No state in
/// here is shared between sessions; the classifier and engine only hold
/// `Arc`s to read-only collaborators.
pub struct SessionContext {
    /// Bounded turn history, exclusive to this session.
    pub memory: ChatMemoryBuffer,
    /// Topic gate applied to queries and answers.
    pub classifier: RelevanceClassifier,
    /// The answering pipeline; `None` until setup has run.
    pub engine: Option<Box<dyn Answerer>>,
}
