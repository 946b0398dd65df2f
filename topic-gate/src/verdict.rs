//! Typed verdicts produced by the gating pipeline.

/// Which stage produced the final verdict. Used for logging/debugging only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Literal keyword fast-path.
    Keyword,
    /// Semantic route match.
    Route,
    /// LLM yes/no verification.
    Llm,
    /// A stage failed and the configured fail-open default applied.
    FailOpen,
}

/// Outcome of a single classifier stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageVerdict {
    /// The stage positively identified the text as on-topic.
    Match,
    /// The stage positively identified the text as off-topic.
    NoMatch,
    /// The stage could not decide (infrastructure failure or missing data).
    Inconclusive,
}

/// Final classification result for one text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelevanceVerdict {
    /// Whether the text is considered on-topic.
    pub related: bool,
    /// The signal that produced the decision.
    pub signal: Signal,
}

impl RelevanceVerdict {
    /// On-topic verdict from the given signal.
    pub fn related(signal: Signal) -> Self {
        Self {
            related: true,
            signal,
        }
    }

    /// Off-topic verdict from the given signal.
    pub fn unrelated(signal: Signal) -> Self {
        Self {
            related: false,
            signal,
        }
    }
}
