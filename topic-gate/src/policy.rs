//! Explicit combination policy for stage verdicts.
//!
//! The pipeline computes the route and llm stages independently for queries
//! and OR-s them here; only the keyword stage (handled in the classifier)
//! short-circuits. Stage failures surface as `Inconclusive` and resolve to
//! the configured default, making the fail-open behavior a visible knob
//! instead of hidden control flow.

use crate::verdict::{RelevanceVerdict, Signal, StageVerdict};

/// Configuration for resolving inconclusive stages.
#[derive(Debug, Clone, Copy)]
pub struct GatePolicy {
    /// When true, an undecidable classification admits the text.
    pub fail_open: bool,
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self { fail_open: true }
    }
}

impl GatePolicy {
    /// Verdict applied when no stage could decide.
    pub fn resolve_inconclusive(&self) -> RelevanceVerdict {
        RelevanceVerdict {
            related: self.fail_open,
            signal: Signal::FailOpen,
        }
    }
}

/// Combines the query-mode stages: route match OR llm says related.
///
/// Both inputs were computed (never short-circuited against each other); a
/// refusal requires both stages to positively say off-topic.
pub fn combine_query(
    route: StageVerdict,
    llm: StageVerdict,
    policy: GatePolicy,
) -> RelevanceVerdict {
    match (route, llm) {
        (StageVerdict::Match, _) => RelevanceVerdict::related(Signal::Route),
        (_, StageVerdict::Match) => RelevanceVerdict::related(Signal::Llm),
        (StageVerdict::NoMatch, StageVerdict::NoMatch) => {
            RelevanceVerdict::unrelated(Signal::Llm)
        }
        _ => policy.resolve_inconclusive(),
    }
}

/// Combines the answer-mode stage: only the llm verdict is consulted (the
/// semantic route is intentionally not applied to answers).
pub fn combine_answer(llm: StageVerdict, policy: GatePolicy) -> RelevanceVerdict {
    match llm {
        StageVerdict::Match => RelevanceVerdict::related(Signal::Llm),
        StageVerdict::NoMatch => RelevanceVerdict::unrelated(Signal::Llm),
        StageVerdict::Inconclusive => policy.resolve_inconclusive(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use StageVerdict::*;

    const POLICY: GatePolicy = GatePolicy { fail_open: true };

    #[test]
    fn route_match_wins_over_llm_no() {
        let v = combine_query(Match, NoMatch, POLICY);
        assert!(v.related);
        assert_eq!(v.signal, Signal::Route);
    }

    #[test]
    fn llm_match_wins_over_route_no() {
        let v = combine_query(NoMatch, Match, POLICY);
        assert!(v.related);
        assert_eq!(v.signal, Signal::Llm);
    }

    #[test]
    fn double_no_refuses() {
        let v = combine_query(NoMatch, NoMatch, POLICY);
        assert!(!v.related);
    }

    #[test]
    fn inconclusive_fails_open() {
        for (route, llm) in [
            (Inconclusive, NoMatch),
            (NoMatch, Inconclusive),
            (Inconclusive, Inconclusive),
        ] {
            let v = combine_query(route, llm, POLICY);
            assert!(v.related, "{route:?}/{llm:?} must fail open");
            assert_eq!(v.signal, Signal::FailOpen);
        }
    }

    #[test]
    fn closed_policy_refuses_inconclusive() {
        let closed = GatePolicy { fail_open: false };
        let v = combine_query(Inconclusive, Inconclusive, closed);
        assert!(!v.related);
    }

    #[test]
    fn answer_mode_table() {
        assert!(combine_answer(Match, POLICY).related);
        assert!(!combine_answer(NoMatch, POLICY).related);
        assert!(combine_answer(Inconclusive, POLICY).related);
    }
}
