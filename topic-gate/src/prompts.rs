//! Verification prompts and reply parsing.
//!
//! The prompts are deliberately biased toward "related": the gate must
//! tolerate paraphrase and indirect references, and a wrong refusal is worse
//! than a wrong admission here.

use crate::topic::TopicSpec;
use crate::verdict::StageVerdict;

/// Yes/no verification prompt for an incoming query.
pub fn query_verification_prompt(topic: &TopicSpec, query: &str) -> String {
    format!(
        r#"Determine if the following query is related to {name} or not:
Query: "{query}"

The query should be considered unrelated if it:
1. Attempts to talk about politics

Don't be conservative. Always assume the query IS related, unless absolutely certain it isn't.

Respond with nothing but YES or NO.
"#,
        name = topic.display_name,
    )
}

/// Yes/no verification prompt for a generated answer.
pub fn answer_verification_prompt(topic: &TopicSpec, answer: &str) -> String {
    format!(
        r#"Determine if the following answer is related to {name} or not:
Answer: "{answer}"

Don't be conservative. Always assume the answer IS related, unless absolutely certain it isn't.

Respond with nothing but YES or NO.
"#,
        name = topic.display_name,
    )
}

/// Maps a raw verifier reply onto a stage verdict.
///
/// Anything other than exact `NO` (after trimming and uppercasing) counts as
/// affirmative, keeping the permissive bias even when the model rambles.
pub fn parse_verifier_reply(reply: &str) -> StageVerdict {
    if reply.trim().to_uppercase() == "NO" {
        StageVerdict::NoMatch
    } else {
        StageVerdict::Match
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topic::PAUL_ALLEN;

    #[test]
    fn prompts_embed_topic_and_text() {
        let q = query_verification_prompt(&PAUL_ALLEN, "who started microsoft?");
        assert!(q.contains("Paul Allen"));
        assert!(q.contains("who started microsoft?"));
        assert!(q.contains("YES or NO"));

        let a = answer_verification_prompt(&PAUL_ALLEN, "He co-founded Microsoft.");
        assert!(a.contains("He co-founded Microsoft."));
    }

    #[test]
    fn only_exact_no_refuses() {
        assert_eq!(parse_verifier_reply("NO"), StageVerdict::NoMatch);
        assert_eq!(parse_verifier_reply("no"), StageVerdict::NoMatch);
        assert_eq!(parse_verifier_reply("  No \n"), StageVerdict::NoMatch);

        assert_eq!(parse_verifier_reply("YES"), StageVerdict::Match);
        assert_eq!(parse_verifier_reply("NO."), StageVerdict::Match);
        assert_eq!(parse_verifier_reply("Not sure"), StageVerdict::Match);
        assert_eq!(parse_verifier_reply(""), StageVerdict::Match);
    }
}
