//! Prompt builder: short system message + compact context block.

use rag_index::ContextHit;

/// Default system instructions for grounded answers.
///
/// Keep this short: it consistently improves steering without wasting tokens.
pub const DEFAULT_SYSTEM: &str = r#"
You are a helpful assistant answering questions about Paul Allen.
Use the provided context as ground truth; if it is insufficient, say so.
Stay on the topic of Paul Allen.
"#;

/// Build the final user prompt with a labeled context section and char
/// budget.
///
/// The function compacts the context into at most `max_chars`, preserving
/// the ranking order. For each hit, it shows a header with title and source,
/// then the chunk text.
///
/// # Example
/// ```
/// # use rag_index::ContextHit;
/// # use answer_engine::build_user_prompt;
/// let hits: Vec<ContextHit> = vec![];
/// let prompt = build_user_prompt("Who is Paul Allen?", &hits, 2000);
/// assert!(prompt.contains("Question:"));
/// ```
pub fn build_user_prompt(question: &str, hits: &[ContextHit], max_chars: usize) -> String {
    let mut out = String::new();
    out.push_str("Question:\n");
    out.push_str(question.trim());
    out.push_str("\n\n");

    if !hits.is_empty() {
        out.push_str("Context (top-ranked):\n");
        let mut budget = max_chars;

        for (i, h) in hits.iter().enumerate() {
            let header = format!(
                "==[{}]== {} :: {} (score {:.3})\n",
                i + 1,
                h.title.as_deref().unwrap_or(""),
                h.source.as_deref().unwrap_or(""),
                h.score
            );
            let text = h.text.trim();

            // stop if we exceed budget
            if header.len() >= budget {
                break;
            }
            out.push_str(&header);
            budget -= header.len();

            let take = budget.saturating_sub(2);
            if text.len() > take {
                out.push_str(safe_truncate(text, take));
                out.push_str("\n…\n");
                break;
            } else {
                out.push_str(text);
                out.push('\n');
                budget -= text.len() + 1;
            }
        }
        out.push('\n');
        out.push_str("Answer using only the context above when possible.\n");
    }

    out
}

fn safe_truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        s
    } else {
        let mut end = max;
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        &s[..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hit(title: &str, text: &str, score: f32) -> ContextHit {
        ContextHit::from_payload(
            score,
            json!({ "title": title, "text": text, "source": "wiki" }),
        )
    }

    #[test]
    fn prompt_without_context_is_just_the_question() {
        let p = build_user_prompt("Who is Paul Allen?", &[], 1000);
        assert!(p.starts_with("Question:\nWho is Paul Allen?"));
        assert!(!p.contains("Context"));
    }

    #[test]
    fn hits_appear_in_ranking_order() {
        let hits = vec![hit("A", "first chunk", 0.9), hit("B", "second chunk", 0.8)];
        let p = build_user_prompt("q", &hits, 1000);
        let a = p.find("first chunk").unwrap();
        let b = p.find("second chunk").unwrap();
        assert!(a < b);
        assert!(p.contains("==[1]== A :: wiki"));
    }

    #[test]
    fn budget_truncates_long_context() {
        let hits = vec![hit("A", &"x".repeat(5000), 0.9), hit("B", "tail", 0.8)];
        let p = build_user_prompt("q", &hits, 300);
        assert!(p.len() < 600);
        assert!(p.contains('…'));
        assert!(!p.contains("tail"), "second hit must not fit");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        // Multi-byte chars at the cut point must not panic.
        let hits = vec![hit("A", &"é".repeat(400), 0.9)];
        let p = build_user_prompt("q", &hits, 120);
        assert!(!p.is_empty());
    }
}
