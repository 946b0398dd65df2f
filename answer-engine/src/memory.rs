//! Token-bounded conversation memory.
//!
//! Owned by exactly one session: an ordered list of prior turns, evicting the
//! oldest when the estimated token total exceeds the budget. Token counts use
//! a chars/4 heuristic; the budget only needs to keep prompts inside the
//! model window, not match the tokenizer exactly.

use std::collections::VecDeque;

use ai_llm_service::{ChatMessage, ChatRole};
use tracing::debug;

/// Default token budget for one session's history.
pub const DEFAULT_TOKEN_LIMIT: usize = 3900;

/// Bounded recent-turn context carried across one session's messages.
#[derive(Debug)]
pub struct ChatMemoryBuffer {
    turns: VecDeque<ChatMessage>,
    token_limit: usize,
}

impl ChatMemoryBuffer {
    /// Creates an empty buffer with the given token budget.
    pub fn new(token_limit: usize) -> Self {
        Self {
            turns: VecDeque::new(),
            token_limit,
        }
    }

    /// Creates a buffer with the budget from `MEMORY_TOKEN_LIMIT` (default
    /// [`DEFAULT_TOKEN_LIMIT`]).
    pub fn from_env() -> Self {
        let limit = std::env::var("MEMORY_TOKEN_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TOKEN_LIMIT);
        Self::new(limit)
    }

    /// Appends a user/assistant exchange and evicts old turns if the budget
    /// is exceeded.
    pub fn record_exchange(&mut self, query: &str, answer: &str) {
        self.turns.push_back(ChatMessage::user(query));
        self.turns.push_back(ChatMessage::assistant(answer));
        self.evict();
    }

    /// Prior turns in chronological order.
    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.turns.iter()
    }

    /// Number of stored turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// True when no turns are stored.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Estimated token total of all stored turns.
    pub fn token_estimate(&self) -> usize {
        self.turns.iter().map(|m| estimate_tokens(&m.content)).sum()
    }

    /// Drops oldest turns until the estimate fits the budget. An orphaned
    /// assistant turn at the front is dropped with its exchange.
    fn evict(&mut self) {
        let before = self.turns.len();
        while self.token_estimate() > self.token_limit && !self.turns.is_empty() {
            self.turns.pop_front();
            if self
                .turns
                .front()
                .is_some_and(|m| m.role == ChatRole::Assistant)
            {
                self.turns.pop_front();
            }
        }
        let dropped = before - self.turns.len();
        if dropped > 0 {
            debug!(
                dropped,
                remaining = self.turns.len(),
                "evicted old turns from conversation memory"
            );
        }
    }
}

/// Rough token estimate: one token per 4 characters, rounded up.
fn estimate_tokens(text: &str) -> usize {
    text.len().div_ceil(4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exchanges_keep_chronological_order() {
        let mut mem = ChatMemoryBuffer::new(1000);
        mem.record_exchange("q1", "a1");
        mem.record_exchange("q2", "a2");

        let contents: Vec<&str> = mem.messages().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["q1", "a1", "q2", "a2"]);
    }

    #[test]
    fn eviction_drops_oldest_exchange_first() {
        // ~5 tokens per message, 4 messages per exchange-pair push.
        let mut mem = ChatMemoryBuffer::new(12);
        mem.record_exchange("aaaaaaaaaaaaaaaaaaaa", "bbbbbbbbbbbbbbbbbbbb"); // 5 + 5
        mem.record_exchange("cccccccccccccccccccc", "dddddddddddddddddddd"); // over budget

        let contents: Vec<&str> = mem.messages().map(|m| m.content.as_str()).collect();
        assert_eq!(
            contents,
            vec!["cccccccccccccccccccc", "dddddddddddddddddddd"]
        );
        assert!(mem.token_estimate() <= 12);
    }

    #[test]
    fn front_never_starts_with_assistant_after_eviction() {
        let mut mem = ChatMemoryBuffer::new(9);
        mem.record_exchange("aaaaaaaaaaaaaaaaaaaa", "bbbbbbbbbbbbbbbbbbbb");
        mem.record_exchange("short", "reply");

        assert!(
            mem.messages()
                .next()
                .is_none_or(|m| m.role == ChatRole::User)
        );
    }

    #[test]
    fn token_estimate_rounds_up() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abc"), 1);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
    }
}
