//! RAG answering pipeline with bounded conversation memory.
//!
//! Public surface: [`AnswerEngine`] (embed the query, retrieve top-K context
//! from the vector index, build a compact prompt, chat via the answer
//! profile) plus the [`Answerer`] trait the session controller depends on,
//! and [`ChatMemoryBuffer`], the per-session token-bounded turn history.

mod api_types;
mod engine;
mod error;
mod memory;
mod prompt;

pub use api_types::{AnswerOptions, QaAnswer, UsedChunk};
pub use engine::{AnswerEngine, Answerer, EngineConfig};
pub use error::AnswerEngineError;
pub use memory::ChatMemoryBuffer;
pub use prompt::{DEFAULT_SYSTEM, build_user_prompt};
