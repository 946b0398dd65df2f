//! Shared LLM service with three active profiles: `answer`, `verification`,
//! and `embedding`.
//!
//! The crate wraps two chat-completion backends (local Ollama and the OpenAI
//! API) behind one configuration type, exposes a profile bundle suited for a
//! grounded question-answering pipeline (a low-temperature answer model, a
//! deterministic yes/no verification model, and an embedding model), and
//! ships the supporting pieces: unified errors, health probes, and a
//! crate-scoped tracing layer.

pub mod chat;
pub mod config;
pub mod embed;
pub mod error_handler;
pub mod health_service;
pub mod service_profiles;
pub mod services;
pub mod telemetry;

pub use chat::{ChatMessage, ChatRole};
pub use config::llm_model_config::LlmModelConfig;
pub use config::llm_provider::LlmProvider;
pub use embed::{EmbeddingsProvider, NoopEmbedder};
pub use error_handler::{AiLlmError, ConfigError, Result};
pub use service_profiles::LlmServiceProfiles;
