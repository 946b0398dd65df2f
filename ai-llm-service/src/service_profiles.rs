//! Shared LLM service with three active profiles: `answer`, `verification`,
//! and `embedding`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Caches underlying HTTP clients per config (endpoint+model+key+timeout).
//! - Provides convenience methods to chat via the answer profile, run
//!   deterministic yes/no checks via the verification profile, and compute
//!   embeddings.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::chat::ChatMessage;
//! use ai_llm_service::config::llm_model_config::LlmModelConfig;
//! use ai_llm_service::config::llm_provider::LlmProvider;
//! use ai_llm_service::service_profiles::LlmServiceProfiles;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let answer = LlmModelConfig {
//!         provider: LlmProvider::Ollama,
//!         model: "qwen3:14b".into(),
//!         endpoint: "http://localhost:11434".into(),
//!         api_key: None,
//!         max_tokens: Some(512),
//!         temperature: Some(0.1),
//!         top_p: None,
//!         timeout_secs: Some(60),
//!     };
//!     let verification = LlmModelConfig { temperature: Some(0.0), ..answer.clone() };
//!     let embedding = LlmModelConfig { ..answer.clone() };
//!
//!     let svc = Arc::new(LlmServiceProfiles::new(answer, verification, embedding, Some(10))?);
//!
//!     let txt = svc.chat_answer(&[ChatMessage::user("Hello")]).await?;
//!     println!("ANSWER: {}", txt);
//!
//!     let emb = svc.embed("Paul Allen").await?;
//!     println!("Embedding dim = {}", emb.len());
//!
//!     Ok(())
//! }
//! ```

use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;

use crate::chat::ChatMessage;
use crate::config::{default_config, llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
use crate::error_handler::AiLlmError;
use crate::health_service::{HealthService, HealthStatus};
use crate::services::{ollama_service::OllamaService, open_ai_service::OpenAiService};

/// Shared service that manages three logical LLM profiles: **answer**,
/// **verification**, and **embedding**.
///
/// Internally, it caches Ollama/OpenAI clients keyed by their configuration
/// to avoid recreating HTTP clients on each call.
pub struct LlmServiceProfiles {
    answer: LlmModelConfig,
    verification: LlmModelConfig,
    embedding: LlmModelConfig,

    ollama: RwLock<HashMap<ClientKey, Arc<OllamaService>>>,
    openai: RwLock<HashMap<ClientKey, Arc<OpenAiService>>>,

    health: HealthService,
}

impl LlmServiceProfiles {
    /// Creates a new service with three profiles.
    ///
    /// - `answer`: profile used for grounded answer generation.
    /// - `verification`: deterministic profile for yes/no checks.
    /// - `embedding`: profile for embedding computation.
    /// - `health_timeout_secs`: optional timeout for the health checker.
    pub fn new(
        answer: LlmModelConfig,
        verification: LlmModelConfig,
        embedding: LlmModelConfig,
        health_timeout_secs: Option<u64>,
    ) -> Result<Self, AiLlmError> {
        Ok(Self {
            answer,
            verification,
            embedding,
            ollama: RwLock::new(HashMap::new()),
            openai: RwLock::new(HashMap::new()),
            health: HealthService::new(health_timeout_secs)?,
        })
    }

    /// Builds the three profiles from environment variables.
    ///
    /// See [`crate::config::default_config`] for the variable list.
    pub fn from_env() -> Result<Self, AiLlmError> {
        Self::new(
            default_config::config_answer()?,
            default_config::config_verification()?,
            default_config::config_embedding()?,
            Some(10),
        )
    }

    /// Runs a chat completion over the **answer** profile.
    ///
    /// # Arguments
    /// - `messages`: full conversation (system + history + current user turn).
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if the completion fails.
    pub async fn chat_answer(&self, messages: &[ChatMessage]) -> Result<String, AiLlmError> {
        self.chat_with(&self.answer, messages).await
    }

    /// Runs a single-prompt completion over the **verification** profile.
    ///
    /// The prompt is sent as one user message; the reply is returned raw
    /// (callers own the YES/NO interpretation).
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if the completion fails.
    pub async fn verify(&self, prompt: &str) -> Result<String, AiLlmError> {
        let messages = [ChatMessage::user(prompt)];
        self.chat_with(&self.verification, &messages).await
    }

    /// Computes embeddings using the **embedding** profile.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if embedding fails.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        match self.embedding.provider {
            LlmProvider::Ollama => {
                let cli = self.get_or_init_ollama(&self.embedding).await?;
                cli.embeddings(input).await
            }
            LlmProvider::OpenAI => {
                let cli = self.get_or_init_openai(&self.embedding).await?;
                cli.embeddings(input).await
            }
        }
    }

    /// Returns a health snapshot for all distinct profiles.
    ///
    /// If two profiles share a config, that config is checked only once.
    pub async fn health_all(&self) -> Vec<HealthStatus> {
        let mut list = Vec::<LlmModelConfig>::with_capacity(3);
        list.push(self.answer.clone());
        if self.verification != self.answer {
            list.push(self.verification.clone());
        }
        if self.embedding != self.answer && self.embedding != self.verification {
            list.push(self.embedding.clone());
        }
        self.health.check_many(&list).await
    }

    /// Returns references to the current profiles
    /// `(answer, verification, embedding)`.
    pub fn profiles(&self) -> (&LlmModelConfig, &LlmModelConfig, &LlmModelConfig) {
        (&self.answer, &self.verification, &self.embedding)
    }

    /* --------------------- Internals --------------------- */

    async fn chat_with(
        &self,
        cfg: &LlmModelConfig,
        messages: &[ChatMessage],
    ) -> Result<String, AiLlmError> {
        match cfg.provider {
            LlmProvider::Ollama => {
                let cli = self.get_or_init_ollama(cfg).await?;
                cli.chat(messages).await
            }
            LlmProvider::OpenAI => {
                let cli = self.get_or_init_openai(cfg).await?;
                cli.chat(messages).await
            }
        }
    }

    async fn get_or_init_ollama(
        &self,
        cfg: &LlmModelConfig,
    ) -> Result<Arc<OllamaService>, AiLlmError> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.ollama.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let mut w = self.ollama.write().await;
        if let Some(cli) = w.get(&key) {
            return Ok(cli.clone());
        }
        let cli = Arc::new(OllamaService::new(cfg.clone())?);
        w.insert(key, cli.clone());
        Ok(cli)
    }

    async fn get_or_init_openai(
        &self,
        cfg: &LlmModelConfig,
    ) -> Result<Arc<OpenAiService>, AiLlmError> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.openai.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let mut w = self.openai.write().await;
        if let Some(cli) = w.get(&key) {
            return Ok(cli.clone());
        }
        let cli = Arc::new(OpenAiService::new(cfg.clone())?);
        w.insert(key, cli.clone());
        Ok(cli)
    }
}

/// Internal cache key to identify unique client configs.
#[derive(Clone, PartialEq, Eq, Hash)]
struct ClientKey {
    provider: LlmProvider,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Option<u64>,
}

impl From<&LlmModelConfig> for ClientKey {
    fn from(cfg: &LlmModelConfig) -> Self {
        Self {
            provider: cfg.provider,
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            api_key: cfg.api_key.clone(),
            timeout: cfg.timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(model: &str, temperature: f32) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: model.into(),
            endpoint: "http://localhost:11434".into(),
            api_key: None,
            max_tokens: None,
            temperature: Some(temperature),
            top_p: None,
            timeout_secs: Some(30),
        }
    }

    #[test]
    fn profiles_are_kept_apart() {
        let svc = LlmServiceProfiles::new(
            cfg("chat", 0.1),
            cfg("chat", 0.0),
            cfg("embed", 0.0),
            None,
        )
        .unwrap();

        let (answer, verification, embedding) = svc.profiles();
        assert_eq!(answer.temperature, Some(0.1));
        assert_eq!(verification.temperature, Some(0.0));
        assert_eq!(embedding.model, "embed");
    }

    #[test]
    fn client_key_ignores_sampling_knobs() {
        let a = ClientKey::from(&cfg("m", 0.0));
        let b = ClientKey::from(&cfg("m", 0.9));
        assert!(a == b);
    }
}
