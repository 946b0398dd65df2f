//! Default LLM configs loaded strictly from environment variables.
//!
//! Convenience constructors for [`LlmModelConfig`], grouped by role:
//!
//! - **Answer**       → grounded answer generation (low temperature)
//! - **Verification** → deterministic yes/no checks (temperature 0)
//! - **Embedding**    → embedding generator
//!
//! The provider is selected once via `LLM_KIND` and applies to all three
//! roles.
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND`       = provider kind (`openai` default, or `ollama`)
//! - `LLM_MAX_TOKENS` = optional max tokens (u32)
//!
//! OpenAI-specific:
//! - `OPENAI_API_KEY` = API key (mandatory)
//! - `OPENAI_URL`     = API base (defaults to `https://api.openai.com`)
//! - `CHAT_MODEL`     = chat model (defaults to `gpt-4o`)
//! - `VERIFICATION_MODEL` = verification model (defaults to `CHAT_MODEL`)
//! - `EMBEDDING_MODEL`    = embedding model (defaults to `text-embedding-3-large`)
//!
//! Ollama-specific:
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (mandatory)
//! - `OLLAMA_MODEL`                = chat model (mandatory)
//! - `EMBEDDING_MODEL`             = embedding model (mandatory)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{AiLlmError, ConfigError, env_opt_u32, must_env},
};

/// Resolves the provider kind from `LLM_KIND` (defaults to OpenAI).
///
/// # Errors
/// - [`ConfigError::UnsupportedProvider`] for anything other than
///   `openai`/`chatgpt`/`ollama`.
pub fn provider_kind() -> Result<LlmProvider, AiLlmError> {
    let kind = std::env::var("LLM_KIND").unwrap_or_else(|_| "openai".into());
    match kind.trim().to_ascii_lowercase().as_str() {
        "" | "openai" | "chatgpt" => Ok(LlmProvider::OpenAI),
        "ollama" => Ok(LlmProvider::Ollama),
        other => Err(ConfigError::UnsupportedProvider(other.to_string()).into()),
    }
}

/// Resolves the Ollama endpoint strictly from environment.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
///
/// # Errors
/// - [`ConfigError::MissingVar`] if both are missing
/// - [`ConfigError::InvalidNumber`] if `OLLAMA_PORT` is invalid
fn ollama_endpoint() -> Result<String, AiLlmError> {
    if let Ok(url) = std::env::var("OLLAMA_URL") {
        if !url.trim().is_empty() {
            return Ok(url);
        }
    }
    if let Ok(port) = std::env::var("OLLAMA_PORT") {
        if !port.trim().is_empty() {
            let _ = port
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidNumber {
                    var: "OLLAMA_PORT",
                    reason: "expected u16 (1..=65535)",
                })?;
            return Ok(format!("http://localhost:{port}"));
        }
    }
    Err(AiLlmError::Config(ConfigError::MissingVar(
        "OLLAMA_URL or OLLAMA_PORT",
    )))
}

fn openai_endpoint() -> String {
    std::env::var("OPENAI_URL")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "https://api.openai.com".to_string())
}

fn chat_model(provider: LlmProvider) -> Result<String, AiLlmError> {
    match provider {
        LlmProvider::OpenAI => Ok(std::env::var("CHAT_MODEL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "gpt-4o".to_string())),
        LlmProvider::Ollama => must_env("OLLAMA_MODEL"),
    }
}

/// Constructs the **answer** config: the model that writes grounded answers.
///
/// # Defaults
/// - `temperature = Some(0.1)` (near-deterministic, still fluent)
/// - `timeout_secs = Some(60)`
pub fn config_answer() -> Result<LlmModelConfig, AiLlmError> {
    let provider = provider_kind()?;
    let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?;

    let (endpoint, api_key) = match provider {
        LlmProvider::OpenAI => (openai_endpoint(), Some(must_env("OPENAI_API_KEY")?)),
        LlmProvider::Ollama => (ollama_endpoint()?, None),
    };

    Ok(LlmModelConfig {
        provider,
        model: chat_model(provider)?,
        endpoint,
        api_key,
        max_tokens,
        temperature: Some(0.1),
        top_p: None,
        timeout_secs: Some(60),
    })
}

/// Constructs the **verification** config: a deterministic instance used for
/// yes/no relevance checks, distinct from the answer instance.
///
/// Uses `VERIFICATION_MODEL` when set, otherwise the chat model.
///
/// # Defaults
/// - `temperature = Some(0.0)`
/// - `timeout_secs = Some(30)`
pub fn config_verification() -> Result<LlmModelConfig, AiLlmError> {
    let mut cfg = config_answer()?;
    if let Some(model) = std::env::var("VERIFICATION_MODEL")
        .ok()
        .filter(|s| !s.trim().is_empty())
    {
        cfg.model = model;
    }
    cfg.temperature = Some(0.0);
    cfg.top_p = None;
    cfg.timeout_secs = Some(30);
    Ok(cfg)
}

/// Constructs the **embedding** config.
///
/// # Defaults
/// - `temperature = None` (not a sampling call)
/// - `timeout_secs = Some(30)`
pub fn config_embedding() -> Result<LlmModelConfig, AiLlmError> {
    let provider = provider_kind()?;

    let (endpoint, api_key, model) = match provider {
        LlmProvider::OpenAI => (
            openai_endpoint(),
            Some(must_env("OPENAI_API_KEY")?),
            std::env::var("EMBEDDING_MODEL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "text-embedding-3-large".to_string()),
        ),
        LlmProvider::Ollama => (ollama_endpoint()?, None, must_env("EMBEDDING_MODEL")?),
    };

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key,
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: Some(30),
    })
}
