/// Represents the provider (backend) used for large language model (LLM)
/// inference.
///
/// This enum distinguishes between different backends such as local Ollama
/// and the OpenAI API.
///
/// Adding more providers in the future (e.g., Anthropic Claude, Mistral API)
/// can be done by extending this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Local Ollama runtime for on-device inference.
    Ollama,
    /// OpenAI API (chat completions + embeddings).
    OpenAI,
}
