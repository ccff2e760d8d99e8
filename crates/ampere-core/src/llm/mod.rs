//! LLM integration for structured-output agents.
//!
//! Provides a provider abstraction over multiple LLM backends (Gemini, OpenAI,
//! Anthropic, Ollama). Each provider takes a prompt plus an optional document
//! attachment and returns raw text.

pub(crate) mod anthropic;
pub(crate) mod gemini;
pub(crate) mod ollama;
pub(crate) mod openai;
pub(crate) mod provider;

pub use gemini::GeminiProvider;
pub use provider::{
    resolve_env_var, sniff_media_type, Attachment, LlmProvider, LlmProviderFactory, LlmRequest,
    LlmResponse, KNOWN_PROVIDERS,
};
