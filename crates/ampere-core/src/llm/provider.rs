//! LLM provider trait and request/response types.
//!
//! Defines the interface that all LLM providers implement, plus the
//! factory that creates the right provider from CLI flags and config.

use crate::config::LlmConfig;
use crate::error::{AgentError, ConfigError};
use async_trait::async_trait;
use base64::Engine;

/// Provider identifiers accepted by [`LlmProviderFactory::create`].
pub const KNOWN_PROVIDERS: &[&str] = &["gemini", "openai", "anthropic", "ollama"];

/// Base64-encoded binary document sent alongside a prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    /// Base64-encoded bytes (standard alphabet, no whitespace)
    pub data: String,
    /// MIME type (e.g., "application/pdf", "image/png")
    pub media_type: String,
}

impl Attachment {
    /// Encode raw bytes with an explicit MIME type.
    pub fn from_bytes(bytes: &[u8], media_type: &str) -> Self {
        Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            media_type: media_type.to_string(),
        }
    }

    /// Accept caller-supplied base64 text.
    ///
    /// Whitespace (line wrapping) is dropped and the rest must decode. The
    /// MIME type is `media_type` when given, otherwise sniffed from the
    /// decoded bytes, otherwise `application/pdf`.
    pub fn from_base64(encoded: &str, media_type: Option<&str>) -> Result<Self, AgentError> {
        let data: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&data)
            .map_err(|e| AgentError::Input(format!("Document data is not valid base64: {e}")))?;

        let media_type = media_type
            .map(str::to_string)
            .or_else(|| sniff_media_type(&bytes).map(String::from))
            .unwrap_or_else(|| "application/pdf".to_string());

        Ok(Self { data, media_type })
    }

    /// Return a data URL suitable for OpenAI-style APIs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }

    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }
}

/// Identify a document type from its leading magic bytes.
pub fn sniff_media_type(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"%PDF") {
        Some("application/pdf")
    } else if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        Some("image/png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(b"GIF8") {
        Some("image/gif")
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}

/// A single prompt, optionally paired with a document the model must see at
/// the same time.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    /// Text prompt for the model
    pub prompt: String,
    /// Optional binary document
    pub attachment: Option<Attachment>,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

/// The response from an LLM call.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// Generated text, untouched apart from trimming
    pub text: String,
    /// Model identifier used
    pub model: String,
    /// Number of tokens used (input + output), if reported
    pub tokens_used: Option<u32>,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// Trait that all LLM providers implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (agents hold an `Arc<dyn LlmProvider>`).
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logging (e.g., "gemini", "ollama").
    fn name(&self) -> &str;

    /// Whether this provider can take the given attachment in a request.
    fn accepts(&self, _attachment: &Attachment) -> bool {
        true
    }

    /// Send one request. Single attempt: callers do not retry.
    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, AgentError>;
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok()
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Resolve a required API key, naming the missing variable on failure.
fn credential(value: &str, default_var: &str) -> Result<String, ConfigError> {
    resolve_env_var(value)
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            let var = value
                .strip_prefix("${")
                .and_then(|v| v.strip_suffix('}'))
                .unwrap_or(default_var);
            ConfigError::MissingCredential(var.to_string())
        })
}

/// Factory that creates the appropriate provider from CLI flags and config.
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// Create an LLM provider based on provider name, config, and optional model override.
    ///
    /// Credentials are resolved here, once: a missing key is a configuration
    /// error before any agent runs.
    ///
    /// # Arguments
    /// * `provider` - Provider identifier ("gemini", "openai", "anthropic", "ollama")
    /// * `config` - The full LLM config section
    /// * `model_override` - Optional model name that overrides the config default
    pub fn create(
        provider: &str,
        config: &LlmConfig,
        model_override: Option<&str>,
    ) -> Result<Box<dyn LlmProvider>, ConfigError> {
        match provider {
            "gemini" => {
                let cfg = config.gemini.clone().unwrap_or_default();
                let api_key = credential(&cfg.api_key, "GEMINI_API_KEY")?;
                let model = model_override.map(String::from).unwrap_or(cfg.model);
                Ok(Box::new(super::gemini::GeminiProvider::new(
                    &cfg.endpoint,
                    &api_key,
                    &model,
                )))
            }
            "openai" => {
                let cfg = config.openai.clone().unwrap_or_default();
                let api_key = credential(&cfg.api_key, "OPENAI_API_KEY")?;
                let model = model_override.map(String::from).unwrap_or(cfg.model);
                Ok(Box::new(super::openai::OpenAiProvider::new(
                    &api_key, &model,
                )))
            }
            "anthropic" => {
                let cfg = config.anthropic.clone().unwrap_or_default();
                let api_key = credential(&cfg.api_key, "ANTHROPIC_API_KEY")?;
                let model = model_override.map(String::from).unwrap_or(cfg.model);
                Ok(Box::new(super::anthropic::AnthropicProvider::new(
                    &api_key, &model,
                )))
            }
            "ollama" => {
                let cfg = config.ollama.clone().unwrap_or_default();
                let model = model_override.map(String::from).unwrap_or(cfg.model);
                Ok(Box::new(super::ollama::OllamaProvider::new(
                    &cfg.endpoint,
                    &model,
                )))
            }
            other => Err(ConfigError::ValidationError(format!(
                "Unknown LLM provider: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeminiConfig;

    #[test]
    fn test_attachment_from_bytes() {
        let attachment = Attachment::from_bytes(b"%PDF-1.7", "application/pdf");
        assert_eq!(attachment.media_type, "application/pdf");
        assert_eq!(attachment.data, "JVBERi0xLjc=");
    }

    #[test]
    fn test_attachment_from_base64_sniffs_png() {
        let encoded = Attachment::from_bytes(&[0x89, 0x50, 0x4E, 0x47, 0x0D], "x").data;
        let attachment = Attachment::from_base64(&encoded, None).unwrap();
        assert_eq!(attachment.media_type, "image/png");
        assert!(attachment.is_image());
    }

    #[test]
    fn test_attachment_from_base64_explicit_type_wins() {
        let attachment = Attachment::from_base64("JVBERi0xLjc=", Some("image/jpeg")).unwrap();
        assert_eq!(attachment.media_type, "image/jpeg");
    }

    #[test]
    fn test_attachment_from_base64_defaults_to_pdf() {
        let attachment = Attachment::from_base64("AAEC", None).unwrap();
        assert_eq!(attachment.media_type, "application/pdf");
        assert!(!attachment.is_image());
    }

    #[test]
    fn test_attachment_from_base64_strips_line_wrapping() {
        let attachment = Attachment::from_base64("JVBE\nRi0x\r\nLjc=", None).unwrap();
        assert_eq!(attachment.data, "JVBERi0xLjc=");
        assert_eq!(attachment.media_type, "application/pdf");
    }

    #[test]
    fn test_attachment_from_base64_rejects_garbage() {
        let err = Attachment::from_base64("not base64!!", None).unwrap_err();
        assert!(err.to_string().contains("not valid base64"));
    }

    #[test]
    fn test_attachment_data_url() {
        let attachment = Attachment::from_bytes(&[1, 2, 3], "image/jpeg");
        assert!(attachment.data_url().starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_sniff_media_type() {
        assert_eq!(sniff_media_type(&[0xFF, 0xD8, 0xFF, 0xE0]), Some("image/jpeg"));
        assert_eq!(sniff_media_type(b"GIF89a"), Some("image/gif"));
        assert_eq!(sniff_media_type(b"RIFF\0\0\0\0WEBPVP8 "), Some("image/webp"));
        assert_eq!(sniff_media_type(b"hello"), None);
    }

    #[test]
    fn test_resolve_env_var() {
        // Non-env-var strings pass through
        assert_eq!(resolve_env_var("plain-key"), Some("plain-key".to_string()));
        // Empty returns None
        assert_eq!(resolve_env_var(""), None);
        // Unset env var returns None
        assert_eq!(resolve_env_var("${DEFINITELY_NOT_SET_XYZ_123}"), None);
    }

    #[test]
    fn test_factory_missing_credential_names_variable() {
        let config = LlmConfig {
            gemini: Some(GeminiConfig {
                api_key: "${AMPERE_TEST_UNSET_KEY_9F2}".to_string(),
                ..GeminiConfig::default()
            }),
            ..LlmConfig::default()
        };
        let err = LlmProviderFactory::create("gemini", &config, None)
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "AMPERE_TEST_UNSET_KEY_9F2 not found");
    }

    #[test]
    fn test_factory_literal_key_and_model_override() {
        let config = LlmConfig {
            gemini: Some(GeminiConfig {
                api_key: "literal-key".to_string(),
                ..GeminiConfig::default()
            }),
            ..LlmConfig::default()
        };
        let provider = LlmProviderFactory::create("gemini", &config, Some("gemini-2.5-pro")).unwrap();
        assert_eq!(provider.name(), "gemini");
    }

    #[test]
    fn test_factory_ollama_needs_no_key() {
        let provider = LlmProviderFactory::create("ollama", &LlmConfig::default(), None).unwrap();
        assert_eq!(provider.name(), "ollama");
    }

    #[test]
    fn test_factory_unknown_provider() {
        let err = LlmProviderFactory::create("mystery", &LlmConfig::default(), None)
            .err()
            .unwrap();
        assert!(err.to_string().contains("Unknown LLM provider: mystery"));
    }
}
