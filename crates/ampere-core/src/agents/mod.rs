//! Structured-output agents.
//!
//! Every agent runs the same stateless sequence:
//!
//! ```text
//! input → prompt → [weather] → model → sanitize → decode → Outcome
//! ```
//!
//! Nothing is retried and each stage runs at most once. Agents differ only in
//! the prompt they render, whether they route a document attachment, and
//! whether they fold in weather enrichment.

mod analysis;
mod bill_parser;
mod footprint;
mod prediction;
mod recommendation;

pub use analysis::AnalysisAgent;
pub use bill_parser::{BillParserAgent, BillSource};
pub use footprint::{FootprintAgent, FootprintMode, CO2_KG_PER_KWH};
pub use prediction::{following_month, PredictionAgent};
pub use recommendation::RecommendationAgent;

use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::llm::{Attachment, LlmProvider, LlmRequest};
use crate::outcome::Outcome;
use crate::response::{decode, preview, sanitize};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// One stateless request/response pipeline specialised for a single task.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Agent name for logging and diagnostics.
    fn name(&self) -> &'static str;

    /// Run the pipeline, propagating the first error.
    async fn execute(&self, input: &Value) -> Result<Value, AgentError>;

    /// Check a successful outcome against this agent's output schema.
    ///
    /// Opt-in: [`Agent::run`] never calls it.
    fn validate(&self, outcome: Outcome) -> Outcome {
        outcome
    }

    /// Run the pipeline and fold any error into a `Failure`.
    async fn run(&self, input: &Value) -> Outcome {
        let result = self.execute(input).await;
        if let Err(e) = &result {
            tracing::error!(agent = self.name(), "{e}");
        }
        result.into()
    }
}

/// Sends one rendered prompt to the model and decodes the reply.
#[derive(Clone)]
pub struct ModelInvoker {
    provider: Arc<dyn LlmProvider>,
    max_tokens: u32,
    temperature: f32,
}

impl ModelInvoker {
    pub fn new(provider: Arc<dyn LlmProvider>, config: &AgentConfig) -> Self {
        Self {
            provider,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    /// Invoke the model once with `prompt` (and `attachment`, in the same
    /// request), then sanitize and decode the response.
    pub async fn complete(
        &self,
        agent: &'static str,
        prompt: String,
        attachment: Option<Attachment>,
    ) -> Result<Value, AgentError> {
        if let Some(attachment) = &attachment {
            if !self.provider.accepts(attachment) {
                return Err(AgentError::Input(format!(
                    "The {} provider cannot read {} attachments",
                    self.provider.name(),
                    attachment.media_type
                )));
            }
        }

        tracing::debug!(
            agent,
            stage = "prompt_built",
            prompt_chars = prompt.chars().count(),
            attachment = attachment.as_ref().map(|a| a.media_type.as_str())
        );

        let request = LlmRequest {
            prompt,
            attachment,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        tracing::info!(agent, provider = self.provider.name(), "Sending prompt to model");
        let response = self.provider.generate(&request).await?;
        tracing::debug!(
            agent,
            stage = "model_invoked",
            model = %response.model,
            latency_ms = response.latency_ms,
            tokens = response.tokens_used,
            "Raw response: {}",
            preview(&response.text, 500)
        );

        let candidate = sanitize(&response.text);
        tracing::debug!(agent, stage = "sanitized", "Cleaned response: {}", preview(&candidate, 500));

        let payload = decode(&candidate)?;
        tracing::debug!(agent, stage = "decoded");
        Ok(payload)
    }
}

/// Decode an agent's typed input from the caller's payload.
pub(crate) fn parse_input<T: DeserializeOwned>(input: &Value) -> Result<T, AgentError> {
    T::deserialize(input).map_err(|e| AgentError::Input(format!("Invalid input: {e}")))
}

/// Round a currency amount to two decimal places. Negative zero comes out
/// as `0.0`.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0 + 0.0
}

#[cfg(test)]
pub(crate) mod testing {
    //! Stub provider shared by the agent tests.

    use crate::error::AgentError;
    use crate::llm::{LlmProvider, LlmRequest, LlmResponse};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    /// A configurable mock LLM provider.
    ///
    /// Each call to `generate()` invokes the response factory with the
    /// current call index and records the request for later assertions.
    pub struct MockProvider {
        response_fn: Box<dyn Fn(u32) -> Result<String, AgentError> + Send + Sync>,
        call_count: Arc<AtomicU32>,
        requests: Arc<Mutex<Vec<LlmRequest>>>,
        images_only: bool,
    }

    impl MockProvider {
        pub fn replying(text: &str) -> Self {
            let text = text.to_string();
            Self::from_fn(move |_| Ok(text.clone()))
        }

        pub fn failing(status_code: Option<u16>, message: &str) -> Self {
            let message = message.to_string();
            Self::from_fn(move |_| {
                Err(AgentError::Transport {
                    message: message.clone(),
                    status_code,
                })
            })
        }

        pub fn from_fn(
            response_fn: impl Fn(u32) -> Result<String, AgentError> + Send + Sync + 'static,
        ) -> Self {
            Self {
                response_fn: Box::new(response_fn),
                call_count: Arc::new(AtomicU32::new(0)),
                requests: Arc::new(Mutex::new(Vec::new())),
                images_only: false,
            }
        }

        pub fn images_only(mut self) -> Self {
            self.images_only = true;
            self
        }

        /// Get a shared handle to the call counter (clone before moving provider).
        pub fn call_count_handle(&self) -> Arc<AtomicU32> {
            self.call_count.clone()
        }

        /// Get a shared handle to the recorded requests.
        pub fn requests_handle(&self) -> Arc<Mutex<Vec<LlmRequest>>> {
            self.requests.clone()
        }
    }

    #[async_trait]
    impl LlmProvider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        fn accepts(&self, attachment: &crate::llm::Attachment) -> bool {
            !self.images_only || attachment.is_image()
        }

        async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, AgentError> {
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request.clone());
            let text = (self.response_fn)(idx)?;
            Ok(LlmResponse {
                text,
                model: "mock-v1".to_string(),
                tokens_used: Some(42),
                latency_ms: 10,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::MockProvider;
    use super::*;
    use serde_json::json;
    use std::sync::atomic::Ordering;

    fn invoker(provider: MockProvider) -> ModelInvoker {
        ModelInvoker::new(Arc::new(provider), &AgentConfig::default())
    }

    #[tokio::test]
    async fn test_complete_decodes_fenced_reply() {
        let provider = MockProvider::replying("```json\n{\"ok\": true}\n```");
        let payload = invoker(provider)
            .complete("test", "prompt".into(), None)
            .await
            .unwrap();
        assert_eq!(payload, json!({"ok": true}));
    }

    #[tokio::test]
    async fn test_complete_passes_generation_settings() {
        let provider = MockProvider::replying("{}");
        let requests = provider.requests_handle();
        invoker(provider)
            .complete("test", "prompt".into(), None)
            .await
            .unwrap();

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].max_tokens, 2048);
        assert_eq!(requests[0].prompt, "prompt");
        assert!(requests[0].attachment.is_none());
    }

    #[tokio::test]
    async fn test_complete_transport_error_is_terminal() {
        let provider = MockProvider::failing(Some(503), "Gemini HTTP 503: overloaded");
        let calls = provider.call_count_handle();
        let err = invoker(provider)
            .complete("test", "prompt".into(), None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Gemini HTTP 503: overloaded");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_complete_rejects_unreadable_attachment_before_call() {
        let provider = MockProvider::replying("{}").images_only();
        let calls = provider.call_count_handle();
        let attachment = Attachment::from_bytes(b"%PDF-1.4", "application/pdf");
        let err = invoker(provider)
            .complete("test", "prompt".into(), Some(attachment))
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Input(_)));
        assert!(err.to_string().contains("application/pdf"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_parse_input_reports_shape_errors() {
        #[derive(Debug, Deserialize)]
        struct Needs {
            #[allow(dead_code)]
            count: u32,
        }
        let err = parse_input::<Needs>(&json!({"count": "many"})).unwrap_err();
        assert!(err.to_string().starts_with("Invalid input:"));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(3450.505_1), 3450.51);
        assert_eq!(round2(54.0), 54.0);
        assert_eq!(round2(0.0), 0.0);
        assert!(round2(-0.0).is_sign_positive());
        assert!(round2(-0.001).is_sign_positive());
    }
}
