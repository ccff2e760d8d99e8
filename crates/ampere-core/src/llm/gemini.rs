//! Google Gemini provider using the `generateContent` REST API.
//!
//! Text and attachment travel as parts of one user turn, so the model sees
//! the document together with the instructions.

use super::provider::{LlmProvider, LlmRequest, LlmResponse};
use crate::error::AgentError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Gemini provider.
pub struct GeminiProvider {
    endpoint: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(endpoint: &str, api_key: &str, model: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model
                .trim()
                .strip_prefix("models/")
                .unwrap_or(model.trim())
                .to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn generate_url(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.endpoint, self.model)
    }
}

// --- Request types ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
enum Part {
    Text(String),
    InlineData(InlineData),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

// --- Response types ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
    model_version: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    total_token_count: Option<u32>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

fn build_request(request: &LlmRequest) -> GenerateContentRequest {
    let mut parts = vec![Part::Text(request.prompt.clone())];
    if let Some(attachment) = &request.attachment {
        parts.push(Part::InlineData(InlineData {
            mime_type: attachment.media_type.clone(),
            data: attachment.data.clone(),
        }));
    }

    GenerateContentRequest {
        contents: vec![Content {
            role: "user".to_string(),
            parts,
        }],
        generation_config: GenerationConfig {
            temperature: request.temperature,
            max_output_tokens: request.max_tokens,
        },
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, AgentError> {
        let start = Instant::now();
        let body = build_request(request);

        let resp = self
            .client
            .post(self.generate_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AgentError::transport(format!("Gemini request failed: {}", e.without_url()))
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|envelope| envelope.error.message)
                .unwrap_or(text);
            return Err(AgentError::Transport {
                message: format!("Gemini HTTP {status}: {detail}"),
                status_code: Some(status.as_u16()),
            });
        }

        let generated: GenerateContentResponse = resp.json().await.map_err(|e| {
            AgentError::transport(format!("Failed to parse Gemini response: {}", e.without_url()))
        })?;

        if let Some(reason) = generated
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_deref())
        {
            return Err(AgentError::transport(format!(
                "Gemini blocked the prompt: {reason}"
            )));
        }

        let candidate = generated.candidates.into_iter().next().ok_or_else(|| {
            AgentError::transport("Gemini returned no candidates, no content generated")
        })?;

        let text = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        let text = text.trim().to_string();
        if text.is_empty() {
            let reason = candidate.finish_reason.unwrap_or_else(|| "UNKNOWN".into());
            return Err(AgentError::transport(format!(
                "Gemini returned empty response (finish reason: {reason})"
            )));
        }

        Ok(LlmResponse {
            text,
            model: generated.model_version.unwrap_or_else(|| self.model.clone()),
            tokens_used: generated
                .usage_metadata
                .and_then(|usage| usage.total_token_count),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::provider::Attachment;
    use serde_json::json;

    fn request(attachment: Option<Attachment>) -> LlmRequest {
        LlmRequest {
            prompt: "Parse this bill.".to_string(),
            attachment,
            max_tokens: 512,
            temperature: 0.2,
        }
    }

    #[test]
    fn test_text_only_request_shape() {
        let body = serde_json::to_value(build_request(&request(None))).unwrap();
        assert_eq!(
            body["contents"],
            json!([{"role": "user", "parts": [{"text": "Parse this bill."}]}])
        );
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 512);
    }

    #[test]
    fn test_attachment_rides_in_the_same_turn() {
        let attachment = Attachment::from_bytes(b"%PDF-1.7", "application/pdf");
        let body = serde_json::to_value(build_request(&request(Some(attachment)))).unwrap();
        let parts = body["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["text"], "Parse this bill.");
        assert_eq!(parts[1]["inlineData"]["mimeType"], "application/pdf");
        assert_eq!(parts[1]["inlineData"]["data"], "JVBERi0xLjc=");
    }

    #[tokio::test]
    async fn test_connection_error_does_not_leak_key() {
        let provider = GeminiProvider::new("http://127.0.0.1:9", "SECRET-KEY-123", "gemini-2.0-flash");
        let err = provider.generate(&request(None)).await.unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Gemini request failed"));
        assert!(!message.contains("SECRET-KEY-123"));
        assert!(!message.contains("127.0.0.1"));
    }

    #[test]
    fn test_model_prefix_is_stripped() {
        let provider = GeminiProvider::new("https://example.test/", "k", "models/gemini-2.0-flash");
        assert_eq!(
            provider.generate_url(),
            "https://example.test/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }
}
