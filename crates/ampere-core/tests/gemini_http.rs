use ampere_core::llm::{Attachment, GeminiProvider, LlmProvider, LlmRequest};
use ampere_core::AgentError;
use httpmock::prelude::*;
use serde_json::json;

fn request(prompt: &str, attachment: Option<Attachment>) -> LlmRequest {
    LlmRequest {
        prompt: prompt.to_string(),
        attachment,
        max_tokens: 2048,
        temperature: 0.2,
    }
}

#[tokio::test]
async fn gemini_sends_prompt_as_single_user_turn() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1beta/models/gemini-2.0-flash:generateContent")
            .header("x-goog-api-key", "test-key")
            .json_body(json!({
                "contents": [
                    {
                        "role": "user",
                        "parts": [{"text": "Return JSON"}]
                    }
                ],
                "generationConfig": {
                    "temperature": 0.2,
                    "maxOutputTokens": 2048
                }
            }));
        then.status(200).json_body(json!({
            "candidates": [
                {
                    "content": {"parts": [{"text": "```json\n{\"ok\": true}\n```"}]},
                    "finishReason": "STOP"
                }
            ],
            "usageMetadata": {"totalTokenCount": 57},
            "modelVersion": "gemini-2.0-flash-001"
        }));
    });

    let provider = GeminiProvider::new(&server.url(""), "test-key", "gemini-2.0-flash");
    let response = provider.generate(&request("Return JSON", None)).await.unwrap();

    assert_eq!(response.text, "```json\n{\"ok\": true}\n```");
    assert_eq!(response.model, "gemini-2.0-flash-001");
    assert_eq!(response.tokens_used, Some(57));
    mock.assert();
}

#[tokio::test]
async fn gemini_sends_attachment_as_inline_data() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1beta/models/gemini-2.0-flash:generateContent")
            .body_contains("\"inlineData\":{\"mimeType\":\"application/pdf\",\"data\":\"JVBERi0xLjc=\"}")
            .body_contains("\"text\":\"Read the bill\"");
        then.status(200).json_body(json!({
            "candidates": [{"content": {"parts": [{"text": "{\"totalAmount\": 1200}"}]}}]
        }));
    });

    let provider = GeminiProvider::new(&server.url(""), "test-key", "models/gemini-2.0-flash");
    let attachment = Attachment::from_bytes(b"%PDF-1.7", "application/pdf");
    let response = provider
        .generate(&request("Read the bill", Some(attachment)))
        .await
        .unwrap();

    assert_eq!(response.text, "{\"totalAmount\": 1200}");
    mock.assert();
}

#[tokio::test]
async fn gemini_http_error_is_transport_failure() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST);
        then.status(500).json_body(json!({
            "error": {"code": 500, "message": "Internal error encountered.", "status": "INTERNAL"}
        }));
    });

    let provider = GeminiProvider::new(&server.url(""), "test-key", "gemini-2.0-flash");
    let err = provider.generate(&request("hi", None)).await.unwrap_err();

    match err {
        AgentError::Transport {
            message,
            status_code,
        } => {
            assert_eq!(status_code, Some(500));
            assert!(message.contains("Internal error encountered."));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn gemini_blocked_prompt_is_transport_failure() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST);
        then.status(200).json_body(json!({
            "candidates": [],
            "promptFeedback": {"blockReason": "SAFETY"}
        }));
    });

    let provider = GeminiProvider::new(&server.url(""), "test-key", "gemini-2.0-flash");
    let err = provider.generate(&request("hi", None)).await.unwrap_err();
    assert!(err.to_string().contains("SAFETY"));
}
