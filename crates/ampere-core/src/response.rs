//! Turning raw model text into a JSON payload.
//!
//! Models usually wrap their JSON in markdown fences. [`sanitize`] removes the
//! fence markers and nothing else; [`decode`] parses strictly. Prose outside
//! the JSON is not repaired, it surfaces as a decode failure.

use crate::error::AgentError;
use serde_json::Value;

/// Remove every ```` ```json ```` and bare ```` ``` ```` marker, then trim.
pub fn sanitize(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parse the sanitized candidate. No schema checks: any valid JSON value is
/// returned as-is.
pub fn decode(candidate: &str) -> Result<Value, AgentError> {
    serde_json::from_str(candidate).map_err(|e| AgentError::Format(e.to_string()))
}

/// Keep at most `max` characters of `text` for log lines.
pub(crate) fn preview(text: &str, max: usize) -> &str {
    crate::prompt::truncate_chars(text, max)
}
