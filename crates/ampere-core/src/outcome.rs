//! The tagged result of one agent invocation.

use crate::error::AgentError;
use crate::schema::Schema;
use serde_json::{json, Value};

/// Either the decoded payload or a human-readable diagnostic. Exactly one is
/// produced per invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(Value),
    Failure(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Render the JSON object written to stdout: the payload itself on
    /// success, `{"error": message}` on failure.
    pub fn into_json(self) -> Value {
        match self {
            Outcome::Success(payload) => payload,
            Outcome::Failure(message) => json!({ "error": message }),
        }
    }

    /// Check a successful payload against a typed schema.
    ///
    /// Failures pass through untouched; a payload that does not deserialize
    /// into `T` (or fails its checks) becomes a `Failure`.
    pub fn validated<T: Schema>(self) -> Outcome {
        match self {
            Outcome::Success(payload) => match T::check(&payload) {
                Ok(()) => Outcome::Success(payload),
                Err(e) => Outcome::Failure(e.to_string()),
            },
            failure => failure,
        }
    }
}

impl From<Result<Value, AgentError>> for Outcome {
    fn from(result: Result<Value, AgentError>) -> Self {
        match result {
            Ok(payload) => Outcome::Success(payload),
            Err(e) => Outcome::Failure(e.to_string()),
        }
    }
}
