//! Error types for the Ampere agent pipeline.
//!
//! Errors are organized by the stage that raised them. Every kind renders to a
//! plain human-readable message, because the process contract reports failures
//! only as `{"error": "<message>"}`.

use thiserror::Error;

/// Top-level error type for one agent invocation.
#[derive(Error, Debug)]
pub enum AgentError {
    /// Missing credential or unusable configuration, raised at construction
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Missing, empty or malformed input, raised before any external call
    #[error("{0}")]
    Input(String),

    /// The model (or an enrichment) call failed at the network/service layer
    #[error("{message}")]
    Transport {
        message: String,
        status_code: Option<u16>,
    },

    /// The sanitized model response is not valid JSON
    #[error("Model response is not valid JSON: {0}")]
    Format(String),

    /// The decoded payload does not match the agent's declared schema (strict mode only)
    #[error("Model response does not match the {schema} schema: {message}")]
    Schema {
        schema: &'static str,
        message: String,
    },

    /// A sub-agent of a combined analysis failed
    #[error("{agent} agent failed: {source}")]
    SubAgent {
        agent: &'static str,
        #[source]
        source: Box<AgentError>,
    },

    /// General I/O errors (reading stdin, writing stdout)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AgentError {
    /// Shorthand for a transport failure with no HTTP status attached.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            status_code: None,
        }
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// A required credential is not set
    #[error("{0} not found")]
    MissingCredential(String),
}

/// Convenience type alias for agent results.
pub type Result<T> = std::result::Result<T, AgentError>;
