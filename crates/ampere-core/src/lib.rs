//! Ampere Core - structured-output LLM agents for electricity bills.
//!
//! Each agent takes one JSON object, renders a prompt, calls a language model
//! once and returns the model's JSON answer (or a readable error):
//!
//! ```text
//! Input → Prompt → [Weather] → Model → Sanitize → Decode → Outcome
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use ampere_core::{Agent, Config, FootprintAgent, FootprintMode, LlmProviderFactory};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> ampere_core::Result<()> {
//!     let config = Config::load()?;
//!     let provider = LlmProviderFactory::create(&config.llm.provider, &config.llm, None)?;
//!     let agent = FootprintAgent::new(Arc::from(provider), &config.agent, FootprintMode::Savings);
//!
//!     let input = serde_json::json!({"breakdown": [{"name": "AC", "monthlyUnits": 720}]});
//!     println!("{}", agent.run(&input).await.into_json());
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod agents;
pub mod config;
pub mod error;
pub mod llm;
pub mod outcome;
pub mod output;
pub mod prompt;
pub mod response;
pub mod schema;
pub mod types;
pub mod weather;

// Re-exports for convenient access
pub use agents::{
    Agent, AnalysisAgent, BillParserAgent, FootprintAgent, FootprintMode, PredictionAgent,
    RecommendationAgent,
};
pub use config::Config;
pub use error::{AgentError, ConfigError, Result};
pub use llm::{LlmProvider, LlmProviderFactory};
pub use outcome::Outcome;
pub use output::{parse_payload, read_payload, OutputWriter};
pub use weather::{OpenWeatherClient, WeatherSource};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
