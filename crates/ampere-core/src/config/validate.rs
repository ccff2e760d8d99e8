//! Configuration validation with range checks.

use crate::error::ConfigError;
use crate::llm::KNOWN_PROVIDERS;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.agent.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "agent.max_tokens must be > 0".into(),
            ));
        }
        if self.agent.text_budget == 0 {
            return Err(ConfigError::ValidationError(
                "agent.text_budget must be > 0".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.agent.temperature) {
            return Err(ConfigError::ValidationError(
                "agent.temperature must be between 0.0 and 2.0".into(),
            ));
        }
        if self.weather.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "weather.timeout_ms must be > 0".into(),
            ));
        }
        if !KNOWN_PROVIDERS.contains(&self.llm.provider.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "llm.provider must be one of {}, got '{}'",
                KNOWN_PROVIDERS.join(", "),
                self.llm.provider
            )));
        }
        Ok(())
    }
}
