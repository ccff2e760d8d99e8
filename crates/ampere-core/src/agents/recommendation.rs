//! Energy saving recommendation agent.

use super::{parse_input, Agent, ModelInvoker};
use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::llm::LlmProvider;
use crate::outcome::Outcome;
use crate::prompt::PromptTemplate;
use crate::schema::Recommendations;
use crate::types::BreakdownInput;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

pub struct RecommendationAgent {
    invoker: ModelInvoker,
}

impl RecommendationAgent {
    pub fn new(provider: Arc<dyn LlmProvider>, config: &AgentConfig) -> Self {
        Self {
            invoker: ModelInvoker::new(provider, config),
        }
    }

    pub fn prompt(&self, input: &BreakdownInput) -> String {
        PromptTemplate::new(
            "You are an Energy Efficiency Expert Agent.",
            json!({
                "suggestions": [
                    {
                        "name": "Appliance Name (exact match from input)",
                        "reductionPercentage": 0.15,
                        "strategy": "Turn off AC when leaving the room to save 15%"
                    }
                ]
            }),
        )
        .json_section(
            "Input Data (Appliance Usage Breakdown)",
            &Value::Array(input.breakdown.clone()),
        )
        .task(
            "Analyze each appliance. If an appliance consumes significant energy, suggest a \
             REALISTIC percentage reduction strategy.",
        )
        .task("Provide a short, actionable \"strategy\" string for each suggestion.")
        .note("Only include suggestions for the top 3-4 energy consuming appliances.")
        .note("reductionPercentage is a fraction (0.15 means 15%); keep it realistic (0.05 to 0.30).")
        .render()
    }
}

#[async_trait]
impl Agent for RecommendationAgent {
    fn name(&self) -> &'static str {
        "recommendation"
    }

    async fn execute(&self, input: &Value) -> Result<Value, AgentError> {
        let input: BreakdownInput = parse_input(input)?;
        tracing::info!(
            agent = self.name(),
            appliances = input.breakdown.len(),
            "Generating recommendations"
        );
        self.invoker
            .complete(self.name(), self.prompt(&input), None)
            .await
    }

    fn validate(&self, outcome: Outcome) -> Outcome {
        outcome.validated::<Recommendations>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::testing::MockProvider;

    #[tokio::test]
    async fn test_prompt_limits_scope_and_range() {
        let provider = MockProvider::replying("{\"suggestions\": []}");
        let requests = provider.requests_handle();
        let agent = RecommendationAgent::new(Arc::new(provider), &AgentConfig::default());

        let outcome = agent
            .run(&json!({"breakdown": [{"name": "Refrigerator", "monthlyUnits": 144}]}))
            .await;
        assert_eq!(outcome, Outcome::Success(json!({"suggestions": []})));

        let prompt = requests.lock().unwrap()[0].prompt.clone();
        assert!(prompt.contains("top 3-4 energy consuming appliances"));
        assert!(prompt.contains("0.05 to 0.30"));
        assert!(prompt.contains("\"name\": \"Refrigerator\""));
    }

    #[tokio::test]
    async fn test_missing_breakdown_is_treated_as_empty() {
        let provider = MockProvider::replying("{\"suggestions\": []}");
        let requests = provider.requests_handle();
        let agent = RecommendationAgent::new(Arc::new(provider), &AgentConfig::default());

        assert!(agent.run(&json!({})).await.is_success());
        let prompt = requests.lock().unwrap()[0].prompt.clone();
        assert!(prompt.contains("Input Data (Appliance Usage Breakdown):\n[]"));
    }

    #[tokio::test]
    async fn test_strict_validation_flags_percent_values() {
        let provider = MockProvider::replying(
            "{\"suggestions\": [{\"name\": \"AC\", \"reductionPercentage\": 20, \"strategy\": \"x\"}]}",
        );
        let agent = RecommendationAgent::new(Arc::new(provider), &AgentConfig::default());
        let outcome = agent.run(&json!({"breakdown": []})).await;
        assert!(outcome.is_success());
        assert!(!agent.validate(outcome).is_success());
    }
}
