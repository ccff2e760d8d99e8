//! Carbon footprint agent.
//!
//! Two output shapes share one input: savings mode pairs the footprint with
//! per-appliance reduction suggestions, impact mode translates it into trees
//! and car kilometres.

use super::{parse_input, Agent, ModelInvoker};
use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::llm::LlmProvider;
use crate::outcome::Outcome;
use crate::prompt::PromptTemplate;
use crate::schema::{ImpactReport, SavingsReport};
use crate::types::BreakdownInput;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

/// Grid emission factor assumed when the model has nothing better.
pub const CO2_KG_PER_KWH: f64 = 0.82;

/// Which output shape the footprint agent asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FootprintMode {
    /// `carbonFootprint` + `suggestions[]`
    Savings,
    /// `carbonFootprint` + `impact{trees, carKm, description}`
    Impact,
}

pub struct FootprintAgent {
    invoker: ModelInvoker,
    mode: FootprintMode,
}

impl FootprintAgent {
    pub fn new(provider: Arc<dyn LlmProvider>, config: &AgentConfig, mode: FootprintMode) -> Self {
        Self {
            invoker: ModelInvoker::new(provider, config),
            mode,
        }
    }

    pub fn mode(&self) -> FootprintMode {
        self.mode
    }

    /// Render the prompt for `input` in this agent's mode.
    pub fn prompt(&self, input: &BreakdownInput) -> String {
        let breakdown = Value::Array(input.breakdown.clone());
        match self.mode {
            FootprintMode::Savings => savings_prompt(&breakdown),
            FootprintMode::Impact => impact_prompt(&breakdown),
        }
    }
}

fn savings_prompt(breakdown: &Value) -> String {
    PromptTemplate::new(
        "You are an Energy Efficiency Agent. Your goal is to analyze appliance usage and suggest savings.",
        json!({
            "carbonFootprint": "150 kg CO2",
            "suggestions": [
                {
                    "name": "Appliance Name (exact match)",
                    "reductionPercentage": 0.15,
                    "strategy": "Turn off AC when leaving the room to save 15%"
                }
            ]
        }),
    )
    .json_section("Input Data (Normalized Bill)", breakdown)
    .task(format!(
        "Calculate the estimated Carbon Footprint (in kg CO2) for this monthly usage. \
         (Approx {CO2_KG_PER_KWH} kg CO2 per kWh)."
    ))
    .task(
        "Analyze each appliance. If an appliance uses a lot of energy, suggest a REALISTIC \
         percentage reduction (e.g., 0.10 for 10%).",
    )
    .task("Provide a short \"strategy\" string for each suggestion.")
    .render()
}

fn impact_prompt(breakdown: &Value) -> String {
    PromptTemplate::new(
        "You are a Carbon Footprint Calculator Agent.",
        json!({
            "carbonFootprint": 150.5,
            "impact": {
                "trees": 5,
                "carKm": 300,
                "description": "Your monthly energy usage generates 150.5kg of CO2, which is equivalent to driving a car for 300km. You would need 5 trees to offset this."
            }
        }),
    )
    .json_section("Input Data (Normalized Bill Breakdown)", breakdown)
    .task(format!(
        "Calculate the estimated Carbon Footprint (in kg CO2) for this monthly usage.\n\
         (Assume approx {CO2_KG_PER_KWH} kg CO2 per kWh if not specified, but refine based on appliance type if possible)."
    ))
    .task(
        "Provide \"environmental impact\" context. Translate this amount of CO2 into tangible terms:\n\
         - Equivalent number of trees needed to absorb this CO2.\n\
         - Equivalent km driven by an average car.",
    )
    .note("carbonFootprint is a number in kg.")
    .note("impact.trees is a number of trees and impact.carKm a number of km.")
    .render()
}

#[async_trait]
impl Agent for FootprintAgent {
    fn name(&self) -> &'static str {
        match self.mode {
            FootprintMode::Savings => "footprint",
            FootprintMode::Impact => "co2",
        }
    }

    async fn execute(&self, input: &Value) -> Result<Value, AgentError> {
        let input: BreakdownInput = parse_input(input)?;
        tracing::info!(
            agent = self.name(),
            appliances = input.breakdown.len(),
            "Analyzing carbon footprint"
        );
        self.invoker
            .complete(self.name(), self.prompt(&input), None)
            .await
    }

    fn validate(&self, outcome: Outcome) -> Outcome {
        match self.mode {
            FootprintMode::Savings => outcome.validated::<SavingsReport>(),
            FootprintMode::Impact => outcome.validated::<ImpactReport>(),
        }
    }
}
