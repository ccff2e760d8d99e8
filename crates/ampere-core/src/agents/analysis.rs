//! Combined bill analysis.
//!
//! Runs the CO2 impact, recommendation and prediction agents one after
//! another on a single breakdown, then prices each suggestion against the
//! matching appliance's estimated cost.

use super::{
    parse_input, round2, Agent, FootprintAgent, FootprintMode, PredictionAgent,
    RecommendationAgent,
};
use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::llm::LlmProvider;
use crate::outcome::Outcome;
use crate::schema::AnalysisReport;
use crate::types::AnalysisInput;
use crate::weather::WeatherSource;
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// Currency attached to every priced suggestion.
pub const CURRENCY: &str = "INR";

pub struct AnalysisAgent {
    co2: FootprintAgent,
    recommendation: RecommendationAgent,
    prediction: PredictionAgent,
}

impl AnalysisAgent {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        config: &AgentConfig,
        weather: Arc<dyn WeatherSource>,
    ) -> Self {
        Self {
            co2: FootprintAgent::new(provider.clone(), config, FootprintMode::Impact),
            recommendation: RecommendationAgent::new(provider.clone(), config),
            prediction: PredictionAgent::new(provider, config, weather),
        }
    }
}

/// Prediction input derived from a breakdown: the bill is the sum of
/// estimated costs and appliances keep only their usage fields.
fn prediction_input(input: &AnalysisInput) -> Value {
    let current_bill = input
        .breakdown
        .iter()
        .filter_map(|item| item.get("estimatedCost").and_then(Value::as_f64))
        .fold(0.0, |acc, cost| acc + cost);

    let appliances: Vec<Value> = input
        .breakdown
        .iter()
        .map(|item| {
            let mut projected = Map::new();
            for key in ["name", "count", "hours", "watts"] {
                if let Some(value) = item.get(key) {
                    projected.insert(key.to_string(), value.clone());
                }
            }
            Value::Object(projected)
        })
        .collect();

    json!({
        "city": input.city,
        "currentMonth": input.current_month,
        "currentBill": current_bill,
        "appliances": appliances,
    })
}

/// Annotate suggestions with `savedAmount` and `currency`, returning them with
/// their rounded total.
///
/// A suggestion saves its `reductionPercentage` of the estimated cost of the
/// appliance whose name matches case-insensitively, or nothing when no
/// appliance matches.
pub fn price_suggestions(breakdown: &[Value], suggestions: &[Value]) -> (Vec<Value>, f64) {
    let priced: Vec<Value> = suggestions
        .iter()
        .filter_map(Value::as_object)
        .map(|suggestion| {
            let name = suggestion
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_lowercase);
            let cost = name
                .and_then(|name| {
                    breakdown.iter().find(|item| {
                        item.get("name")
                            .and_then(Value::as_str)
                            .is_some_and(|candidate| candidate.to_lowercase() == name)
                    })
                })
                .and_then(|item| item.get("estimatedCost").and_then(Value::as_f64))
                .unwrap_or(0.0);
            let fraction = suggestion
                .get("reductionPercentage")
                .and_then(Value::as_f64)
                .unwrap_or(0.0);

            let mut priced = suggestion.clone();
            priced.insert("savedAmount".into(), json!(round2(cost * fraction)));
            priced.insert("currency".into(), json!(CURRENCY));
            Value::Object(priced)
        })
        .collect();

    let total = priced
        .iter()
        .filter_map(|s| s.get("savedAmount").and_then(Value::as_f64))
        .fold(0.0, |acc, saved| acc + saved);
    (priced, round2(total))
}

fn sub_agent(agent: &'static str) -> impl FnOnce(AgentError) -> AgentError {
    move |source| AgentError::SubAgent {
        agent,
        source: Box::new(source),
    }
}

#[async_trait]
impl Agent for AnalysisAgent {
    fn name(&self) -> &'static str {
        "analysis"
    }

    async fn execute(&self, input: &Value) -> Result<Value, AgentError> {
        let input: AnalysisInput = parse_input(input)?;
        tracing::info!(
            agent = self.name(),
            appliances = input.breakdown.len(),
            city = %input.city,
            "Starting combined analysis (CO2 + recommendations + prediction)"
        );

        let breakdown = json!({ "breakdown": input.breakdown });
        let co2 = self.co2.execute(&breakdown).await.map_err(sub_agent("CO2"))?;
        let recommendations = self
            .recommendation
            .execute(&breakdown)
            .await
            .map_err(sub_agent("Recommendation"))?;
        let prediction = self
            .prediction
            .execute(&prediction_input(&input))
            .await
            .map_err(sub_agent("Weather"))?;
        tracing::info!(agent = self.name(), "All sub-agents completed");

        let suggestions = recommendations
            .get("suggestions")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let (suggestions, total) = price_suggestions(&input.breakdown, suggestions);

        Ok(json!({
            "carbonFootprint": co2.get("carbonFootprint").cloned().unwrap_or(Value::Null),
            "impact": co2.get("impact").cloned().unwrap_or(Value::Null),
            "suggestions": suggestions,
            "totalPotentialSavings": total,
            "weatherPrediction": prediction,
        }))
    }

    fn validate(&self, outcome: Outcome) -> Outcome {
        outcome.validated::<AnalysisReport>()
    }
}
