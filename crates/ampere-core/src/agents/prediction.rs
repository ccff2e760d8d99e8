//! Weather-based bill prediction agent.
//!
//! Current conditions for the city are fetched before the model call and,
//! when available, folded into the prompt as a context block. Missing weather
//! never fails the prediction; the model falls back to seasonal reasoning.

use super::{parse_input, round2, Agent, ModelInvoker};
use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::llm::LlmProvider;
use crate::outcome::Outcome;
use crate::prompt::PromptTemplate;
use crate::schema::BillPrediction;
use crate::types::{PredictionInput, WeatherSnapshot};
use crate::weather::WeatherSource;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Name of the month after `current`.
///
/// Accepts full names and three-letter abbreviations in any case. Anything
/// unrecognised maps to "December".
pub fn following_month(current: &str) -> &'static str {
    let current = current.trim().to_lowercase();
    MONTHS
        .iter()
        .position(|month| {
            let month = month.to_lowercase();
            month == current || (current.len() == 3 && month.starts_with(&current))
        })
        .map(|idx| MONTHS[(idx + 1) % MONTHS.len()])
        .unwrap_or("December")
}

pub struct PredictionAgent {
    invoker: ModelInvoker,
    weather: Arc<dyn WeatherSource>,
}

impl PredictionAgent {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        config: &AgentConfig,
        weather: Arc<dyn WeatherSource>,
    ) -> Self {
        Self {
            invoker: ModelInvoker::new(provider, config),
            weather,
        }
    }

    /// Render the prompt, with the weather block only when `weather` is present.
    pub fn prompt(&self, input: &PredictionInput, weather: Option<&WeatherSnapshot>) -> String {
        let city = &input.city;
        let appliances = serde_json::to_string_pretty(&input.appliances)
            .unwrap_or_else(|_| Value::Array(input.appliances.clone()).to_string());

        PromptTemplate::new(
            "You are a Weather-Based Energy Consumption Predictor for India.",
            json!({
                "nextMonth": following_month(&input.current_month),
                "weatherFactor": 1.2,
                "predictedBill": round2(input.current_bill * 1.2),
                "reasoning": format!(
                    "Next month in {city} is typically cooler (15-20°C), reducing AC usage by 80% \
                     but fans still used moderately. Net effect: 20% increase in bill due to \
                     increased lighting hours."
                )
            }),
        )
        .section(
            "Input Data",
            format!(
                "- City: {city}\n- Current Month: {}\n- Current Bill: ₹{}\n- Appliances: {appliances}",
                input.current_month, input.current_bill
            ),
        )
        .context(weather.map(|w| weather_context(city, w)))
        .task(format!(
            "Analyze typical weather patterns for {city} in the NEXT month (consider Indian climate)."
        ))
        .task("Consider seasonal changes (temperature, humidity, monsoon, summer, winter).")
        .task(
            "Predict how appliance usage will change:\n\
             - AC/Cooling: increases in summer (Mar-Jun), decreases in winter/monsoon\n\
             - Fans: high in summer, moderate in other seasons\n\
             - Heating: increases in winter (Dec-Feb) in northern cities\n\
             - Refrigerator: slightly higher in summer\n\
             - Other appliances: minimal seasonal change",
        )
        .task("Calculate the percentage change in total bill for next month.")
        .note("Be realistic. Most changes are between 0.8x to 1.5x.")
        .note("predictedBill is the current bill multiplied by weatherFactor.")
        .render()
    }
}

fn weather_context(city: &str, weather: &WeatherSnapshot) -> String {
    format!(
        "Current Weather Data for {city}:\n\
         - Temperature: {}°C\n\
         - Humidity: {}%\n\
         - Conditions: {}\n\
         \n\
         Use this real data to make more accurate predictions.",
        weather.temperature, weather.humidity, weather.description
    )
}

#[async_trait]
impl Agent for PredictionAgent {
    fn name(&self) -> &'static str {
        "prediction"
    }

    async fn execute(&self, input: &Value) -> Result<Value, AgentError> {
        let input: PredictionInput = parse_input(input)?;
        tracing::info!(
            agent = self.name(),
            city = %input.city,
            month = %input.current_month,
            "Predicting next bill"
        );

        let weather = self.weather.fetch(&input.city).await;
        tracing::debug!(
            agent = self.name(),
            stage = "enrichment_attempted",
            available = weather.is_some()
        );

        let prompt = self.prompt(&input, weather.as_ref());
        self.invoker.complete(self.name(), prompt, None).await
    }

    fn validate(&self, outcome: Outcome) -> Outcome {
        outcome.validated::<BillPrediction>()
    }
}
