//! Typed output schemas for opt-in strict validation.
//!
//! The decoder accepts any syntactically valid JSON. Callers that need a
//! stronger guarantee run the decoded payload through [`Schema::check`] for
//! the agent that produced it; the payload itself is never rewritten.

use crate::error::AgentError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An output shape an agent asks the model for.
pub trait Schema: DeserializeOwned {
    /// Human-readable schema name used in diagnostics.
    const NAME: &'static str;

    /// Value-level checks beyond what deserialization enforces.
    fn verify(&self) -> Result<(), String> {
        Ok(())
    }

    /// Deserialize `payload` into `Self` and run [`Schema::verify`].
    fn check(payload: &Value) -> Result<(), AgentError> {
        let parsed = Self::deserialize(payload).map_err(|e| AgentError::Schema {
            schema: Self::NAME,
            message: e.to_string(),
        })?;
        parsed.verify().map_err(|message| AgentError::Schema {
            schema: Self::NAME,
            message,
        })
    }
}

/// A footprint figure: models return either a number of kilograms or a
/// labelled string such as "150 kg CO2".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CarbonAmount {
    Kilograms(f64),
    Label(String),
}

/// One per-appliance savings suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub name: String,
    /// Fraction of the appliance's consumption saved, e.g. 0.15
    pub reduction_percentage: f64,
    pub strategy: String,
}

impl Suggestion {
    fn verify(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.reduction_percentage) {
            return Err(format!(
                "reductionPercentage for '{}' must be a fraction between 0 and 1, got {}",
                self.name, self.reduction_percentage
            ));
        }
        Ok(())
    }
}

/// Footprint agent output in savings mode.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsReport {
    pub carbon_footprint: CarbonAmount,
    pub suggestions: Vec<Suggestion>,
}

impl Schema for SavingsReport {
    const NAME: &'static str = "savings report";

    fn verify(&self) -> Result<(), String> {
        self.suggestions.iter().try_for_each(Suggestion::verify)
    }
}

/// Tangible equivalents of a footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Impact {
    pub trees: f64,
    pub car_km: f64,
    pub description: String,
}

/// Footprint agent output in impact mode.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactReport {
    pub carbon_footprint: CarbonAmount,
    pub impact: Impact,
}

impl Schema for ImpactReport {
    const NAME: &'static str = "impact report";
}

/// Recommendation agent output.
#[derive(Debug, Clone, Deserialize)]
pub struct Recommendations {
    pub suggestions: Vec<Suggestion>,
}

impl Schema for Recommendations {
    const NAME: &'static str = "recommendations";

    fn verify(&self) -> Result<(), String> {
        self.suggestions.iter().try_for_each(Suggestion::verify)
    }
}

/// How clearly the bill fields were identified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Bill parsing agent output. Fields the model could not find are null.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillSummary {
    pub total_amount: Option<f64>,
    pub total_units: Option<f64>,
    pub billing_period: Option<String>,
    pub consumer_number: Option<String>,
    pub confidence: Confidence,
}

impl Schema for BillSummary {
    const NAME: &'static str = "bill summary";
}

/// Weather prediction agent output.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillPrediction {
    pub next_month: String,
    /// Multiplier applied to the current bill
    pub weather_factor: f64,
    pub predicted_bill: f64,
    pub reasoning: String,
}

impl Schema for BillPrediction {
    const NAME: &'static str = "bill prediction";

    fn verify(&self) -> Result<(), String> {
        if !self.weather_factor.is_finite() || self.weather_factor <= 0.0 {
            return Err(format!(
                "weatherFactor must be a positive multiplier, got {}",
                self.weather_factor
            ));
        }
        Ok(())
    }
}

/// Savings suggestion annotated with the money it would save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedSuggestion {
    #[serde(flatten)]
    pub suggestion: Suggestion,
    pub saved_amount: f64,
    pub currency: String,
}

/// Combined analysis output.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub carbon_footprint: CarbonAmount,
    pub impact: Impact,
    pub suggestions: Vec<PricedSuggestion>,
    pub total_potential_savings: f64,
    pub weather_prediction: BillPrediction,
}

impl Schema for AnalysisReport {
    const NAME: &'static str = "analysis report";

    fn verify(&self) -> Result<(), String> {
        self.suggestions
            .iter()
            .try_for_each(|s| s.suggestion.verify())?;
        self.weather_prediction.verify()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_savings_report_accepts_label_or_number() {
        let labelled = json!({"carbonFootprint": "590 kg CO2", "suggestions": []});
        assert!(SavingsReport::check(&labelled).is_ok());

        let numeric = json!({"carbonFootprint": 590.4, "suggestions": []});
        assert!(SavingsReport::check(&numeric).is_ok());
    }

    #[test]
    fn test_suggestion_fraction_out_of_range() {
        let payload = json!({
            "suggestions": [
                {"name": "Air Conditioner", "reductionPercentage": 15, "strategy": "Raise the set point"}
            ]
        });
        let err = Recommendations::check(&payload).unwrap_err();
        assert!(err.to_string().contains("reductionPercentage"));
    }

    #[test]
    fn test_bill_summary_nullable_fields() {
        let payload = json!({
            "totalAmount": 3450.5,
            "totalUnits": null,
            "billingPeriod": null,
            "consumerNumber": "1234567890",
            "confidence": "medium"
        });
        assert!(BillSummary::check(&payload).is_ok());
    }

    #[test]
    fn test_bill_summary_rejects_unknown_confidence() {
        let payload = json!({"totalAmount": 10, "confidence": "certain"});
        let err = BillSummary::check(&payload).unwrap_err();
        assert!(err.to_string().contains("bill summary"));
    }

    #[test]
    fn test_impact_report_requires_impact() {
        let payload = json!({"carbonFootprint": 150.5});
        assert!(ImpactReport::check(&payload).is_err());
    }

    #[test]
    fn test_prediction_rejects_non_positive_factor() {
        let payload = json!({
            "nextMonth": "December",
            "weatherFactor": 0,
            "predictedBill": 0,
            "reasoning": "none"
        });
        let err = BillPrediction::check(&payload).unwrap_err();
        assert!(err.to_string().contains("weatherFactor"));
    }

    #[test]
    fn test_priced_suggestion_flattens() {
        let priced = PricedSuggestion {
            suggestion: Suggestion {
                name: "Fan".into(),
                reduction_percentage: 0.1,
                strategy: "Use the regulator".into(),
            },
            saved_amount: 12.5,
            currency: "INR".into(),
        };
        let value = serde_json::to_value(&priced).unwrap();
        assert_eq!(value["name"], "Fan");
        assert_eq!(value["savedAmount"], 12.5);
        assert_eq!(value["currency"], "INR");
    }
}
