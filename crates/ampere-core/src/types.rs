//! Core data types: normalized agent inputs and enrichment data.
//!
//! Inputs are decoded from the caller's JSON payload by borrowing it; agents
//! never mutate what they are given. Appliance records that are embedded into
//! prompts stay as raw JSON values so that fields this crate does not know
//! about still reach the model.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One appliance usage record from a normalized bill breakdown.
///
/// Every numeric field is optional: callers send whatever they derived, and
/// the agents only need `name` to match suggestions back to appliances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplianceUsage {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watts: Option<f64>,
    /// Derived monthly energy in kWh
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_units: Option<f64>,
    /// Derived monthly cost in the bill's currency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<f64>,
}

/// Input for the footprint and recommendation agents.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BreakdownInput {
    /// Appliance records, embedded into the prompt verbatim
    #[serde(default)]
    pub breakdown: Vec<Value>,
}

/// Input for the bill parsing agent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillDocumentInput {
    /// Selects document (true) or extracted-text (false) mode
    #[serde(default)]
    pub is_image_based: bool,

    /// Extracted plain text, required in text mode
    #[serde(default)]
    pub pdf_text: Option<String>,

    /// Base64-encoded document bytes, required in document mode
    #[serde(default)]
    pub pdf_base64: Option<String>,

    /// Explicit MIME type for the document bytes; sniffed when absent
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// Input for the weather-based bill prediction agent.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionInput {
    pub city: String,
    pub current_month: String,
    pub current_bill: f64,
    #[serde(default)]
    pub appliances: Vec<Value>,
}

/// Input for the combined analysis agent.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisInput {
    /// Required: an analysis of no bill is an input error
    pub breakdown: Vec<Value>,
    #[serde(default = "default_city")]
    pub city: String,
    pub current_month: String,
}

fn default_city() -> String {
    "Mumbai".to_string()
}

/// Current weather conditions for a city, used to enrich prediction prompts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Temperature in degrees Celsius
    pub temperature: f64,
    /// Relative humidity in percent
    pub humidity: f64,
    /// Short condition text, e.g. "haze"
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_appliance_usage_partial_record() {
        let usage: ApplianceUsage =
            serde_json::from_value(json!({"name": "Air Conditioner", "monthlyUnits": 720}))
                .unwrap();
        assert_eq!(usage.name, "Air Conditioner");
        assert_eq!(usage.monthly_units, Some(720.0));
        assert!(usage.estimated_cost.is_none());
    }

    #[test]
    fn test_breakdown_defaults_to_empty() {
        let input: BreakdownInput = serde_json::from_value(json!({})).unwrap();
        assert!(input.breakdown.is_empty());
    }

    #[test]
    fn test_bill_document_input_null_fields() {
        let input: BillDocumentInput =
            serde_json::from_value(json!({"isImageBased": true, "pdfBase64": null})).unwrap();
        assert!(input.is_image_based);
        assert!(input.pdf_base64.is_none());
        assert!(input.pdf_text.is_none());
    }

    #[test]
    fn test_analysis_input_default_city() {
        let input: AnalysisInput =
            serde_json::from_value(json!({"breakdown": [], "currentMonth": "November"})).unwrap();
        assert_eq!(input.city, "Mumbai");
    }

    #[test]
    fn test_prediction_input_requires_bill() {
        let result = serde_json::from_value::<PredictionInput>(
            json!({"city": "Pune", "currentMonth": "May"}),
        );
        assert!(result.is_err());
    }
}
