//! Electricity bill parsing agent.
//!
//! Routes by modality: extracted text is embedded in the prompt (cut to the
//! configured character budget), while a scanned or image-based document is
//! attached to the same request under a prompt that embeds no text.

use super::{parse_input, Agent, ModelInvoker};
use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::llm::{Attachment, LlmProvider};
use crate::outcome::Outcome;
use crate::prompt::{truncate_chars, PromptTemplate};
use crate::response::preview;
use crate::schema::BillSummary;
use crate::types::BillDocumentInput;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

/// Where the bill content comes from for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum BillSource<'a> {
    /// Plain text extracted from the document
    Text(&'a str),
    /// The document itself, sent alongside the prompt
    Document(Attachment),
}

impl<'a> BillSource<'a> {
    /// Select the mode from `isImageBased` and require that mode's field.
    pub fn route(input: &'a BillDocumentInput) -> Result<Self, AgentError> {
        if input.is_image_based {
            let encoded = input
                .pdf_base64
                .as_deref()
                .map(str::trim)
                .filter(|data| !data.is_empty())
                .ok_or_else(|| AgentError::Input("No PDF base64 data provided".into()))?;
            let attachment = Attachment::from_base64(encoded, input.mime_type.as_deref())?;
            Ok(Self::Document(attachment))
        } else {
            let text = input
                .pdf_text
                .as_deref()
                .filter(|text| !text.is_empty())
                .ok_or_else(|| AgentError::Input("No PDF text provided".into()))?;
            Ok(Self::Text(text))
        }
    }
}

pub struct BillParserAgent {
    invoker: ModelInvoker,
    text_budget: usize,
}

impl BillParserAgent {
    pub fn new(provider: Arc<dyn LlmProvider>, config: &AgentConfig) -> Self {
        Self {
            invoker: ModelInvoker::new(provider, config),
            text_budget: config.text_budget,
        }
    }

    /// Prompt for extracted bill text, keeping at most `text_budget` characters.
    pub fn text_prompt(&self, text: &str) -> String {
        let kept = truncate_chars(text, self.text_budget);
        if kept.len() < text.len() {
            tracing::debug!(
                kept = self.text_budget,
                total = text.chars().count(),
                "Bill text exceeds budget, trailing content dropped"
            );
        }

        extraction_template(
            "You are an Electricity Bill Parser Agent. Your task is to extract key billing \
             information from the provided bill text.",
        )
        .section("Bill Text", kept)
        .render()
    }

    /// Prompt for an attached document. Embeds no document content.
    pub fn document_prompt(&self) -> String {
        extraction_template(
            "You are an Electricity Bill Parser Agent. Analyze the attached electricity bill \
             and extract the key billing information.",
        )
        .render()
    }
}

fn extraction_template(persona: &str) -> PromptTemplate {
    PromptTemplate::new(
        persona,
        json!({
            "totalAmount": 3450.50,
            "totalUnits": 420,
            "billingPeriod": "Oct 2023 - Nov 2023",
            "consumerNumber": "1234567890",
            "confidence": "high"
        }),
    )
    .task("Extract the Total Bill Amount (in INR or the currency shown).")
    .task("Extract the Total Units Consumed (in kWh).")
    .task("Extract the Billing Period (if available).")
    .task("Extract the Consumer/Account Number (if available).")
    .note("If a field is not found, use null for that field.")
    .note(
        "\"confidence\" should be \"high\", \"medium\", or \"low\" based on how clearly the \
         data was identified.",
    )
}

#[async_trait]
impl Agent for BillParserAgent {
    fn name(&self) -> &'static str {
        "bill-parser"
    }

    async fn execute(&self, input: &Value) -> Result<Value, AgentError> {
        let input: BillDocumentInput = parse_input(input)?;

        match BillSource::route(&input)? {
            BillSource::Text(text) => {
                tracing::info!(
                    agent = self.name(),
                    mode = "text",
                    chars = text.chars().count(),
                    "Parsing bill"
                );
                tracing::debug!("First 200 chars of input: {}", preview(text, 200));
                self.invoker
                    .complete(self.name(), self.text_prompt(text), None)
                    .await
            }
            BillSource::Document(attachment) => {
                tracing::info!(
                    agent = self.name(),
                    mode = "document",
                    media_type = %attachment.media_type,
                    base64_len = attachment.data.len(),
                    "Parsing bill"
                );
                self.invoker
                    .complete(self.name(), self.document_prompt(), Some(attachment))
                    .await
            }
        }
    }

    fn validate(&self, outcome: Outcome) -> Outcome {
        outcome.validated::<BillSummary>()
    }
}
