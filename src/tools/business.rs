use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use crate::clients::{DataProvider, NarrativeGenerator};
use crate::core::error::ToolError;
use crate::core::tool::{opt_str, JsonObject, Tool, ToolSpec};
use crate::domain::aggregator::Aggregator;
use crate::domain::classifier::classify;
use crate::domain::AggregatedResult;

pub const DEFAULT_PROMPT: &str = "Show me a business performance summary";

/// `query_business_data`: classify the prompt, aggregate provider data,
/// narrate it.
#[derive(Clone)]
pub struct BusinessQueryTool {
    provider: Arc<dyn DataProvider>,
    narrator: Arc<dyn NarrativeGenerator>,
}

/// Aggregated data plus the narrator's outcome for it.
#[derive(Debug)]
pub struct Insights {
    pub aggregated: AggregatedResult,
    pub narrative: Result<String, ToolError>,
}

impl Insights {
    /// Narrative text, or a `Degraded` error carrying the raw data.
    pub fn into_text(self) -> Result<String, ToolError> {
        let Insights { aggregated, narrative } = self;
        narrative.map_err(|e| {
            let raw = serde_json::to_value(&aggregated).unwrap_or_default();
            ToolError::degraded(e, raw)
        })
    }
}

impl BusinessQueryTool {
    pub fn new(provider: Arc<dyn DataProvider>, narrator: Arc<dyn NarrativeGenerator>) -> Self {
        Self { provider, narrator }
    }

    /// Fails only when aggregation fails; narration failures are kept in
    /// the returned `Insights`.
    pub async fn analyze(&self, prompt: &str) -> Result<Insights, ToolError> {
        tracing::debug!(prompt, "analyzing business request");
        let classification = classify(prompt);
        let aggregated = Aggregator::new(self.provider.as_ref())
            .aggregate(&classification)
            .await?;
        let narrative = self.narrator.generate(&aggregated, prompt).await;
        if let Err(e) = &narrative {
            tracing::warn!(error = %e, "narrative generation failed; returning raw data");
        }
        Ok(Insights { aggregated, narrative })
    }
}

impl ToolSpec for BusinessQueryTool {
    fn name(&self) -> &'static str {
        "query_business_data"
    }
    fn description(&self) -> &'static str {
        "Query business data and get AI-powered insights"
    }
    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Natural language query about business data"
                }
            },
            "required": ["query"]
        })
    }
}

#[async_trait]
impl Tool for BusinessQueryTool {
    async fn call(&self, arguments: &JsonObject) -> Result<String, ToolError> {
        let prompt = opt_str(arguments, "query")?.unwrap_or(DEFAULT_PROMPT);
        self.analyze(prompt).await?.into_text()
    }
}
