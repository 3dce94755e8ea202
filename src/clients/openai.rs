use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt::Write as _;

use crate::core::error::ToolError;
use crate::domain::{AggregatedResult, Category};
use crate::infra::config::NarrativeConfig;
use crate::infra::http::headers::add_standard_headers;
use crate::infra::runtime::limits::make_http_client_with;

const SYSTEM_PROMPT: &str = "You are a senior business analyst. Analyze the provided data and give actionable insights.

Focus on:
- Key trends and patterns
- Performance highlights and concerns
- Actionable recommendations
- Executive-level summary

Be specific with numbers and provide context.";

const TEMPERATURE: f32 = 0.3;

/// Turns aggregated data plus the user's prompt into prose.
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    async fn generate(&self, data: &AggregatedResult, prompt: &str) -> Result<String, ToolError>;
}

/// OpenAI-compatible chat completion client.
#[derive(Clone)]
pub struct OpenAiNarrator {
    base: String,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
    http: Client,
}

impl OpenAiNarrator {
    pub fn from_config(cfg: &NarrativeConfig) -> Result<Self, ToolError> {
        let http = make_http_client_with(&cfg.http()).map_err(|e| ToolError::Narrative(e.to_string()))?;
        Ok(Self {
            base: cfg.base_url.clone(),
            api_key: cfg.api_key.clone().filter(|k| !k.trim().is_empty()),
            model: cfg.model.clone(),
            max_tokens: cfg.max_tokens,
            http,
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl NarrativeGenerator for OpenAiNarrator {
    async fn generate(&self, data: &AggregatedResult, prompt: &str) -> Result<String, ToolError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ToolError::Narrative(
                "OpenAI API key not found. Set OPENAI_API_KEY or OPENAI_KEY environment variable.".into(),
            )
        })?;

        let summary = summarize(data, prompt);
        let body = ChatRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: TEMPERATURE,
            messages: [
                ChatMessage { role: "system", content: SYSTEM_PROMPT },
                ChatMessage { role: "user", content: &summary },
            ],
        };

        let url = format!("{}/v1/chat/completions", self.base.trim_end_matches('/'));
        tracing::debug!(endpoint = %url, model = %self.model, "narrative.generate request");
        let (builder, _rid) = add_standard_headers(self.http.post(url), None);
        let resp = builder
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ToolError::Narrative(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(ToolError::Narrative(format!("upstream status {}", resp.status())));
        }
        let parsed: ChatResponse = resp
            .json()
            .await
            .map_err(|e| ToolError::Narrative(e.to_string()))?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ToolError::Narrative("empty completion".into()))
    }
}

/// User message for the analyst: request, executed queries, then each
/// category's data.
pub fn summarize(data: &AggregatedResult, prompt: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "User Request: {prompt}");
    let _ = writeln!(out);
    let _ = writeln!(out, "Queries Executed: {}", data.executed_names().join(", "));
    let _ = writeln!(out);
    let _ = writeln!(out, "DATA ANALYSIS:");
    for category in &data.executed {
        let Some(value) = data.get(*category) else { continue };
        let _ = writeln!(out);
        let _ = writeln!(out, "{}:", section_title(*category));
        let _ = writeln!(out, "{}", pretty(value));
    }
    let _ = writeln!(out);
    out.push_str("Please provide comprehensive business insights and recommendations based on this data.");
    out
}

fn section_title(category: Category) -> &'static str {
    match category {
        Category::Revenue => "REVENUE PERFORMANCE",
        Category::Product => "PRODUCT PERFORMANCE",
        Category::Customer => "CUSTOMER ANALYSIS",
    }
}

fn pretty(value: &JsonValue) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Narrator used when no model endpoint is wanted; always degrades.
#[derive(Clone, Default)]
pub struct UnconfiguredNarrator;

#[async_trait]
impl NarrativeGenerator for UnconfiguredNarrator {
    async fn generate(&self, _: &AggregatedResult, _: &str) -> Result<String, ToolError> {
        Err(ToolError::Narrative("narrative generator not configured".into()))
    }
}
