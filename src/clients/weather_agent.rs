use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::core::error::ToolError;
use crate::infra::config::ToolConfig;
use crate::infra::http::headers::add_standard_headers;
use crate::infra::runtime::limits::make_http_client_with;

/// External forecasting agent. Takes a natural-language instruction.
#[async_trait]
pub trait WeatherAgent: Send + Sync {
    async fn forecast(&self, prompt: &str) -> Result<String, ToolError>;
}

#[derive(Clone)]
pub struct WeatherAgentRemote {
    base: String,
    http: Client,
}

#[derive(Serialize)]
struct PromptReq<'a> {
    prompt: &'a str,
}

impl WeatherAgentRemote {
    pub fn from_config(cfg: &ToolConfig) -> Result<Self, ToolError> {
        let base = cfg
            .base_url()
            .ok_or_else(|| ToolError::MissingConfiguration("WEATHER_AGENT_BASE_URL".into()))?
            .to_owned();
        let http = make_http_client_with(cfg).map_err(|e| ToolError::Upstream(e.to_string()))?;
        Ok(Self { base, http })
    }
}

#[async_trait]
impl WeatherAgent for WeatherAgentRemote {
    async fn forecast(&self, prompt: &str) -> Result<String, ToolError> {
        let url = format!("{}/forecast", self.base.trim_end_matches('/'));
        tracing::debug!(endpoint = %url, "weather_agent.forecast request");
        let (builder, _rid) = add_standard_headers(self.http.post(url), None);
        let resp = builder
            .json(&PromptReq { prompt })
            .send()
            .await
            .map_err(|e| ToolError::Upstream(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(ToolError::Upstream(format!("upstream status {}", resp.status())));
        }
        resp.text().await.map_err(|e| ToolError::Upstream(e.to_string()))
    }
}

#[derive(Clone, Default)]
pub struct UnconfiguredWeatherAgent;

#[async_trait]
impl WeatherAgent for UnconfiguredWeatherAgent {
    async fn forecast(&self, _: &str) -> Result<String, ToolError> {
        Err(ToolError::MissingConfiguration("WEATHER_AGENT_BASE_URL".into()))
    }
}
