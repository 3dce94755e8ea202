use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value as JsonValue;
use std::time::Instant;

use crate::core::error::ToolError;
use crate::domain::{Category, QueryParams};
use crate::infra::config::ToolConfig;
use crate::infra::http::headers::add_standard_headers;
use crate::infra::runtime::limits::make_http_client_with;

/// Executes one structured query against the backing store.
#[async_trait]
pub trait DataProvider: Send + Sync {
    async fn execute_query(
        &self,
        category: Category,
        params: &QueryParams,
    ) -> Result<JsonValue, ToolError>;
}

/// Remote query service: `POST {base}/api/query/{entry_point}`.
#[derive(Clone)]
pub struct QueryServiceRemote {
    base: String,
    http: Client,
}

impl QueryServiceRemote {
    pub fn new(base: impl Into<String>) -> Result<Self, ToolError> {
        Self::from_config(&ToolConfig::with_base_url(base))
    }

    pub fn from_config(cfg: &ToolConfig) -> Result<Self, ToolError> {
        let base = cfg
            .base_url()
            .ok_or_else(|| ToolError::MissingConfiguration("DATA_PROVIDER_BASE_URL".into()))?
            .to_owned();
        let http = make_http_client_with(cfg).map_err(|e| ToolError::Provider(e.to_string()))?;
        Ok(Self { base, http })
    }

    pub async fn health(&self) -> bool {
        let url = format!("{}/health", self.base.trim_end_matches('/'));
        let (builder, _rid) = add_standard_headers(self.http.get(url), None);
        match builder.send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }
}

#[async_trait]
impl DataProvider for QueryServiceRemote {
    async fn execute_query(
        &self,
        category: Category,
        params: &QueryParams,
    ) -> Result<JsonValue, ToolError> {
        let url = format!(
            "{}/api/query/{}",
            self.base.trim_end_matches('/'),
            category.entry_point()
        );
        tracing::debug!(endpoint = %url, %category, ?params, "query_service.execute request");

        let start = Instant::now();
        let res: Result<JsonValue, String> = async {
            let (builder, rid) = add_standard_headers(self.http.post(&url), None);
            let resp = builder.json(params).send().await.map_err(|e| e.to_string())?;
            if !resp.status().is_success() {
                return Err(format!("upstream status {} (request {rid})", resp.status()));
            }
            resp.json::<JsonValue>().await.map_err(|e| e.to_string())
        }
        .await;

        let tool = format!("query.{}", category.as_str());
        if res.is_err() {
            crate::infra::logging::log_metric(&tool, "remote_error_total", 1.0);
        }
        let out = res.map_err(ToolError::Provider)?;
        let elapsed_ms = start.elapsed().as_millis() as f64;
        crate::infra::logging::log_metric(&tool, "remote_latency_ms", elapsed_ms);
        Ok(out)
    }
}

/// Stand-in used when no provider URL is configured; keeps the service up
/// while every data call reports the missing setting.
#[derive(Clone, Default)]
pub struct UnconfiguredProvider;

#[async_trait]
impl DataProvider for UnconfiguredProvider {
    async fn execute_query(&self, _: Category, _: &QueryParams) -> Result<JsonValue, ToolError> {
        Err(ToolError::MissingConfiguration("DATA_PROVIDER_BASE_URL".into()))
    }
}
