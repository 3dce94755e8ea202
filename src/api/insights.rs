//! Legacy prompt endpoint: `POST /v1/insights {"prompt": "..."}` runs the
//! narrated business pipeline outside JSON-RPC.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::core::error::ErrorKind;
use crate::infra::http::json::json_response;
use crate::tools::business::{BusinessQueryTool, DEFAULT_PROMPT};

#[derive(Deserialize, Debug, Default)]
pub struct InsightsReq {
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct InsightsResp {
    pub response: String,
    pub queries_executed: Vec<String>,
    pub timestamp: String,
    pub data_points: usize,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct InsightsErr {
    pub error: String,
    pub timestamp: String,
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

pub async fn http(
    State(tool): State<Arc<BusinessQueryTool>>,
    body: Option<Json<InsightsReq>>,
) -> Response {
    let req = body.map(|Json(r)| r).unwrap_or_default();
    let prompt = req.prompt.as_deref().unwrap_or(DEFAULT_PROMPT);
    tracing::debug!(prompt, "legacy insights request");

    let insights = match tool.analyze(prompt).await {
        Ok(i) => i,
        Err(e) => {
            tracing::error!(error = %e, "legacy insights failed");
            return json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &InsightsErr { error: e.to_string(), timestamp: now() },
            );
        }
    };

    let queries_executed = insights
        .aggregated
        .executed_names()
        .into_iter()
        .map(str::to_owned)
        .collect();
    let data_points = insights.aggregated.data.len();
    let response = match insights.into_text() {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NarrativeDegradation => e.to_string(),
        Err(e) => {
            return json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &InsightsErr { error: e.to_string(), timestamp: now() },
            )
        }
    };

    json_response(
        StatusCode::OK,
        &InsightsResp { response, queries_executed, timestamp: now(), data_points },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{DataProvider, NarrativeGenerator, UnconfiguredNarrator, UnconfiguredProvider};
    use crate::core::error::ToolError;
    use crate::domain::{AggregatedResult, Category, QueryParams};
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::{routing::post, Router};
    use hyper::Request;
    use serde_json::{json, Value as J};
    use tower::ServiceExt;

    struct Rows;

    #[async_trait]
    impl DataProvider for Rows {
        async fn execute_query(&self, category: Category, _: &QueryParams) -> Result<J, ToolError> {
            Ok(json!({ "category": category.as_str() }))
        }
    }

    struct Fixed;

    #[async_trait]
    impl NarrativeGenerator for Fixed {
        async fn generate(&self, _: &AggregatedResult, prompt: &str) -> Result<String, ToolError> {
            Ok(format!("analysis of: {prompt}"))
        }
    }

    fn app(provider: Arc<dyn DataProvider>, narrator: Arc<dyn NarrativeGenerator>) -> Router {
        Router::new()
            .route("/v1/insights", post(super::http))
            .with_state(Arc::new(BusinessQueryTool::new(provider, narrator)))
    }

    async fn post_json(app: Router, body: &str) -> (StatusCode, J) {
        let req = Request::builder()
            .method("POST")
            .uri("/v1/insights")
            .header("content-type", "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), 1 << 20).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn returns_narrative_and_query_summary() {
        let (status, v) = post_json(app(Arc::new(Rows), Arc::new(Fixed)), r#"{"prompt":"customer vip list"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(v["response"], "analysis of: customer vip list");
        assert_eq!(v["queries_executed"], json!(["customer"]));
        assert_eq!(v["data_points"], 1);
        assert!(v["timestamp"].is_string());
    }

    #[tokio::test]
    async fn empty_object_uses_default_prompt() {
        let (_, v) = post_json(app(Arc::new(Rows), Arc::new(Fixed)), "{}").await;
        assert_eq!(v["response"], format!("analysis of: {DEFAULT_PROMPT}"));
    }

    #[tokio::test]
    async fn narrator_failure_still_returns_data() {
        let (status, v) = post_json(app(Arc::new(Rows), Arc::new(UnconfiguredNarrator)), "{}").await;
        assert_eq!(status, StatusCode::OK);
        assert!(v["response"].as_str().unwrap().contains("Raw data"));
    }

    #[tokio::test]
    async fn provider_failure_is_500() {
        let (status, v) = post_json(app(Arc::new(UnconfiguredProvider), Arc::new(Fixed)), "{}").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(v["error"].as_str().unwrap().contains("DATA_PROVIDER_BASE_URL"));
    }
}
