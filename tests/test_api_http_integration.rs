use axum::body::Body;
use http_body_util::BodyExt;
use httpmock::prelude::*;
use hyper::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use business_mcp_gateway::infra::boot::build_router;
use business_mcp_gateway::infra::config::{AppConfig, ToolConfig, Toolset};

fn legacy_config(provider: &MockServer) -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.legacy_api = true;
    cfg.data_provider = ToolConfig::with_base_url(provider.base_url());
    cfg
}

async fn post(app: axum::Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn legacy_insights_reports_queries_and_degraded_text() {
    let provider = MockServer::start();
    provider.mock(|when, then| {
        when.method(POST).path("/api/query/product_sales");
        then.status(200).json_body(json!([{"sku": "B2"}]));
    });
    // no OpenAI key configured: narration fails, data is still returned
    let app = build_router(&legacy_config(&provider));

    let (status, v) = post(app, "/v1/insights", r#"{"prompt":"best selling products"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["queries_executed"], json!(["product"]));
    assert_eq!(v["data_points"], 1);
    assert!(v["response"].as_str().unwrap().contains("B2"));
}

#[tokio::test]
async fn legacy_route_absent_without_flag_or_business_toolset() {
    let provider = MockServer::start();
    let mut cfg = legacy_config(&provider);
    cfg.legacy_api = false;
    let (status, _) = post(build_router(&cfg), "/v1/insights", "{}").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let mut cfg = legacy_config(&provider);
    cfg.toolset = Toolset::Weather;
    let (status, _) = post(build_router(&cfg), "/v1/insights", "{}").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn weather_only_gateway_lists_single_tool() {
    let provider = MockServer::start();
    let mut cfg = AppConfig::default();
    cfg.toolset = Toolset::Weather;
    cfg.server.name = "weather-agent".into();
    cfg.weather = ToolConfig::with_base_url(provider.base_url());

    let (status, v) = post(
        build_router(&cfg),
        "/mcp",
        r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let tools = v["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0]["name"], "get_weather_forecast");
    assert_eq!(tools[0]["inputSchema"]["required"], json!(["location"]));
}
