use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::mcp::Dispatcher;
use crate::tools::business::BusinessQueryTool;

/// Largest accepted `/mcp` body; bigger requests get a JSON-RPC error.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Default app: `/healthz` + JSON-RPC at `/mcp`.
pub fn build_app(dispatcher: Arc<Dispatcher>) -> Router {
    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route("/mcp", post(crate::api::mcp::http))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(dispatcher)
}

/// Default app **plus** the legacy prompt route at `/v1/insights`.
pub fn build_app_with_legacy_api(dispatcher: Arc<Dispatcher>, business: Arc<BusinessQueryTool>) -> Router {
    let legacy = Router::new()
        .route("/v1/insights", post(crate::api::insights::http))
        .with_state(business);
    build_app(dispatcher).merge(legacy)
}
