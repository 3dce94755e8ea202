use std::net::SocketAddr;
use std::sync::Arc;

use crate::api::mcp::Dispatcher;
use crate::core::mcp::ServerInfo;
use crate::infra::config::AppConfig;
use crate::tools::invoker::ToolInvoker;
use crate::tools::registry::{build_registry, business_tool, Collaborators};

/// Registry + invoker + dispatcher for this process.
pub fn build_dispatcher(cfg: &AppConfig, collaborators: &Collaborators) -> Dispatcher {
    let registry = build_registry(cfg.toolset, collaborators);
    tracing::info!(tools = registry.len(), toolset = ?cfg.toolset, "tool registry built");
    Dispatcher::new(
        ToolInvoker::new(registry),
        ServerInfo { name: cfg.server.name.clone(), version: cfg.server.version.clone() },
    )
}

pub fn build_router(cfg: &AppConfig) -> axum::Router {
    let collaborators = Collaborators::from_config(cfg);
    let dispatcher = Arc::new(build_dispatcher(cfg, &collaborators));
    if cfg.legacy_api && cfg.toolset.has_business() {
        let business = Arc::new(business_tool(&collaborators));
        crate::infra::http_app::build_app_with_legacy_api(dispatcher, business)
    } else {
        crate::infra::http_app::build_app(dispatcher)
    }
}

pub async fn run_server(cfg: AppConfig) -> anyhow::Result<()> {
    cfg.validate()?;
    tracing::info!(
        mode = %cfg.mode,
        port = cfg.port,
        legacy_api = cfg.legacy_api,
        "BOOT business-mcp-gateway"
    );

    // Stdio mode: run MCP over stdio ONLY (no HTTP).
    if cfg.is_stdio() {
        let collaborators = Collaborators::from_config(&cfg);
        let dispatcher = Arc::new(build_dispatcher(&cfg, &collaborators));
        crate::api::mcp::stdio_loop(dispatcher, tokio::io::stdin(), tokio::io::stdout()).await?;
        return Ok(());
    }

    let app = build_router(&cfg);
    let addr: SocketAddr = ([0, 0, 0, 0], cfg.port).into();
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;
    Ok(())
}
