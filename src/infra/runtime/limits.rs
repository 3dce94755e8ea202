use std::time::Duration;

use crate::infra::config::ToolConfig;

/// Build a reqwest client for one collaborator: bounded connect/total
/// timeouts, no redirects, and no idle pooling so every call opens its own
/// connection and drops it when the response is consumed.
pub fn make_http_client_with(cfg: &ToolConfig) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_millis(cfg.connect_timeout_ms()))
        .timeout(Duration::from_millis(cfg.timeout_ms()))
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(0)
        .build()
}
