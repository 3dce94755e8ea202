use crate::infra::config::{LogConfig, LogSink};

/// Install the tracing subscriber from explicit settings. Later calls are no-ops.
pub fn init(cfg: &LogConfig) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(cfg.level.as_str())
        .with_target(false);
    let _ = match cfg.sink {
        LogSink::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogSink::Stdout => builder.with_writer(std::io::stdout).try_init(),
    };
}

/// Simple helper to log a metrics-like line alongside the `metrics` counters.
pub fn log_metric(tool: &str, metric: &str, value: f64) {
    tracing::info!(tool = tool, metric = metric, value = value, "metric");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        let cfg = LogConfig::default();
        init(&cfg);
        init(&LogConfig { level: "debug".into(), sink: LogSink::Stdout });
    }
}
