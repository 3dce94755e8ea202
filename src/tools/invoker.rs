use crate::core::content::CallToolResult;
use crate::core::error::{ErrorKind, ToolError};
use crate::core::tool::{JsonObject, ToolDescriptor};
use crate::tools::registry::ToolRegistry;

/// Resolves a tool by name, runs it once, and renders the outcome as a
/// `tools/call` result. Never returns an error: every failure becomes content.
#[derive(Clone)]
pub struct ToolInvoker {
    registry: ToolRegistry,
}

impl ToolInvoker {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    pub fn list(&self) -> &[ToolDescriptor] {
        self.registry.list()
    }

    pub async fn call(&self, name: &str, arguments: &JsonObject) -> CallToolResult {
        let outcome = match self.registry.get(name) {
            Some(tool) => tool.call(arguments).await,
            None => Err(ToolError::UnknownTool(name.to_owned())),
        };
        let result = render(name, outcome);
        let label = if result.is_error() { "error" } else { "ok" };
        metrics::counter!("tool_calls_total", "tool" => self.metric_label(name), "outcome" => label)
            .increment(1);
        result
    }

    /// Registered tool name, or `"unknown"` so caller-chosen names never
    /// become label values.
    fn metric_label(&self, name: &str) -> &'static str {
        self.registry.get(name).map_or("unknown", |tool| tool.name())
    }
}

fn render(name: &str, outcome: Result<String, ToolError>) -> CallToolResult {
    match outcome {
        Ok(text) => CallToolResult::success(text),
        Err(e) => match e.kind() {
            ErrorKind::NarrativeDegradation => {
                tracing::warn!(tool = name, "returning raw data without narrative");
                CallToolResult::success(e.to_string())
            }
            ErrorKind::UnknownTool => {
                tracing::warn!(tool = name, "unknown tool requested");
                CallToolResult::error(e.to_string())
            }
            ErrorKind::ToolExecution | ErrorKind::Protocol => {
                tracing::warn!(tool = name, error = %e, "tool execution failed");
                CallToolResult::error(format!("Error executing {name}: {e}"))
            }
        },
    }
}
