use thiserror::Error;

/// JSON-RPC error code used for every protocol-level failure.
pub const INTERNAL_ERROR: i32 = -32603;

/// Which side of the protocol boundary a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Protocol,
    UnknownTool,
    ToolExecution,
    NarrativeDegradation,
}

/// Envelope-level failures. Always rendered as a JSON-RPC error object.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Unknown method: {0}")]
    UnknownMethod(String),
    #[error("Invalid params: {0}")]
    InvalidParams(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProtocolError {
    pub fn code(&self) -> i32 {
        INTERNAL_ERROR
    }

    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Protocol
    }
}

/// Failures raised while resolving or executing a tool. These never leave the
/// invoker as protocol errors; they become `isError` content.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("{0} not configured")]
    MissingConfiguration(String),
    #[error("data provider error: {0}")]
    Provider(String),
    #[error("upstream error: {0}")]
    Upstream(String),
    #[error("narrative generation failed: {0}")]
    Narrative(String),
    /// Data was retrieved but narration failed; carries the raw data.
    #[error("Data retrieved successfully, but analysis failed: {reason}\n\nRaw data: {}", pretty(.raw))]
    Degraded { reason: String, raw: serde_json::Value },
}

fn pretty(v: &serde_json::Value) -> String {
    serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string())
}

impl ToolError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ToolError::UnknownTool(_) => ErrorKind::UnknownTool,
            ToolError::Degraded { .. } => ErrorKind::NarrativeDegradation,
            _ => ErrorKind::ToolExecution,
        }
    }

    pub fn degraded(reason: impl std::fmt::Display, raw: serde_json::Value) -> Self {
        ToolError::Degraded { reason: reason.to_string(), raw }
    }
}
