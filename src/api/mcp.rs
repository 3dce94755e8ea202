//! JSON-RPC dispatcher shared by the HTTP and stdio transports.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::response::Response;
use serde_json::{json, Value as J};
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::core::content::CallToolResult;
use crate::core::error::ProtocolError;
use crate::core::mcp::{ok as rpc_ok, protocol_err, InitializeResult, RpcReq, RpcResp, ServerInfo};
use crate::core::tool::JsonObject;
use crate::infra::http::json as http_json;
use crate::tools::invoker::ToolInvoker;

/// Routes `initialize`, `tools/list` and `tools/call`. Holds no per-request
/// state; one instance serves every request of the process.
pub struct Dispatcher {
    invoker: ToolInvoker,
    server_info: ServerInfo,
}

impl Dispatcher {
    pub fn new(invoker: ToolInvoker, server_info: ServerInfo) -> Self {
        Self { invoker, server_info }
    }

    pub fn initialize(&self) -> InitializeResult {
        InitializeResult::new(self.server_info.clone())
    }

    pub fn list(&self) -> J {
        json!({ "tools": self.invoker.list() })
    }

    pub async fn call(&self, params: &J) -> Result<CallToolResult, ProtocolError> {
        let name = params
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ProtocolError::InvalidParams("missing tool name".into()))?;
        let arguments = match params.get("arguments") {
            None | Some(J::Null) => JsonObject::new(),
            Some(J::Object(map)) => map.clone(),
            Some(_) => {
                return Err(ProtocolError::InvalidParams("arguments must be an object".into()))
            }
        };
        tracing::debug!(tool = name, "tools/call");
        Ok(self.invoker.call(name, &arguments).await)
    }

    /// Raw request body to response. Never fails.
    pub async fn process(&self, body: &[u8]) -> RpcResp {
        match serde_json::from_slice::<J>(body) {
            Ok(value) => self.process_value(value).await,
            Err(e) => {
                tracing::warn!(error = %e, "unparsable request");
                protocol_err(J::Null, &ProtocolError::Parse(e.to_string()))
            }
        }
    }

    pub async fn process_value(&self, value: J) -> RpcResp {
        let id = extract_id(&value);
        let resp = match self.route(value).await {
            Ok(result) => rpc_ok(id, result),
            Err(e) => {
                tracing::warn!(error = %e, id = %id, "protocol error");
                protocol_err(id, &e)
            }
        };
        tracing::trace!(response = ?resp, "dispatch complete");
        resp
    }

    async fn route(&self, value: J) -> Result<J, ProtocolError> {
        if !value.is_object() {
            return Err(ProtocolError::InvalidRequest("expected a JSON object".into()));
        }
        let req: RpcReq =
            serde_json::from_value(value).map_err(|e| ProtocolError::InvalidRequest(e.to_string()))?;
        tracing::debug!(method = ?req.method, id = %req.id, "dispatching");
        match req.method.as_deref() {
            Some("initialize") => to_json(&self.initialize()),
            Some("tools/list") => Ok(self.list()),
            Some("tools/call") => to_json(&self.call(&req.params).await?),
            Some(other) => Err(ProtocolError::UnknownMethod(other.to_owned())),
            None => Err(ProtocolError::UnknownMethod("<missing>".into())),
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<J, ProtocolError> {
    serde_json::to_value(value).map_err(|e| ProtocolError::Internal(e.to_string()))
}

fn extract_id(value: &J) -> J {
    value.get("id").cloned().unwrap_or(J::Null)
}

/// Run one dispatch on its own task so a panic below the dispatcher still
/// produces a protocol error instead of a dropped connection.
pub async fn dispatch_guarded(dispatcher: Arc<Dispatcher>, body: Bytes) -> RpcResp {
    let task_body = body.clone();
    match tokio::spawn(async move { dispatcher.process(&task_body).await }).await {
        Ok(resp) => resp,
        Err(e) => {
            tracing::error!(error = %e, "dispatch task failed");
            let id = serde_json::from_slice::<J>(&body)
                .map(|v| extract_id(&v))
                .unwrap_or(J::Null);
            protocol_err(id, &ProtocolError::Internal(e.to_string()))
        }
    }
}

// HTTP handler. A body the extractor refuses (e.g. over the size limit)
// still gets a JSON-RPC error with status 200.
pub async fn http(
    State(dispatcher): State<Arc<Dispatcher>>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let resp = match body {
        Ok(body) => dispatch_guarded(dispatcher, body).await,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "request body rejected");
            protocol_err(J::Null, &ProtocolError::InvalidRequest(rejection.body_text()))
        }
    };
    http_json::rpc_response(&resp)
}

fn trim_line(line: &[u8]) -> &[u8] {
    let start = line.iter().position(|b| !b.is_ascii_whitespace()).unwrap_or(line.len());
    let end = line.iter().rposition(|b| !b.is_ascii_whitespace()).map_or(start, |i| i + 1);
    &line[start..end]
}

/// Line-delimited JSON-RPC over any reader/writer pair (stdin/stdout in
/// `MODE=stdio`).
pub async fn stdio_loop<R, W>(dispatcher: Arc<Dispatcher>, reader: R, mut writer: W) -> anyhow::Result<()>
where
    R: tokio::io::AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    tracing::info!("mode=stdio");
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        // raw bytes: invalid UTF-8 becomes a parse error, not EOF
        let line = trim_line(&buf);
        if line.is_empty() {
            continue;
        }
        let resp = dispatch_guarded(dispatcher.clone(), Bytes::copy_from_slice(line)).await;
        let mut out = serde_json::to_vec(&resp)?;
        out.push(b'\n');
        writer.write_all(&out).await?;
        writer.flush().await?;
    }
    Ok(())
}
