//! Outbound formatting: JSON bodies for the HTTP transport and pretty text
//! for tool content.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::core::mcp::{err as rpc_err, RpcResp};

/// 2-space indented JSON, as returned in direct-tool content.
pub fn to_pretty_text<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("<unserializable: {e}>"))
}

/// Serialize `body` with the standard headers. JSON-RPC traffic always uses
/// 200; failures live inside the body.
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    let bytes = match serde_json::to_vec(body) {
        Ok(b) => b,
        Err(e) => {
            tracing::error!(error = %e, "response serialization failed");
            let fallback = rpc_err(serde_json::Value::Null, -32603, format!("Internal error: {e}"));
            serde_json::to_vec(&fallback).unwrap_or_default()
        }
    };
    let mut resp = (status, bytes).into_response();
    let headers = resp.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    resp
}

pub fn rpc_response(resp: &RpcResp) -> Response {
    json_response(StatusCode::OK, resp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mcp::ok;
    use axum::body::to_bytes;
    use serde_json::{json, Value};

    #[test]
    fn pretty_text_uses_two_space_indent() {
        let s = to_pretty_text(&json!({"a": {"b": 1}}));
        assert_eq!(s, "{\n  \"a\": {\n    \"b\": 1\n  }\n}");
    }

    #[test]
    fn pretty_text_renders_dates_as_iso() {
        let d = chrono::NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(to_pretty_text(&json!({"date": d})), "{\n  \"date\": \"2024-02-29\"\n}");
    }

    #[tokio::test]
    async fn rpc_response_is_200_with_cors_and_json_headers() {
        let resp = rpc_response(&ok(json!(7), json!({"x": 1})));
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        let bytes = to_bytes(resp.into_body(), 1 << 20).await.unwrap();
        let v: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(v["id"], 7);
        assert_eq!(v["result"]["x"], 1);
    }
}
