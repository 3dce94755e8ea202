//! JSON-RPC envelope types shared by every transport.

use serde::{Deserialize, Serialize};
use serde_json::Value as J;

use crate::core::error::ProtocolError;

pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Inbound request after envelope validation. `id` is kept verbatim; an
/// omitted id is normalised to `null`.
#[derive(Deserialize, Debug, Clone)]
pub struct RpcReq {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: J,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub params: J,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcResp {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<J>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcErr>,
    pub id: J,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcErr {
    pub code: i32,
    pub message: String,
}

pub fn ok(id: J, result: J) -> RpcResp {
    RpcResp { jsonrpc: "2.0".into(), result: Some(result), error: None, id }
}

pub fn err(id: J, code: i32, msg: impl Into<String>) -> RpcResp {
    RpcResp {
        jsonrpc: "2.0".into(),
        result: None,
        error: Some(RpcErr { code, message: msg.into() }),
        id,
    }
}

pub fn protocol_err(id: J, e: &ProtocolError) -> RpcResp {
    err(id, e.code(), e.to_string())
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub capabilities: J,
    pub server_info: ServerInfo,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

impl InitializeResult {
    pub fn new(server_info: ServerInfo) -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION.into(),
            capabilities: serde_json::json!({ "tools": {} }),
            server_info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn it_serializes_initialize_result_in_camel_case() {
        let v = InitializeResult::new(ServerInfo { name: "gw".into(), version: "0.1".into() });
        let s = serde_json::to_value(&v).unwrap();
        assert_eq!(s["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(s["serverInfo"]["name"], "gw");
        assert!(s["capabilities"]["tools"].is_object());
    }

    #[test]
    fn error_response_omits_result_and_keeps_null_id() {
        let resp = err(J::Null, -32603, "boom");
        let v = serde_json::to_value(&resp).unwrap();
        assert!(v.get("result").is_none());
        assert_eq!(v["id"], J::Null);
        assert_eq!(v["error"]["code"], -32603);
    }

    #[test]
    fn missing_id_deserializes_as_null() {
        let req: RpcReq = serde_json::from_value(json!({"jsonrpc":"2.0","method":"initialize"})).unwrap();
        assert_eq!(req.id, J::Null);
        assert_eq!(req.params, J::Null);
    }
}
