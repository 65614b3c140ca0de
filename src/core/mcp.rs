//! JSON-RPC 2.0 envelope shared by the HTTP, stdio and SSE surfaces.

use serde::{Deserialize, Serialize};
use serde_json::Value as J;

pub const JSONRPC_VERSION: &str = "2.0";
pub const PROTOCOL_VERSION: &str = "2024-11-05";

#[derive(Deserialize, Debug)]
pub struct RpcReq {
    pub jsonrpc: String,
    /// Opaque correlation token; echoed back verbatim, never interpreted.
    #[serde(default)]
    pub id: J,
    pub method: String,
    #[serde(default)]
    pub params: J,
}

#[derive(Serialize, Debug, Clone)]
pub struct RpcResp {
    pub jsonrpc: &'static str,
    pub id: J,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<J>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcErr>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcErr {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<J>,
}

/// The only constructors for `RpcResp`: a response holds exactly one of
/// `result` / `error`, never both, never neither.
pub fn ok(id: J, result: J) -> RpcResp {
    RpcResp { jsonrpc: JSONRPC_VERSION, id, result: Some(result), error: None }
}

pub fn err(id: J, code: i32, msg: impl Into<String>, data: Option<J>) -> RpcResp {
    RpcResp {
        jsonrpc: JSONRPC_VERSION,
        id,
        result: None,
        error: Some(RpcErr { code, message: msg.into(), data }),
    }
}

/// Fixed capability object returned by `initialize`. Stateless; produced
/// fresh on every call.
pub fn initialize_result() -> J {
    serde_json::json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": { "tools": {} },
        "serverInfo": {
            "name": "cortex-mcp-gateway",
            "version": env!("CARGO_PKG_VERSION"),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ok_response_has_result_only() {
        let r = ok(json!(7), json!({"x": 1}));
        assert_eq!(r.jsonrpc, "2.0");
        assert_eq!(r.id, json!(7));
        assert!(r.result.is_some());
        assert!(r.error.is_none());
    }

    #[test]
    fn err_response_has_error_only() {
        let r = err(json!("abc"), -32601, "Unknown method: nope", None);
        assert_eq!(r.id, json!("abc"));
        assert!(r.result.is_none());
        assert_eq!(r.error.unwrap().code, -32601);
    }

    #[test]
    fn serialized_response_omits_absent_half() {
        let s = serde_json::to_string(&ok(json!(1), json!(null))).unwrap();
        assert!(!s.contains("error"));
        let s = serde_json::to_string(&err(json!(1), -32603, "boom", None)).unwrap();
        assert!(!s.contains("result"));
    }

    #[test]
    fn request_defaults_id_and_params() {
        let r: RpcReq = serde_json::from_str(r#"{"jsonrpc":"2.0","method":"ping"}"#).unwrap();
        assert_eq!(r.id, J::Null);
        assert_eq!(r.params, J::Null);
    }

    #[test]
    fn initialize_result_shape() {
        let v = initialize_result();
        assert_eq!(v["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(v["serverInfo"]["name"], "cortex-mcp-gateway");
        assert!(v["capabilities"]["tools"].is_object());
    }
}
