//! JSON-RPC dispatcher: one entry point shared by the HTTP POST surface and
//! the stdio loop.
//!
//! Two wire codes only: `-32601` for unknown method/tool, `-32603` for
//! everything else including unparseable bodies (see `core::error`).

use std::io::{self, BufRead, Write};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value as J};

use crate::core::error::GatewayError;
use crate::core::mcp::{err as rpc_err, initialize_result, ok as rpc_ok, RpcReq, RpcResp};
use crate::infra::http_app::AppState;
use crate::infra::runtime::limits::call_with_deadline;
use crate::tools::registry::Registry;

pub fn tools_list(reg: &Registry) -> J {
    json!({ "tools": reg.list() })
}

async fn call_tool(
    reg: &Registry,
    timeout: Duration,
    params: &J,
) -> Result<J, GatewayError> {
    let name = params
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| GatewayError::Malformed("missing tool name".into()))?;
    let tool = reg
        .get(name)
        .ok_or_else(|| GatewayError::ToolNotFound(name.to_string()))?;
    let default_args = json!({});
    let args = params.get("arguments").unwrap_or(&default_args);

    let out = call_with_deadline(timeout, async {
        tool.call(args).await.map_err(|e| e.to_string())
    })
    .await
    .map_err(GatewayError::ToolExecution)?;

    let mut result = json!({
        "content": [{ "type": "text", "text": out.text }]
    });
    if let Some(data) = out.data {
        result["structuredContent"] = data;
    }
    Ok(result)
}

/// Dispatch a parsed request. The response always echoes the request id.
pub async fn dispatch(reg: &Registry, timeout: Duration, req: RpcReq) -> RpcResp {
    metrics::counter!("gateway_rpc_requests_total", "method" => req.method.clone()).increment(1);
    let id = req.id;
    match req.method.as_str() {
        "initialize" => rpc_ok(id, initialize_result()),
        "tools/list" => rpc_ok(id, tools_list(reg)),
        "tools/call" => match call_tool(reg, timeout, &req.params).await {
            Ok(result) => rpc_ok(id, result),
            Err(e) => {
                tracing::warn!(error = %e, "tools/call failed");
                rpc_err(id, e.code(), e.to_string(), None)
            }
        },
        other => {
            let e = GatewayError::MethodNotFound(other.to_string());
            rpc_err(id, e.code(), e.to_string(), None)
        }
    }
}

/// Dispatch a raw payload. An unparseable body never reaches routing; it is
/// answered with the catch-all internal error and a null id, since the body
/// may not even contain one.
pub async fn dispatch_bytes(reg: &Registry, timeout: Duration, raw: &[u8]) -> RpcResp {
    match serde_json::from_slice::<RpcReq>(raw) {
        Ok(req) => dispatch(reg, timeout, req).await,
        Err(e) => {
            let err = GatewayError::Malformed(e.to_string());
            rpc_err(J::Null, err.code(), err.to_string(), None)
        }
    }
}

/// HTTP handler for `POST /`. Protocol errors are still HTTP 200; the
/// JSON-RPC envelope is the only error channel.
pub async fn http(State(st): State<AppState>, body: Bytes) -> Json<RpcResp> {
    let resp = dispatch_bytes(&st.registry, st.call_timeout, &body).await;
    tracing::debug!(id = ?resp.id, ok = resp.result.is_some(), "rpc dispatched");
    Json(resp)
}

/// Stdio loop for `MODE=stdio`: newline-delimited JSON-RPC over stdin/stdout.
pub async fn stdio_loop(reg: Registry, timeout: Duration) -> anyhow::Result<()> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }
        let resp = dispatch_bytes(&reg, timeout, line.as_bytes()).await;
        let s = serde_json::to_string(&resp)?;
        println!("{s}");
        io::stdout().flush()?;
    }
    Ok(())
}
