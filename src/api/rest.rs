//! Non-JSON-RPC convenience surface for workflow clients that discover and
//! call tools without the envelope. Shares the registry with the dispatcher.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as J};

use crate::infra::http_app::AppState;

/// `GET /` — health/status payload.
pub async fn health(State(st): State<AppState>) -> Json<J> {
    let protocol = if st.sse_enabled { "HTTP+SSE" } else { "HTTP" };
    Json(json!({
        "status": "healthy",
        "service": "Cortex MCP Gateway",
        "protocol": protocol,
    }))
}

/// `GET /tools` — discovery payload with server metadata.
pub async fn list_tools(State(st): State<AppState>) -> Json<J> {
    Json(json!({
        "tools": st.registry.list(),
        "version": env!("CARGO_PKG_VERSION"),
        "server": "cortex-mcp-gateway",
    }))
}

/// `GET /mcp/tools` — bare tool list, no metadata.
pub async fn mcp_list_tools(State(st): State<AppState>) -> Json<J> {
    Json(json!({ "tools": st.registry.list() }))
}

#[derive(Deserialize)]
struct DirectCallReq {
    tool: Option<String>,
    #[serde(default)]
    arguments: J,
}

#[derive(Serialize)]
pub struct DirectCallResp {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<J>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn direct_ok(result: String, data: Option<J>) -> DirectCallResp {
    DirectCallResp { success: true, result: Some(result), data, error: None }
}

fn direct_err(error: impl Into<String>) -> DirectCallResp {
    DirectCallResp { success: false, result: None, data: None, error: Some(error.into()) }
}

/// `POST /tools/call` — direct tool invocation outside the JSON-RPC
/// envelope. Failures are reported in-band with HTTP 200.
pub async fn direct_tool_call(State(st): State<AppState>, body: Bytes) -> Json<DirectCallResp> {
    let req: DirectCallReq = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => return Json(direct_err(e.to_string())),
    };
    let Some(tool) = req.tool else {
        return Json(direct_err("missing tool name"));
    };
    let args = if req.arguments.is_null() { json!({}) } else { req.arguments };
    match st.registry.call(&tool, &args).await {
        Ok(out) => Json(direct_ok(out.text, out.data)),
        Err(e) => Json(direct_err(e)),
    }
}

#[derive(Deserialize)]
pub struct QueryBody {
    #[serde(default)]
    query: String,
}

fn http_500(detail: String) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "detail": detail }))).into_response()
}

/// `POST /search` — search the benefit guides, returning raw hits. Unlike
/// the JSON-RPC surface this one signals failure with HTTP 500.
pub async fn search(State(st): State<AppState>, Json(body): Json<QueryBody>) -> Response {
    match st.registry.call("cortex_search", &json!({ "query": body.query })).await {
        Ok(out) => {
            let results = out
                .data
                .and_then(|d| d.get("results").cloned())
                .unwrap_or_else(|| json!([]));
            Json(json!({ "results": results })).into_response()
        }
        Err(e) => http_500(e),
    }
}

/// `POST /analyze` — natural-language query over structured benefit data.
pub async fn analyze(State(st): State<AppState>, Json(body): Json<QueryBody>) -> Response {
    match st.registry.call("cortex_analyst", &json!({ "query": body.query })).await {
        Ok(out) => Json(out.data.unwrap_or_else(|| json!({}))).into_response(),
        Err(e) => http_500(e),
    }
}
