use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::api::{mcp, rest, sse};
use crate::infra::config::Config;
use crate::tools::registry::Registry;

/// Shared read-only state: the registry plus the knobs each surface needs.
/// No locking anywhere; nothing here mutates after boot.
#[derive(Clone)]
pub struct AppState {
    pub registry: Registry,
    pub call_timeout: Duration,
    pub heartbeat: Duration,
    pub sse_enabled: bool,
}

impl AppState {
    pub fn new(registry: Registry, cfg: &Config) -> Self {
        Self {
            registry,
            call_timeout: Duration::from_secs(cfg.call_timeout_secs.max(1)),
            // a zero period would panic the interval timer
            heartbeat: Duration::from_secs(cfg.heartbeat_secs.max(1)),
            sse_enabled: cfg.enable_sse,
        }
    }
}

/// Assemble the full HTTP app. The SSE route is a capability flag, not a
/// separate server variant.
pub fn build_app(registry: Registry, cfg: &Config) -> Router {
    let state = AppState::new(registry, cfg);
    build_app_with_state(state)
}

pub fn build_app_with_state(state: AppState) -> Router {
    // Workflow clients call from browser-hosted editors; allow everything.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/", get(rest::health).post(mcp::http))
        .route("/tools", get(rest::list_tools))
        .route("/tools/call", post(rest::direct_tool_call))
        .route("/mcp/tools", get(rest::mcp_list_tools))
        .route("/search", post(rest::search))
        .route("/analyze", post(rest::analyze));
    if state.sse_enabled {
        router = router.route("/sse", get(sse::sse));
    }
    router.layer(cors).with_state(state)
}
