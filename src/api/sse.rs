//! SSE notification channel: readiness, a registry snapshot, then heartbeats.
//!
//! Server-to-client only. Tool results never travel here; they stay on the
//! request/response surface.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::http::header;
use axum::response::sse::{Event, Sse};
use axum::response::IntoResponse;
use serde_json::{json, Value as J};
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::{Stream, StreamExt};

use crate::api::mcp::tools_list;
use crate::core::mcp::JSONRPC_VERSION;
use crate::infra::http_app::AppState;
use crate::tools::registry::Registry;

fn ready_frame() -> J {
    json!({ "jsonrpc": JSONRPC_VERSION, "id": 1, "method": "server/ready" })
}

fn tools_frame(reg: &Registry) -> J {
    json!({ "jsonrpc": JSONRPC_VERSION, "method": "tools/list", "result": tools_list(reg) })
}

fn ping_frame() -> J {
    json!({ "jsonrpc": JSONRPC_VERSION, "method": "ping" })
}

/// The frame sequence for one connection: `server/ready`, a `tools/list`
/// snapshot taken at open time, then a `ping` every heartbeat interval,
/// forever. Each open stream gets its own fresh sequence.
pub fn frame_stream(reg: &Registry, heartbeat: Duration) -> impl Stream<Item = J> {
    let opening = tokio_stream::iter([ready_frame(), tools_frame(reg)]);
    let first_ping = tokio::time::Instant::now() + heartbeat;
    let pings =
        IntervalStream::new(tokio::time::interval_at(first_ping, heartbeat)).map(|_| ping_frame());
    opening.chain(pings)
}

/// HTTP handler for `GET /sse`.
pub async fn sse(State(st): State<AppState>) -> impl IntoResponse {
    tracing::debug!(heartbeat_secs = st.heartbeat.as_secs(), "sse stream opened");
    let stream = frame_stream(&st.registry, st.heartbeat)
        .map(|frame| Ok::<_, Infallible>(Event::default().data(frame.to_string())));
    (
        [
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
        ],
        Sse::new(stream),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Tool;
    use crate::tools::search::{CortexSearchTool, SimulatedSearchBackend};
    use std::sync::Arc;

    fn test_registry() -> Registry {
        Registry::with_tools([
            Arc::new(CortexSearchTool::new(Arc::new(SimulatedSearchBackend))) as Arc<dyn Tool>,
        ])
    }

    #[tokio::test(start_paused = true)]
    async fn stream_opens_with_ready_then_tools_then_pings() {
        let reg = test_registry();
        let mut stream = Box::pin(frame_stream(&reg, Duration::from_secs(30)));

        let first = stream.next().await.unwrap();
        assert_eq!(first["method"], "server/ready");
        assert_eq!(first["id"], 1);
        assert!(first.get("result").is_none());

        let second = stream.next().await.unwrap();
        assert_eq!(second["method"], "tools/list");
        assert_eq!(
            second["result"]["tools"],
            serde_json::to_value(reg.list()).unwrap()
        );

        // heartbeats arrive once the interval elapses, and keep coming
        tokio::time::advance(Duration::from_secs(30)).await;
        let third = stream.next().await.unwrap();
        assert_eq!(third["method"], "ping");
        tokio::time::advance(Duration::from_secs(30)).await;
        let fourth = stream.next().await.unwrap();
        assert_eq!(fourth["method"], "ping");
    }

    #[tokio::test(start_paused = true)]
    async fn each_stream_gets_an_independent_sequence() {
        let reg = test_registry();
        let mut a = Box::pin(frame_stream(&reg, Duration::from_secs(30)));
        let _ = a.next().await;
        let _ = a.next().await;

        let mut b = Box::pin(frame_stream(&reg, Duration::from_secs(30)));
        let first = b.next().await.unwrap();
        assert_eq!(first["method"], "server/ready");
    }

    #[test]
    fn frames_are_notification_shaped() {
        let p = ping_frame();
        assert_eq!(p["jsonrpc"], "2.0");
        assert!(p.get("result").is_none() && p.get("error").is_none());
    }
}
