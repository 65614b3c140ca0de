use std::net::SocketAddr;

use crate::infra::config::Config;
use crate::infra::runtime::backend::BackendProcess;

pub async fn run_server() -> anyhow::Result<()> {
    let cfg = Config::from_env();
    tracing::info!(
        mode = %cfg.mode,
        port = cfg.port,
        enable_sse = cfg.enable_sse,
        remote_backend = cfg.cortex_base_url.is_some(),
        "BOOT cortex-mcp-gateway"
    );

    let registry = crate::tools::registry::build_registry(&cfg);

    // Stdio mode: JSON-RPC over stdin/stdout ONLY (no HTTP, no backend process).
    if cfg.mode == "stdio" {
        let timeout = std::time::Duration::from_secs(cfg.call_timeout_secs);
        return crate::api::mcp::stdio_loop(registry, timeout).await;
    }

    // Optional externally launched backend: held for the server's lifetime,
    // released after the listener stops.
    let backend = BackendProcess::spawn_if_configured(&cfg.backend)?;

    let app = crate::infra::http_app::build_app(registry, &cfg);
    let addr: SocketAddr = ([0, 0, 0, 0], cfg.port).into();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
        })
        .await?;

    if let Some(backend) = backend {
        backend.shutdown().await;
    }
    Ok(())
}
