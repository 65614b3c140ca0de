pub fn init() {
    // Initialize tracing subscriber once, honoring RUST_LOG if set.
    // Default to info level; allow override via RUST_LOG (e.g., "debug").
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}

/// Bump an error/request counter for one tool or surface.
pub fn count(surface: &str, metric: &'static str) {
    metrics::counter!(metric, "surface" => surface.to_string()).increment(1);
}

/// Record a latency-style observation in milliseconds.
pub fn observe(surface: &str, metric: &'static str, value_ms: f64) {
    metrics::histogram!(metric, "surface" => surface.to_string()).record(value_ms);
    tracing::debug!(surface = surface, metric = metric, value_ms = value_ms, "metric");
}
