use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Compact stdout logging for local runs. `RUST_LOG` wins when set,
/// otherwise `info` with axum/tower-http kept at info too.
pub fn init_logging_default() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info,axum=info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .with_writer(io::stdout)
        .try_init();
}

/// JSON structured logging for container deployments; same `RUST_LOG`
/// handling as the compact variant.
pub fn init_logging_json() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .json()
        .with_writer(io::stdout)
        .try_init();
}
