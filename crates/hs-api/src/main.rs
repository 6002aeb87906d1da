//! Hindsight API server — "what happened on this machine recently?"
//!
//! Serves normalized views of the unified log, crash reports, and package
//! logs over a small REST surface.

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use hs_api::config::ApiConfig;
use hs_api::routes::build_router;
use hs_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "hs-api starting");

    let config = ApiConfig::from_env();
    let state = AppState::with_system_runner(&config);
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
