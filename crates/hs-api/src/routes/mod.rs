//! API route definitions and router builder.

pub mod health;
pub mod logs;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/logs/{source}", get(logs::get_logs))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
