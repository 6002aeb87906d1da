//! Health check endpoint.

use std::time::Duration;

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use hs_parsers::TimeWindow;

use crate::state::AppState;

/// Budget for the availability probe — a 1 minute window is near-instant
/// when the utility works at all.
const PROBE_BUDGET: Duration = Duration::from_secs(5);

/// GET /api/health — liveness plus unified-logging availability.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let window = TimeWindow::resolve(Some("1m"), None);
    let unified_ok = state
        .runner
        .show(&window, None, PROBE_BUDGET)
        .await
        .is_ok();

    Json(json!({
        "status": if unified_ok { "ok" } else { "degraded" },
        "version": env!("CARGO_PKG_VERSION"),
        "unified_logging_available": unified_ok,
    }))
}
