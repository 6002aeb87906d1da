//! Log query endpoint — one route for all nine sources.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use hs_protocol::{QueryRequest, QueryResponse, SourceType};

use crate::state::AppState;

/// Query-string parameters accepted by the logs endpoint.
#[derive(Debug, Deserialize)]
pub struct LogParams {
    pub time_period: Option<String>,
    pub limit: Option<usize>,
}

/// GET /api/logs/{source} — run one query and return the envelope.
///
/// Unknown sources get 404, a failed external invocation gets 500; both
/// carry the structured error envelope, never a bare trace.
pub async fn get_logs(
    State(state): State<AppState>,
    Path(source): Path<String>,
    Query(params): Query<LogParams>,
) -> (StatusCode, Json<QueryResponse>) {
    let source: SourceType = match source.parse() {
        Ok(source) => source,
        Err(err) => {
            return (
                StatusCode::NOT_FOUND,
                Json(QueryResponse::error(err.to_string())),
            );
        }
    };

    let request = QueryRequest {
        source,
        time_period: params.time_period,
        limit: params.limit,
    };
    let response = state.orchestrator.query(&request).await;

    let status = if response.is_success() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(response))
}
