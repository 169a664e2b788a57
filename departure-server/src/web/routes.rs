//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::domain::StopId;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/stops/search", get(search_stops))
        .route("/api/departures/:stop_id", get(stop_departures))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Search stops by (normalized) name.
async fn search_stops(
    State(state): State<AppState>,
    Query(req): Query<StopSearchRequest>,
) -> Json<StopSearchResponse> {
    let limit = req.limit.unwrap_or(10).min(50);

    let stops = state
        .source
        .registry()
        .search(&req.q, limit)
        .into_iter()
        .map(|s| StopSearchResult {
            id: s.id.to_string(),
            name: s.name.clone(),
        })
        .collect();

    Json(StopSearchResponse { stops })
}

/// Latest departure snapshot for one monitored stop.
async fn stop_departures(
    State(state): State<AppState>,
    Path(stop_id): Path<String>,
) -> Response {
    let Ok(id) = StopId::parse(&stop_id) else {
        return (StatusCode::BAD_REQUEST, "invalid stop id").into_response();
    };

    match state.source.get_state(&id) {
        Some(snapshot) => Json(SensorStateDto::from(&snapshot)).into_response(),
        None => (StatusCode::NOT_FOUND, "stop is not monitored").into_response(),
    }
}
