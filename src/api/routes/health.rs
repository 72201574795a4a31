//! Health Routes
//!
//! - GET /health/live - liveness probe
//! - GET /health - full health status

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

/// GET /health/live
///
/// Liveness probe: the process is up and serving.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health
///
/// Full health status with uptime and session count.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        sessions: state.sessions.len().await,
    })
}
