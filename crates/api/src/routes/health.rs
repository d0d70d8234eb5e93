use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Overall service status: `ok`, or `degraded` while the database is down.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    pub uptime_secs: u64,
    /// Last known database reachability, as tracked by the monitor.
    pub db_available: bool,
}

/// GET /health -- returns service and database health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_available = state.db.is_available();
    let status = if db_available { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.started_at.elapsed().as_secs(),
        db_available,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api`).
///
/// `/test` is kept as an alias for older uptime checkers.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/test", get(health_check))
}
