// src/handlers/health.rs
use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;

use crate::dtos::health::HealthResponse;
use crate::state::AppState;

/// Liveness: answers whenever the process can serve HTTP. Never touches the
/// database, so a store outage does not get the container restarted.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
        error: None,
    })
}

/// Readiness: verifies the database answers a trivial query.
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ready",
                timestamp: Utc::now(),
                error: None,
            }),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unhealthy",
                    timestamp: Utc::now(),
                    error: Some("database unavailable"),
                }),
            )
        }
    }
}
