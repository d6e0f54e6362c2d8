use axum::{Router, routing::get};
use crate::state::AppState;
use crate::handlers::health::{health_check, readiness_check};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
}
