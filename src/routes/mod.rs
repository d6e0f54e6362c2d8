pub mod health;
pub mod users;

use std::time::Duration;

use axum::{middleware, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::timeout::enforce_timeout;
use crate::state::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(users::routes())
        .merge(health::routes())
}

/// Full application: routes, state and the middleware stack.
pub fn app(state: AppState, request_timeout: Duration) -> Router {
    create_router()
        .route("/", get(|| async { "User API" }))
        .layer(middleware::from_fn_with_state(request_timeout, enforce_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
