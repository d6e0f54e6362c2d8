use std::time::Duration;

use axum::{extract::State, middleware::Next, response::{IntoResponse, Response}};
use http::Request;

use crate::error::AppError;

/// Fails a request with 504 once it has run longer than the configured
/// limit. Dropping the inner future cancels any in-flight query.
pub async fn enforce_timeout(
    State(limit): State<Duration>,
    req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let path = req.uri().path().to_owned();
    match tokio::time::timeout(limit, next.run(req)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(%path, limit_ms = limit.as_millis() as u64, "Request exceeded timeout");
            AppError::Timeout.into_response()
        }
    }
}
