use axum::{Router, routing::{post, get}};
use crate::state::AppState;
use crate::handlers::user::{create_user, get_user, list_users};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/user", post(create_user))
        .route("/user/{id}", get(get_user))
        .route("/users", get(list_users))
}
