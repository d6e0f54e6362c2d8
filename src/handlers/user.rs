// src/handlers/user.rs
use axum::{
    extract::{rejection::{JsonRejection, PathRejection, QueryRejection}, Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument, warn};

use crate::dtos::user::{CreateUserRequest, ListUsersQuery, ListUsersResponse, UserResponse};
use crate::error::AppError;
use crate::state::AppState;

// POST /user - Create a user
#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let Json(payload) = payload.map_err(|e| {
        warn!(error = %e.body_text(), "Invalid request body");
        AppError::validation("Request body must be JSON with first_name and last_name")
    })?;

    let new_user = payload.validate().inspect_err(|e| {
        warn!(error = %e, "Rejected user payload");
    })?;

    let user = state.store.insert_user(&new_user).await?;
    info!(id = user.id, first_name = %user.first_name, last_name = %user.last_name, "User created");

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

// GET /user/{id} - Fetch a user by id
#[instrument(skip(state, id))]
pub async fn get_user(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<UserResponse>, AppError> {
    let id = match id {
        Ok(Path(id)) if id > 0 => id,
        _ => return Err(AppError::validation("User id must be a positive integer")),
    };

    let user = state.store.get_user(id).await.inspect_err(|e| {
        if matches!(e, AppError::NotFound(_)) {
            info!(id, "User not found");
        }
    })?;
    info!(id, "User fetched");

    Ok(Json(UserResponse::from(user)))
}

// GET /users?limit=&offset= - List users by id
#[instrument(skip(state, query))]
pub async fn list_users(
    State(state): State<AppState>,
    query: Result<Query<ListUsersQuery>, QueryRejection>,
) -> Result<Json<ListUsersResponse>, AppError> {
    let Query(query) = query.map_err(|e| {
        warn!(error = %e.body_text(), "Invalid pagination query");
        AppError::validation("limit and offset must be non-negative integers")
    })?;
    let page = query.page()?;

    let users = state.store.list_users(page).await?;
    info!(count = users.len(), limit = page.limit, offset = page.offset, "Fetched users");

    Ok(Json(ListUsersResponse {
        users: users.into_iter().map(UserResponse::from).collect(),
        limit: page.limit,
        offset: page.offset,
    }))
}
