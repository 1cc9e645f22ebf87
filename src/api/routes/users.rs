//! User Routes
//!
//! - GET /api/users - List users
//! - POST /api/users - Create a user (400 on duplicate email)
//! - GET /api/users/:id - Get a user
//! - PUT /api/users/:id - Partial update (also accepted as POST)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::api::extract::ApiJson;
use crate::api::state::AppState;
use crate::models::{User, UserCreate, UserUpdate};

/// GET /api/users
pub async fn list_users(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.store.list_users()?))
}

/// POST /api/users
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<UserCreate>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = state.store.create_user(&req)?;
    tracing::info!(user_id = %user.id, role = %user.role, "Created user");
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/users/:id
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<User>> {
    Ok(Json(state.store.get_user(&id)?))
}

/// PUT /api/users/:id
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UserUpdate>,
) -> ApiResult<Json<User>> {
    let user = state.store.update_user(&id, &req)?;
    tracing::info!(user_id = %id, "Updated user");
    Ok(Json(user))
}
