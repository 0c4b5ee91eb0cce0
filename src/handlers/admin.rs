// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::user::{AdminUpdateUserRequest, User},
    utils::{hash::hash_password, jwt::Claims},
};

/// Lists all users in the system.
/// Admin only.
pub async fn list_users(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(User::list(&pool).await?))
}

/// Changes a user's role (e.g. appoints a moderator) or resets the password.
/// Admin only. Admins cannot change their own role.
///
/// The new role applies to tokens issued after the change.
pub async fn update_user(
    State(pool): State<SqlitePool>,
    claims: Claims,
    Path(id): Path<i64>,
    Json(payload): Json<AdminUpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    if payload.role.is_some() && id == claims.user_id()? {
        return Err(AppError::BadRequest("Cannot change your own role".to_string()));
    }

    let hashed = payload.password.as_deref().map(hash_password).transpose()?;

    let user = User::update(&pool, id, payload.role, hashed.as_deref())
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    tracing::info!(user_id = user.id, role = ?user.role, "user updated by admin");

    Ok(Json(user))
}
