use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::user::{MeResponse, User, UserContext},
    utils::jwt::Claims,
};

/// Get current user's profile and statistics.
pub async fn get_me(
    State(pool): State<SqlitePool>,
    claims: Claims,
) -> Result<impl IntoResponse, AppError> {
    let user = User::find(&pool, claims.user_id()?)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;
    let context = UserContext::for_user(&pool, user.id).await?;

    Ok(Json(MeResponse {
        id: user.id,
        username: user.username,
        role: user.role,
        created_at: user.created_at,
        context,
    }))
}

/// Public display context of any user: post, comment and received-like counts.
pub async fn user_context(
    State(pool): State<SqlitePool>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    User::find(&pool, user_id)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    Ok(Json(UserContext::for_user(&pool, user_id).await?))
}
