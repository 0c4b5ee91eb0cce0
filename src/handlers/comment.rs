// src/handlers/comment.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    handlers::moderation::ensure_not_blocked,
    models::{
        comment::{Comment, CreateCommentRequest, DeleteCommentRequest},
        post::Post,
    },
    utils::{html::clean_html, jwt::Claims},
};

/// List the published comments of a post.
pub async fn list_comments(
    State(pool): State<SqlitePool>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let post = Post::find_by_slug(&pool, &slug)
        .await?
        .filter(Post::is_public)
        .ok_or(AppError::NotFound("Post not found".to_string()))?;

    let comments = Comment::list_published(&pool, post.id).await?;
    Ok(Json(comments))
}

/// Add a comment to a public post.
/// With premoderation on, the comment starts unpublished.
pub async fn add_comment(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    claims: Claims,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let user_id = claims.user_id()?;
    ensure_not_blocked(&pool, user_id).await?;

    let post = Post::find(&pool, payload.post_id)
        .await?
        .filter(Post::is_public)
        .ok_or(AppError::NotFound("Post not found".to_string()))?;

    let text = clean_html(payload.text.trim());
    if text.is_empty() {
        return Err(AppError::BadRequest("Comment is empty after sanitizing".to_string()));
    }

    let comment = Comment::create(
        &pool,
        post.id,
        user_id,
        &text,
        !config.comments_premoderated,
    )
    .await?;

    tracing::debug!(comment_id = comment.id, post_id = post.id, "comment added");

    Ok((StatusCode::CREATED, Json(comment)))
}

/// Delete a comment.
/// Requires: Login + (Author OR Moderator).
pub async fn delete_comment(
    State(pool): State<SqlitePool>,
    claims: Claims,
    Json(payload): Json<DeleteCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let comment = Comment::find(&pool, payload.comment_id)
        .await?
        .ok_or(AppError::NotFound("Comment not found".to_string()))?;

    if comment.user_id != claims.user_id()? && !claims.is_moderator() {
        return Err(AppError::Forbidden(
            "You are not allowed to delete this comment".to_string(),
        ));
    }

    Comment::delete(&pool, comment.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
