// src/handlers/like.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::{
        comment::Comment,
        like::{AuthorLike, CommentLike, LikeResponse, PostLike},
        post::Post,
        user::User,
    },
    utils::jwt::Claims,
};

/// Toggle Like on an author.
pub async fn toggle_author_like(
    State(pool): State<SqlitePool>,
    claims: Claims,
    Path(author_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    if user_id == author_id {
        return Err(AppError::BadRequest("You cannot like yourself".to_string()));
    }
    User::find(&pool, author_id)
        .await?
        .ok_or(AppError::NotFound("Author not found".to_string()))?;

    let mut tx = pool.begin().await?;
    let liked = AuthorLike::toggle(&mut tx, user_id, author_id).await?;
    let count = AuthorLike::get_count(&mut *tx, author_id).await?;
    tx.commit().await?;

    Ok(Json(LikeResponse { liked, count }))
}

/// Toggle Like on a post.
pub async fn toggle_post_like(
    State(pool): State<SqlitePool>,
    claims: Claims,
    Path(post_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    Post::find(&pool, post_id)
        .await?
        .filter(Post::is_public)
        .ok_or(AppError::NotFound("Post not found".to_string()))?;

    let mut tx = pool.begin().await?;
    let liked = PostLike::toggle(&mut tx, user_id, post_id).await?;
    let count = PostLike::get_count(&mut *tx, post_id).await?;
    tx.commit().await?;

    Ok(Json(LikeResponse { liked, count }))
}

/// Toggle Like on a comment.
pub async fn toggle_comment_like(
    State(pool): State<SqlitePool>,
    claims: Claims,
    Path(comment_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let comment = Comment::find(&pool, comment_id)
        .await?
        .filter(|c| c.is_published)
        .ok_or(AppError::NotFound("Comment not found".to_string()))?;
    // Comments under hidden posts are hidden too.
    Post::find(&pool, comment.post_id)
        .await?
        .filter(Post::is_public)
        .ok_or(AppError::NotFound("Comment not found".to_string()))?;

    let mut tx = pool.begin().await?;
    let liked = CommentLike::toggle(&mut tx, user_id, comment_id).await?;
    let count = CommentLike::get_count(&mut *tx, comment_id).await?;
    tx.commit().await?;

    Ok(Json(LikeResponse { liked, count }))
}
