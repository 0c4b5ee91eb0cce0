// src/handlers/moderation.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    handlers::required_text,
    models::{
        blocked_user::{BlockedUser, CreateBlockRequest},
        comment::Comment,
        complaint::{
            ComplaintListParams, ComplaintStatus, CreateComplaintRequest, NewComplaint,
            ResolveComplaintRequest, UserComplaint,
        },
        post::Post,
        user::User,
    },
    utils::jwt::Claims,
};

/// Rejects users with a sanction still in force.
pub async fn ensure_not_blocked(pool: &SqlitePool, user_id: i64) -> Result<(), AppError> {
    let today = Utc::now().date_naive();
    if let Some(block) = BlockedUser::active_for(pool, user_id, today).await? {
        return Err(AppError::Forbidden(format!(
            "You are blocked until {}: {}",
            block.lock_date, block.reason
        )));
    }
    Ok(())
}

/// File a complaint about another user, optionally pointing at a post and/or comment.
pub async fn create_complaint(
    State(pool): State<SqlitePool>,
    claims: Claims,
    Json(payload): Json<CreateComplaintRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let user_id = claims.user_id()?;

    if payload.bad_user_id == user_id {
        return Err(AppError::BadRequest(
            "You cannot file a complaint about yourself".to_string(),
        ));
    }

    User::find(&pool, payload.bad_user_id)
        .await?
        .ok_or(AppError::NotFound("Reported user not found".to_string()))?;

    if let Some(post_id) = payload.post_id {
        Post::find(&pool, post_id)
            .await?
            .ok_or(AppError::NotFound("Post not found".to_string()))?;
    }

    if let Some(comment_id) = payload.comment_id {
        let comment = Comment::find(&pool, comment_id)
            .await?
            .ok_or(AppError::NotFound("Comment not found".to_string()))?;
        if payload.post_id.is_some_and(|post_id| post_id != comment.post_id) {
            return Err(AppError::BadRequest(
                "Comment does not belong to the given post".to_string(),
            ));
        }
    }

    let complaint = UserComplaint::create(
        &pool,
        &NewComplaint {
            user_id,
            bad_user_id: payload.bad_user_id,
            post_id: payload.post_id,
            comment_id: payload.comment_id,
            reason: required_text("Reason", &payload.reason)?,
        },
    )
    .await?;

    tracing::info!(complaint_id = complaint.id, "complaint filed: {}", complaint);

    Ok((StatusCode::CREATED, Json(complaint)))
}

/// Lists complaints, oldest first.
/// Moderator only.
pub async fn list_complaints(
    State(pool): State<SqlitePool>,
    Query(params): Query<ComplaintListParams>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(UserComplaint::list(&pool, params.status).await?))
}

/// Closes a pending complaint as resolved or rejected.
/// Moderator only.
pub async fn resolve_complaint(
    State(pool): State<SqlitePool>,
    claims: Claims,
    Path(id): Path<i64>,
    Json(payload): Json<ResolveComplaintRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    if payload.status == ComplaintStatus::Pending {
        return Err(AppError::BadRequest(
            "Status must be 'resolved' or 'rejected'".to_string(),
        ));
    }

    let existing = UserComplaint::find(&pool, id)
        .await?
        .ok_or(AppError::NotFound("Complaint not found".to_string()))?;
    if !existing.is_pending() {
        return Err(AppError::Conflict("Complaint was already moderated".to_string()));
    }

    let complaint = UserComplaint::moderate(
        &pool,
        id,
        claims.user_id()?,
        payload.status,
        payload.resolution.as_deref(),
    )
    .await?
    .ok_or(AppError::Conflict("Complaint was already moderated".to_string()))?;

    Ok(Json(complaint))
}

/// Blocks the user a complaint was filed against until `lock_date`.
/// A pending complaint is resolved along the way; a rejected one is a 409.
/// Moderator only.
pub async fn block_user(
    State(pool): State<SqlitePool>,
    claims: Claims,
    Json(payload): Json<CreateBlockRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let moderator_id = claims.user_id()?;

    if payload.lock_date < Utc::now().date_naive() {
        return Err(AppError::BadRequest("lock_date lies in the past".to_string()));
    }

    let complaint = UserComplaint::find(&pool, payload.complaint_id)
        .await?
        .ok_or(AppError::NotFound("Complaint not found".to_string()))?;
    if complaint.status == ComplaintStatus::Rejected {
        return Err(AppError::Conflict(
            "Complaint was rejected; a block cannot be based on it".to_string(),
        ));
    }

    let reason = required_text("Reason", &payload.reason)?;
    let reason = reason.as_str();

    let mut tx = pool.begin().await?;
    let block = BlockedUser::create(
        &mut *tx,
        complaint.bad_user_id,
        moderator_id,
        complaint.id,
        payload.lock_date,
        reason,
    )
    .await?;

    if complaint.is_pending() {
        UserComplaint::moderate(
            &mut *tx,
            complaint.id,
            moderator_id,
            ComplaintStatus::Resolved,
            Some(reason),
        )
        .await?;
    }
    tx.commit().await?;

    tracing::info!(
        user_id = block.user_id,
        moderator_id,
        "user blocked until {}",
        block.lock_date
    );

    Ok((StatusCode::CREATED, Json(block)))
}

/// Lists all sanctions.
/// Moderator only.
pub async fn list_blocks(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(BlockedUser::list(&pool).await?))
}

async fn set_post_blocked(
    pool: &SqlitePool,
    post_id: i64,
    blocked: bool,
) -> Result<Json<serde_json::Value>, AppError> {
    if !Post::set_blocked(pool, post_id, blocked).await? {
        return Err(AppError::NotFound("Post not found".to_string()));
    }
    Ok(Json(serde_json::json!({ "id": post_id, "is_blocked": blocked })))
}

/// Hides a post from public listings.
/// Moderator only.
pub async fn block_post(
    State(pool): State<SqlitePool>,
    Path(post_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    set_post_blocked(&pool, post_id, true).await
}

/// Moderator only.
pub async fn unblock_post(
    State(pool): State<SqlitePool>,
    Path(post_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    set_post_blocked(&pool, post_id, false).await
}
