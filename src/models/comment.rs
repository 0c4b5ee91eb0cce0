use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteExecutor};
use validator::Validate;

/// Represents the 'comments' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub text: String,
    pub time_create: DateTime<Utc>,
    pub time_update: DateTime<Utc>,
    pub is_published: bool,
}

impl std::fmt::Display for Comment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {}", self.user_id, self.post_id)
    }
}

const COMMENT_COLUMNS: &str =
    "id, post_id, user_id, text, time_create, time_update, is_published";

impl Comment {
    /// Number of comments on a post, published or not.
    pub async fn get_count<'e, E>(executor: E, post_id: i64) -> Result<i64, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(executor)
            .await
    }

    pub async fn find<'e, E>(executor: E, id: i64) -> Result<Option<Comment>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, Comment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    pub async fn create<'e, E>(
        executor: E,
        post_id: i64,
        user_id: i64,
        text: &str,
        is_published: bool,
    ) -> Result<Comment, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, Comment>(&format!(
            r#"
            INSERT INTO comments (post_id, user_id, text, time_create, time_update, is_published)
            VALUES ($1, $2, $3, $4, $4, $5)
            RETURNING {COMMENT_COLUMNS}
            "#
        ))
        .bind(post_id)
        .bind(user_id)
        .bind(text)
        .bind(Utc::now())
        .bind(is_published)
        .fetch_one(executor)
        .await
    }

    pub async fn delete<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Published comments of a post in display order (oldest first, then by user).
    pub async fn list_published<'e, E>(
        executor: E,
        post_id: i64,
    ) -> Result<Vec<CommentResponse>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, CommentResponse>(
            r#"
            SELECT
                c.id, c.post_id, p.slug AS post_slug, c.user_id, u.username,
                c.text, c.time_create, c.time_update
            FROM comments c
            JOIN users u ON c.user_id = u.id
            JOIN posts p ON c.post_id = p.id
            WHERE c.post_id = $1 AND c.is_published = TRUE
            ORDER BY c.time_create, c.user_id
            "#,
        )
        .bind(post_id)
        .fetch_all(executor)
        .await
    }
}

/// DTO for displaying a comment with author info.
#[derive(Debug, Serialize, FromRow)]
pub struct CommentResponse {
    pub id: i64,
    pub post_id: i64,
    pub post_slug: String,
    pub user_id: i64,
    pub username: String,
    pub text: String,
    pub time_create: DateTime<Utc>,
    pub time_update: DateTime<Utc>,
}

impl std::fmt::Display for CommentResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {}", self.username, self.post_slug)
    }
}

/// DTO for creating a new comment.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    pub post_id: i64,

    #[validate(length(
        min = 1,
        max = 1000,
        message = "Comment must be between 1 and 1000 characters"
    ))]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteCommentRequest {
    pub comment_id: i64,
}
