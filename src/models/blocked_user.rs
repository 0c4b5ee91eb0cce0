// src/models/blocked_user.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteExecutor};
use validator::Validate;

/// Represents the 'blocked_users' table: a sanction issued for one complaint.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct BlockedUser {
    pub id: i64,
    pub user_id: i64,
    pub moderator_id: i64,
    pub complaint_id: i64,
    /// The user stays blocked through this date (inclusive).
    pub lock_date: NaiveDate,
    pub reason: String,
}

impl std::fmt::Display for BlockedUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {} / {}", self.user_id, self.moderator_id, self.complaint_id)
    }
}

impl BlockedUser {
    pub async fn create<'e, E>(
        executor: E,
        user_id: i64,
        moderator_id: i64,
        complaint_id: i64,
        lock_date: NaiveDate,
        reason: &str,
    ) -> Result<BlockedUser, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, BlockedUser>(
            r#"
            INSERT INTO blocked_users (user_id, moderator_id, complaint_id, lock_date, reason)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, moderator_id, complaint_id, lock_date, reason
            "#,
        )
        .bind(user_id)
        .bind(moderator_id)
        .bind(complaint_id)
        .bind(lock_date)
        .bind(reason)
        .fetch_one(executor)
        .await
    }

    /// All sanctions ordered by lock date.
    pub async fn list<'e, E>(executor: E) -> Result<Vec<BlockedUser>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, BlockedUser>(
            r#"
            SELECT id, user_id, moderator_id, complaint_id, lock_date, reason
            FROM blocked_users
            ORDER BY lock_date, id
            "#,
        )
        .fetch_all(executor)
        .await
    }

    /// The longest-running sanction still in force on `today`, if any.
    pub async fn active_for<'e, E>(
        executor: E,
        user_id: i64,
        today: NaiveDate,
    ) -> Result<Option<BlockedUser>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, BlockedUser>(
            r#"
            SELECT id, user_id, moderator_id, complaint_id, lock_date, reason
            FROM blocked_users
            WHERE user_id = $1 AND lock_date >= $2
            ORDER BY lock_date DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(today)
        .fetch_optional(executor)
        .await
    }
}

/// DTO for blocking the user a complaint was filed against.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBlockRequest {
    pub complaint_id: i64,
    pub lock_date: NaiveDate,
    #[validate(length(min = 1, max = 255, message = "Reason must be between 1 and 255 characters"))]
    pub reason: String,
}
