// src/models/complaint.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteExecutor};
use validator::Validate;

/// Moderation state of a complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ComplaintStatus {
    #[default]
    Pending,
    Resolved,
    Rejected,
}

/// Represents the 'user_complaints' table.
///
/// `moderator_id` and `moderated_at` are set exactly when the status
/// leaves `pending`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserComplaint {
    pub id: i64,
    /// The complainant.
    pub user_id: i64,
    /// The user being reported.
    pub bad_user_id: i64,
    pub post_id: Option<i64>,
    pub comment_id: Option<i64>,
    pub reason: String,
    pub time_create: DateTime<Utc>,
    pub status: ComplaintStatus,
    pub moderator_id: Option<i64>,
    pub moderated_at: Option<DateTime<Utc>>,
    pub resolution: Option<String>,
}

impl std::fmt::Display for UserComplaint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.post_id {
            Some(post_id) => write!(f, "{} / {} / {}", self.user_id, self.bad_user_id, post_id),
            None => write!(f, "{} / {} / -", self.user_id, self.bad_user_id),
        }
    }
}

const COMPLAINT_COLUMNS: &str = "id, user_id, bad_user_id, post_id, comment_id, reason, \
                                 time_create, status, moderator_id, moderated_at, resolution";

/// A complaint about to be filed.
#[derive(Debug, Clone)]
pub struct NewComplaint {
    pub user_id: i64,
    pub bad_user_id: i64,
    pub post_id: Option<i64>,
    pub comment_id: Option<i64>,
    pub reason: String,
}

impl UserComplaint {
    pub fn is_pending(&self) -> bool {
        self.status == ComplaintStatus::Pending
    }

    pub async fn create<'e, E>(executor: E, new: &NewComplaint) -> Result<UserComplaint, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, UserComplaint>(&format!(
            r#"
            INSERT INTO user_complaints
                (user_id, bad_user_id, post_id, comment_id, reason, time_create, status)
            VALUES ($1, $2, $3, $4, $5, $6, 'pending')
            RETURNING {COMPLAINT_COLUMNS}
            "#
        ))
        .bind(new.user_id)
        .bind(new.bad_user_id)
        .bind(new.post_id)
        .bind(new.comment_id)
        .bind(new.reason.as_str())
        .bind(Utc::now())
        .fetch_one(executor)
        .await
    }

    pub async fn find<'e, E>(executor: E, id: i64) -> Result<Option<UserComplaint>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, UserComplaint>(&format!(
            "SELECT {COMPLAINT_COLUMNS} FROM user_complaints WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Oldest first, optionally filtered by status.
    pub async fn list<'e, E>(
        executor: E,
        status: Option<ComplaintStatus>,
    ) -> Result<Vec<UserComplaint>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, UserComplaint>(&format!(
            r#"
            SELECT {COMPLAINT_COLUMNS} FROM user_complaints
            WHERE ($1 IS NULL OR status = $1)
            ORDER BY time_create, id
            "#
        ))
        .bind(status)
        .fetch_all(executor)
        .await
    }

    /// Closes a pending complaint. Returns `None` when the complaint does not
    /// exist or was already moderated.
    pub async fn moderate<'e, E>(
        executor: E,
        id: i64,
        moderator_id: i64,
        status: ComplaintStatus,
        resolution: Option<&str>,
    ) -> Result<Option<UserComplaint>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, UserComplaint>(&format!(
            r#"
            UPDATE user_complaints
            SET status = $1, moderator_id = $2, moderated_at = $3, resolution = $4
            WHERE id = $5 AND status = 'pending'
            RETURNING {COMPLAINT_COLUMNS}
            "#
        ))
        .bind(status)
        .bind(moderator_id)
        .bind(Utc::now())
        .bind(resolution)
        .bind(id)
        .fetch_optional(executor)
        .await
    }
}

/// DTO for filing a complaint.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateComplaintRequest {
    pub bad_user_id: i64,
    pub post_id: Option<i64>,
    pub comment_id: Option<i64>,
    #[validate(length(min = 1, max = 1000, message = "Reason must be between 1 and 1000 characters"))]
    pub reason: String,
}

/// DTO for closing a complaint.
#[derive(Debug, Deserialize, Validate)]
pub struct ResolveComplaintRequest {
    /// `resolved` or `rejected`.
    pub status: ComplaintStatus,
    #[validate(length(max = 1000))]
    pub resolution: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ComplaintListParams {
    pub status: Option<ComplaintStatus>,
}
