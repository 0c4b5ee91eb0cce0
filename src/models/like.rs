// src/models/like.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection, SqliteExecutor};

/// A join table recording one user's endorsement of a target row.
///
/// Each table carries a `UNIQUE (user_id, <target>)` index, so a user likes
/// a given target at most once.
pub trait LikeTable {
    const TABLE: &'static str;
    const TARGET_COLUMN: &'static str;
}

/// Number of likes the target has received.
pub async fn count<'e, T, E>(executor: E, target_id: i64) -> Result<i64, sqlx::Error>
where
    T: LikeTable,
    E: SqliteExecutor<'e>,
{
    sqlx::query_scalar::<_, i64>(&format!(
        "SELECT COUNT(*) FROM {} WHERE {} = $1",
        T::TABLE,
        T::TARGET_COLUMN
    ))
    .bind(target_id)
    .fetch_one(executor)
    .await
}

pub async fn exists<'e, T, E>(executor: E, user_id: i64, target_id: i64) -> Result<bool, sqlx::Error>
where
    T: LikeTable,
    E: SqliteExecutor<'e>,
{
    sqlx::query_scalar::<_, bool>(&format!(
        "SELECT EXISTS (SELECT 1 FROM {} WHERE user_id = $1 AND {} = $2)",
        T::TABLE,
        T::TARGET_COLUMN
    ))
    .bind(user_id)
    .bind(target_id)
    .fetch_one(executor)
    .await
}

/// Likes the target, or removes the like if one exists.
/// Returns the new state (`true` = liked). Run it inside a transaction.
pub async fn toggle<T: LikeTable>(
    conn: &mut SqliteConnection,
    user_id: i64,
    target_id: i64,
) -> Result<bool, sqlx::Error> {
    let removed = sqlx::query(&format!(
        "DELETE FROM {} WHERE user_id = $1 AND {} = $2",
        T::TABLE,
        T::TARGET_COLUMN
    ))
    .bind(user_id)
    .bind(target_id)
    .execute(&mut *conn)
    .await?
    .rows_affected();

    if removed > 0 {
        return Ok(false);
    }

    sqlx::query(&format!(
        "INSERT INTO {} (user_id, {}, time_create) VALUES ($1, $2, $3)",
        T::TABLE,
        T::TARGET_COLUMN
    ))
    .bind(user_id)
    .bind(target_id)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?;
    Ok(true)
}

/// Wires a like struct to its table. `$target` names both the struct field
/// and the column holding the liked row's id.
macro_rules! like_table {
    ($ty:ident, $table:literal, $target:ident) => {
        impl LikeTable for $ty {
            const TABLE: &'static str = $table;
            const TARGET_COLUMN: &'static str = stringify!($target);
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{} / {}", self.user_id, self.$target)
            }
        }

        impl $ty {
            pub async fn get_count<'e, E>(executor: E, target_id: i64) -> Result<i64, sqlx::Error>
            where
                E: SqliteExecutor<'e>,
            {
                count::<Self, E>(executor, target_id).await
            }

            pub async fn toggle(
                conn: &mut SqliteConnection,
                user_id: i64,
                target_id: i64,
            ) -> Result<bool, sqlx::Error> {
                toggle::<Self>(conn, user_id, target_id).await
            }
        }
    };
}

/// A user's like of another user as an author.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AuthorLike {
    pub id: i64,
    pub user_id: i64,
    pub author_id: i64,
    pub time_create: DateTime<Utc>,
}

like_table!(AuthorLike, "author_likes", author_id);

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PostLike {
    pub id: i64,
    pub user_id: i64,
    pub post_id: i64,
    pub time_create: DateTime<Utc>,
}

like_table!(PostLike, "post_likes", post_id);

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CommentLike {
    pub id: i64,
    pub user_id: i64,
    pub comment_id: i64,
    pub time_create: DateTime<Utc>,
}

like_table!(CommentLike, "comment_likes", comment_id);

/// Result of a like toggle.
#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub liked: bool,
    pub count: i64,
}
