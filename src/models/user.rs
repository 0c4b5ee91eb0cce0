// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteExecutor};
use validator::Validate;

/// Account role. Moderators handle complaints; admins additionally
/// manage the taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    User,
    Moderator,
    Admin,
}

impl Role {
    pub fn can_moderate(self) -> bool {
        matches!(self, Role::Moderator | Role::Admin)
    }
}

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    /// Unique username.
    pub username: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    pub role: Role,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.username)
    }
}

impl User {
    pub async fn find<'e, E>(executor: E, id: i64) -> Result<Option<User>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            "SELECT id, username, password, role, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    pub async fn find_by_username<'e, E>(
        executor: E,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            "SELECT id, username, password, role, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(executor)
        .await
    }

    /// All users, oldest account first.
    pub async fn list<'e, E>(executor: E) -> Result<Vec<User>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            "SELECT id, username, password, role, created_at FROM users ORDER BY id",
        )
        .fetch_all(executor)
        .await
    }

    /// Applies the given role and/or password hash. `None` keeps the column.
    pub async fn update<'e, E>(
        executor: E,
        id: i64,
        role: Option<Role>,
        password_hash: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                role = COALESCE($2, role),
                password = COALESCE($3, password)
            WHERE id = $1
            RETURNING id, username, password, role, created_at
            "#,
        )
        .bind(id)
        .bind(role)
        .bind(password_hash)
        .fetch_optional(executor)
        .await
    }

    /// Inserts a user with an already hashed password.
    pub async fn create<'e, E>(
        executor: E,
        username: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password, role, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, password, role, created_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(role)
        .bind(chrono::Utc::now())
        .fetch_one(executor)
        .await
    }
}

/// Per-user display context: what the user has published and how much
/// appreciation their content has received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserContext {
    /// Published, unblocked posts authored by the user.
    pub post_count: i64,
    /// Published comments written by the user.
    pub comment_count: i64,
    /// Author likes + likes on the user's posts + likes on the user's comments.
    pub like_receive_count: i64,
}

impl UserContext {
    pub async fn for_user<'e, E>(executor: E, user_id: i64) -> Result<UserContext, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, UserContext>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM posts
                   WHERE author_id = $1 AND is_published = TRUE AND is_blocked = FALSE) AS post_count,
                (SELECT COUNT(*) FROM comments
                   WHERE user_id = $1 AND is_published = TRUE) AS comment_count,
                (SELECT COUNT(*) FROM author_likes WHERE author_id = $1)
                  + (SELECT COUNT(*) FROM post_likes pl
                       JOIN posts p ON pl.post_id = p.id WHERE p.author_id = $1)
                  + (SELECT COUNT(*) FROM comment_likes cl
                       JOIN comments c ON cl.comment_id = c.id WHERE c.user_id = $1)
                  AS like_receive_count
            "#,
        )
        .bind(user_id)
        .fetch_one(executor)
        .await
    }
}

/// Profile of the current user with the aggregated context flattened in.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: i64,
    pub username: String,
    pub role: Role,
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(flatten)]
    pub context: UserContext,
}

/// DTO for creating a new user (Registration).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(
        min = 3,
        max = 50,
        message = "Username length must be between 3 and 50 characters."
    ))]
    pub username: String,
    #[validate(length(
        min = 4,
        max = 128,
        message = "Password length must be between 4 and 128 characters."
    ))]
    pub password: String,
}

/// DTO for user login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// DTO for an admin changing a user's role or password. Fields are optional.
#[derive(Debug, Deserialize, Validate)]
pub struct AdminUpdateUserRequest {
    pub role: Option<Role>,
    #[validate(length(
        min = 4,
        max = 128,
        message = "Password length must be between 4 and 128 characters."
    ))]
    pub password: Option<String>,
}
