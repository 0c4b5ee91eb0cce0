use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection, SqliteExecutor};
use validator::Validate;

use crate::models::{category::Category, tag::Tag};

/// Represents the 'posts' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub category_id: i64,
    pub author_id: i64,
    pub title: String,
    pub slug: String,
    pub content: String,
    /// Path or URL of the cover picture. Uploading happens elsewhere.
    pub photo: String,
    pub time_create: DateTime<Utc>,
    pub time_update: DateTime<Utc>,
    pub is_published: bool,
    pub is_blocked: bool,
}

impl std::fmt::Display for Post {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let head: String = self.title.chars().take(25).collect();
        write!(f, "{}...", head)
    }
}

const POST_COLUMNS: &str = "id, category_id, author_id, title, slug, content, photo, \
                            time_create, time_update, is_published, is_blocked";

/// Row for listing pages, joined with author and category.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PostListItem {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub photo: String,
    pub author_id: i64,
    pub author_username: String,
    pub category_slug: String,
    pub time_create: DateTime<Utc>,
}

/// Full single-post view.
#[derive(Debug, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    pub author_username: String,
    pub category: Category,
    pub tags: Vec<Tag>,
    /// All comments, published or not.
    pub comment_count: i64,
    pub like_count: i64,
    /// Whether the requesting user has liked the post.
    pub is_liked: bool,
}

/// Values for a new post after the request has been resolved
/// (slug derived, category and tags looked up, content sanitized).
#[derive(Debug, Clone)]
pub struct NewPost {
    pub category_id: i64,
    pub author_id: i64,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub photo: String,
    pub is_published: bool,
    pub tag_ids: Vec<i64>,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub category_id: Option<i64>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub photo: Option<String>,
    pub is_published: Option<bool>,
    pub tag_ids: Option<Vec<i64>>,
}

impl Post {
    pub async fn find<'e, E>(executor: E, id: i64) -> Result<Option<Post>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, Post>(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1"))
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn find_by_slug<'e, E>(executor: E, slug: &str) -> Result<Option<Post>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, Post>(&format!("SELECT {POST_COLUMNS} FROM posts WHERE slug = $1"))
            .bind(slug)
            .fetch_optional(executor)
            .await
    }

    /// Published, unblocked posts ordered by creation time then title,
    /// optionally restricted to one category.
    pub async fn list_published<'e, E>(
        executor: E,
        category_id: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostListItem>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, PostListItem>(
            r#"
            SELECT
                p.id, p.title, p.slug, p.photo, p.author_id,
                u.username AS author_username,
                c.slug AS category_slug,
                p.time_create
            FROM posts p
            JOIN users u ON p.author_id = u.id
            JOIN categories c ON p.category_id = c.id
            WHERE p.is_published = TRUE
              AND p.is_blocked = FALSE
              AND ($1 IS NULL OR p.category_id = $1)
            ORDER BY p.time_create, p.title
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(category_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(executor)
        .await
    }

    /// Inserts the post and its tag links on one connection.
    /// Callers wrap this in a transaction.
    pub async fn create(conn: &mut SqliteConnection, new: &NewPost) -> Result<Post, sqlx::Error> {
        let now = Utc::now();
        let post = sqlx::query_as::<_, Post>(&format!(
            r#"
            INSERT INTO posts
                (category_id, author_id, title, slug, content, photo,
                 time_create, time_update, is_published, is_blocked)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7, $8, FALSE)
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(new.category_id)
        .bind(new.author_id)
        .bind(new.title.as_str())
        .bind(new.slug.as_str())
        .bind(new.content.as_str())
        .bind(new.photo.as_str())
        .bind(now)
        .bind(new.is_published)
        .fetch_one(&mut *conn)
        .await?;

        Self::set_tags(conn, post.id, &new.tag_ids).await?;
        Ok(post)
    }

    /// Applies `changes` and refreshes `time_update`.
    pub async fn update(
        conn: &mut SqliteConnection,
        id: i64,
        changes: &PostChanges,
    ) -> Result<Option<Post>, sqlx::Error> {
        let post = sqlx::query_as::<_, Post>(&format!(
            r#"
            UPDATE posts SET
                category_id = COALESCE($2, category_id),
                title = COALESCE($3, title),
                content = COALESCE($4, content),
                photo = COALESCE($5, photo),
                is_published = COALESCE($6, is_published),
                time_update = $7
            WHERE id = $1
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.category_id)
        .bind(changes.title.as_deref())
        .bind(changes.content.as_deref())
        .bind(changes.photo.as_deref())
        .bind(changes.is_published)
        .bind(Utc::now())
        .fetch_optional(&mut *conn)
        .await?;

        if let (Some(post), Some(tag_ids)) = (&post, &changes.tag_ids) {
            Self::set_tags(conn, post.id, tag_ids).await?;
        }
        Ok(post)
    }

    /// Replaces the tag set of a post.
    pub async fn set_tags(
        conn: &mut SqliteConnection,
        post_id: i64,
        tag_ids: &[i64],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM post_tags WHERE post_id = $1")
            .bind(post_id)
            .execute(&mut *conn)
            .await?;

        for tag_id in tag_ids {
            sqlx::query("INSERT OR IGNORE INTO post_tags (post_id, tag_id) VALUES ($1, $2)")
                .bind(post_id)
                .bind(*tag_id)
                .execute(&mut *conn)
                .await?;
        }
        Ok(())
    }

    pub async fn delete<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn set_blocked<'e, E>(executor: E, id: i64, blocked: bool) -> Result<bool, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let result = sqlx::query("UPDATE posts SET is_blocked = $1, time_update = $2 WHERE id = $3")
            .bind(blocked)
            .bind(Utc::now())
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Visible to everyone only when published and not blocked.
    pub fn is_public(&self) -> bool {
        self.is_published && !self.is_blocked
    }
}

/// DTO for creating a new post.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Title length must be between 1 and 255 chars"
    ))]
    pub title: String,

    /// Derived from the title when omitted.
    #[validate(length(min = 1, max = 255))]
    pub slug: Option<String>,

    #[serde(default)]
    #[validate(length(max = 100000, message = "Content is too long"))]
    pub content: String,

    /// Path or URL of an already uploaded picture.
    #[validate(length(min = 1, max = 500))]
    pub photo: String,

    /// Category slug.
    #[validate(length(min = 1, max = 255))]
    pub category: String,

    /// Tag slugs.
    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub is_published: bool,
}

/// DTO for updating a post. Fields are optional.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(max = 100000))]
    pub content: Option<String>,
    #[validate(length(min = 1, max = 500))]
    pub photo: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_published: Option<bool>,
}

/// Query parameters for listing posts.
#[derive(Debug, Default, Deserialize)]
pub struct PostListParams {
    /// Number of items to return (default: 20, max: 100).
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
