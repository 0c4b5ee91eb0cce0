// src/models/tag.rs

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteExecutor};
use validator::Validate;

/// Represents the 'tags' table. Name and slug are globally unique.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

impl Tag {
    pub async fn list<'e, E>(executor: E) -> Result<Vec<Tag>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, Tag>("SELECT id, name, slug FROM tags ORDER BY name")
            .fetch_all(executor)
            .await
    }

    pub async fn find_by_slug<'e, E>(executor: E, slug: &str) -> Result<Option<Tag>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, Tag>("SELECT id, name, slug FROM tags WHERE slug = $1")
            .bind(slug)
            .fetch_optional(executor)
            .await
    }

    pub async fn create<'e, E>(executor: E, name: &str, slug: &str) -> Result<Tag, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, Tag>(
            "INSERT INTO tags (name, slug) VALUES ($1, $2) RETURNING id, name, slug",
        )
        .bind(name)
        .bind(slug)
        .fetch_one(executor)
        .await
    }

    /// Tags attached to a post, alphabetical.
    pub async fn for_post<'e, E>(executor: E, post_id: i64) -> Result<Vec<Tag>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.id, t.name, t.slug
            FROM tags t
            JOIN post_tags pt ON pt.tag_id = t.id
            WHERE pt.post_id = $1
            ORDER BY t.name
            "#,
        )
        .bind(post_id)
        .fetch_all(executor)
        .await
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTagRequest {
    #[validate(length(min = 1, max = 25, message = "Tag name must be between 1 and 25 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 255))]
    pub slug: Option<String>,
}
