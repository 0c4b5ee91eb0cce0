// src/models/category.rs

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteExecutor};
use validator::Validate;

/// Represents the 'categories' table. Name and slug are globally unique.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

impl Category {
    /// All categories, alphabetical by name.
    pub async fn list<'e, E>(executor: E) -> Result<Vec<Category>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, Category>("SELECT id, name, slug FROM categories ORDER BY name")
            .fetch_all(executor)
            .await
    }

    pub async fn find<'e, E>(executor: E, id: i64) -> Result<Option<Category>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, Category>("SELECT id, name, slug FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn find_by_slug<'e, E>(executor: E, slug: &str) -> Result<Option<Category>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, Category>("SELECT id, name, slug FROM categories WHERE slug = $1")
            .bind(slug)
            .fetch_optional(executor)
            .await
    }

    pub async fn create<'e, E>(executor: E, name: &str, slug: &str) -> Result<Category, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name, slug) VALUES ($1, $2) RETURNING id, name, slug",
        )
        .bind(name)
        .bind(slug)
        .fetch_one(executor)
        .await
    }

    /// Deletes the category; its posts go with it.
    /// Returns whether a row was removed.
    pub async fn delete_by_slug<'e, E>(executor: E, slug: &str) -> Result<bool, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM categories WHERE slug = $1")
            .bind(slug)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// DTO for creating a category. The slug is derived from the name when absent.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 128, message = "Name must be between 1 and 128 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 255))]
    pub slug: Option<String>,
}
