// src/handlers/taxonomy.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        category::{Category, CreateCategoryRequest},
        tag::{CreateTagRequest, Tag},
    },
    handlers::required_text,
    utils::slug::resolve_slug,
};

/// Lists all categories alphabetically.
pub async fn list_categories(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(Category::list(&pool).await?))
}

/// Lists all tags alphabetically.
pub async fn list_tags(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(Tag::list(&pool).await?))
}

/// Creates a category.
/// Admin only. Duplicate name or slug is a 409.
pub async fn create_category(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let name = required_text("Name", &payload.name)?;
    let name = name.as_str();
    let slug = resolve_slug(payload.slug.as_deref(), name)?;

    let category = Category::create(&pool, name, &slug)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::Conflict(_) => {
                AppError::Conflict(format!("Category '{}' or slug '{}' already exists", name, slug))
            }
            other => other,
        })?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// Creates a tag.
/// Admin only.
pub async fn create_tag(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateTagRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let name = required_text("Name", &payload.name)?;
    let name = name.as_str();
    let slug = resolve_slug(payload.slug.as_deref(), name)?;

    let tag = Tag::create(&pool, name, &slug)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::Conflict(_) => {
                AppError::Conflict(format!("Tag '{}' or slug '{}' already exists", name, slug))
            }
            other => other,
        })?;

    Ok((StatusCode::CREATED, Json(tag)))
}

/// Deletes a category and, through the foreign key, every post in it.
/// Admin only.
pub async fn delete_category(
    State(pool): State<SqlitePool>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !Category::delete_by_slug(&pool, &slug).await? {
        return Err(AppError::NotFound("Category not found".to_string()));
    }

    tracing::info!("deleted category '{}' with its posts", slug);
    Ok(StatusCode::NO_CONTENT)
}
