// src/handlers/post.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    config::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE},
    error::AppError,
    handlers::{moderation::ensure_not_blocked, required_text},
    models::{
        category::Category,
        comment::Comment,
        like::{self, PostLike},
        post::{
            CreatePostRequest, NewPost, Post, PostChanges, PostDetail, PostListParams,
            UpdatePostRequest,
        },
        tag::Tag,
        user::User,
    },
    utils::{html::clean_html, jwt::Claims, slug::resolve_slug},
};

/// Clamps pagination input to sane bounds.
fn page(params: &PostListParams) -> (i64, i64) {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = params.offset.unwrap_or(0).max(0);
    (limit, offset)
}

/// Looks up every tag slug, failing on the first unknown one.
async fn resolve_tags(pool: &SqlitePool, slugs: &[String]) -> Result<Vec<i64>, AppError> {
    let mut ids = Vec::with_capacity(slugs.len());
    for slug in slugs {
        let tag = Tag::find_by_slug(pool, slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tag '{}' not found", slug)))?;
        if !ids.contains(&tag.id) {
            ids.push(tag.id);
        }
    }
    Ok(ids)
}

async fn resolve_category(pool: &SqlitePool, slug: &str) -> Result<Category, AppError> {
    Category::find_by_slug(pool, slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category '{}' not found", slug)))
}

/// Author or moderator may touch the post.
fn ensure_can_edit(post: &Post, claims: &Claims) -> Result<(), AppError> {
    if post.author_id != claims.user_id()? && !claims.is_moderator() {
        return Err(AppError::Forbidden(
            "You are not allowed to modify this post".to_string(),
        ));
    }
    Ok(())
}

/// Home page: published, unblocked posts.
pub async fn home(
    State(pool): State<SqlitePool>,
    Query(params): Query<PostListParams>,
) -> Result<impl IntoResponse, AppError> {
    let (limit, offset) = page(&params);
    let posts = Post::list_published(&pool, None, limit, offset).await?;
    Ok(Json(posts))
}

/// Posts of one category. Served for both `/cat/{slug}` and `/cat/{slug}/`.
pub async fn category_posts(
    State(pool): State<SqlitePool>,
    Path(slug): Path<String>,
    Query(params): Query<PostListParams>,
) -> Result<impl IntoResponse, AppError> {
    let category = resolve_category(&pool, &slug).await?;
    let (limit, offset) = page(&params);
    let posts = Post::list_published(&pool, Some(category.id), limit, offset).await?;

    Ok(Json(serde_json::json!({
        "category": category,
        "posts": posts,
    })))
}

/// Single post with its taxonomy and counters.
///
/// Unpublished or blocked posts are only shown to their author and to moderators.
pub async fn get_post(
    State(pool): State<SqlitePool>,
    claims: Option<Claims>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let post = Post::find_by_slug(&pool, &slug)
        .await?
        .ok_or(AppError::NotFound("Post not found".to_string()))?;

    let viewer_id = claims.as_ref().map(Claims::user_id).transpose()?;
    if !post.is_public() {
        let privileged = claims.as_ref().is_some_and(Claims::is_moderator)
            || viewer_id == Some(post.author_id);
        if !privileged {
            return Err(AppError::NotFound("Post not found".to_string()));
        }
    }

    let author = User::find(&pool, post.author_id)
        .await?
        .ok_or_else(|| AppError::InternalServerError("post without author".to_string()))?;
    let category = Category::find(&pool, post.category_id)
        .await?
        .ok_or_else(|| AppError::InternalServerError("post without category".to_string()))?;
    let tags = Tag::for_post(&pool, post.id).await?;
    let comment_count = Comment::get_count(&pool, post.id).await?;
    let like_count = PostLike::get_count(&pool, post.id).await?;
    let liked = match viewer_id {
        Some(uid) => like::exists::<PostLike, _>(&pool, uid, post.id).await?,
        None => false,
    };

    Ok(Json(PostDetail {
        post,
        author_username: author.username,
        category,
        tags,
        comment_count,
        like_count,
        is_liked: liked,
    }))
}

/// Create a new post.
/// Requires: Login, not blocked.
pub async fn create_post(
    State(pool): State<SqlitePool>,
    claims: Claims,
    Json(payload): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let user_id = claims.user_id()?;
    ensure_not_blocked(&pool, user_id).await?;

    let title = required_text("Title", &payload.title)?;
    let slug = resolve_slug(payload.slug.as_deref(), &title)?;
    let category = resolve_category(&pool, &payload.category).await?;
    let tag_ids = resolve_tags(&pool, &payload.tags).await?;

    let new_post = NewPost {
        category_id: category.id,
        author_id: user_id,
        title,
        slug,
        content: clean_html(&payload.content),
        photo: payload.photo,
        is_published: payload.is_published,
        tag_ids,
    };

    let mut tx = pool.begin().await?;
    let post = Post::create(&mut tx, &new_post).await.map_err(|e| {
        match AppError::from(e) {
            AppError::Conflict(_) => {
                AppError::Conflict(format!("Slug '{}' is already taken", new_post.slug))
            }
            other => {
                tracing::error!("Failed to create post: {:?}", other);
                other
            }
        }
    })?;
    tx.commit().await?;

    tracing::info!(post_id = post.id, author_id = user_id, "created post '{}'", post.slug);

    Ok((StatusCode::CREATED, Json(post)))
}

/// Update a post.
/// Requires: Login + (Author OR Moderator). Blocked authors get 403.
pub async fn update_post(
    State(pool): State<SqlitePool>,
    claims: Claims,
    Path(slug): Path<String>,
    Json(payload): Json<UpdatePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let post = Post::find_by_slug(&pool, &slug)
        .await?
        .ok_or(AppError::NotFound("Post not found".to_string()))?;
    ensure_can_edit(&post, &claims)?;
    // Blocked authors must not republish their drafts.
    if !claims.is_moderator() {
        ensure_not_blocked(&pool, claims.user_id()?).await?;
    }

    let title = payload
        .title
        .as_deref()
        .map(|t| required_text("Title", t))
        .transpose()?;
    let category_id = match payload.category.as_deref() {
        Some(cat) => Some(resolve_category(&pool, cat).await?.id),
        None => None,
    };
    let tag_ids = match payload.tags.as_deref() {
        Some(tags) => Some(resolve_tags(&pool, tags).await?),
        None => None,
    };

    let changes = PostChanges {
        category_id,
        title,
        content: payload.content.as_deref().map(clean_html),
        photo: payload.photo,
        is_published: payload.is_published,
        tag_ids,
    };

    let mut tx = pool.begin().await?;
    let updated = Post::update(&mut tx, post.id, &changes)
        .await?
        .ok_or(AppError::NotFound("Post not found".to_string()))?;
    tx.commit().await?;

    Ok(Json(updated))
}

/// Delete a post together with its comments, likes and tag links.
/// Requires: Login + (Author OR Moderator).
pub async fn delete_post(
    State(pool): State<SqlitePool>,
    claims: Claims,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let post = Post::find_by_slug(&pool, &slug)
        .await?
        .ok_or(AppError::NotFound("Post not found".to_string()))?;
    ensure_can_edit(&post, &claims)?;

    Post::delete(&pool, post.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
