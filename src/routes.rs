// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{delete, get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{admin, auth, comment, like, moderation, post, profile, taxonomy},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware, moderator_middleware},
};

/// Assembles the main application router.
///
/// * Public site routes (home, post, category, comments) plus their mutations.
/// * Moderator and admin groups behind role middleware.
/// * Global middleware (Trace, CORS) and shared state.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
        ])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let site_routes = Router::new()
        .route("/", get(post::home))
        .route(
            "/post/{slug}/",
            get(post::get_post)
                .put(post::update_post)
                .delete(post::delete_post),
        )
        // Both spellings are served by the same listing.
        .route("/cat/{slug}", get(post::category_posts))
        .route("/cat/{slug}/", get(post::category_posts))
        .route("/comments/{slug}", get(comment::list_comments))
        .route("/comment/add/", post(comment::add_comment))
        .route("/comment/delete/", post(comment::delete_comment))
        .route("/create_post/", post(post::create_post));

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let taxonomy_routes = Router::new()
        .route("/categories", get(taxonomy::list_categories))
        .route("/tags", get(taxonomy::list_tags));

    let like_routes = Router::new()
        .route("/author/{id}", post(like::toggle_author_like))
        .route("/post/{id}", post(like::toggle_post_like))
        .route("/comment/{id}", post(like::toggle_comment_like));

    let profile_routes = Router::new()
        .route("/profile/me", get(profile::get_me))
        .route("/users/{id}/context", get(profile::user_context))
        .route("/complaints", post(moderation::create_complaint));

    let moderation_routes = Router::new()
        .route("/complaints", get(moderation::list_complaints))
        .route(
            "/complaints/{id}/resolve",
            post(moderation::resolve_complaint),
        )
        .route(
            "/blocks",
            get(moderation::list_blocks).post(moderation::block_user),
        )
        .route("/posts/{id}/block", post(moderation::block_post))
        .route("/posts/{id}/unblock", post(moderation::unblock_post))
        // Auth runs first (outermost), then the role check.
        .route_layer(middleware::from_fn(moderator_middleware))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let admin_routes = Router::new()
        .route("/categories", post(taxonomy::create_category))
        .route("/categories/{slug}", delete(taxonomy::delete_category))
        .route("/tags", post(taxonomy::create_tag))
        .route("/users", get(admin::list_users))
        .route("/users/{id}", put(admin::update_user))
        .route_layer(middleware::from_fn(admin_middleware))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(site_routes)
        .merge(taxonomy_routes)
        .merge(profile_routes)
        .nest("/auth", auth_routes)
        .nest("/like", like_routes)
        .nest("/moderation", moderation_routes)
        .nest("/admin", admin_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
