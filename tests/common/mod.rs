// tests/common/mod.rs

#![allow(dead_code)]

use haba::{
    config::Config,
    db,
    models::{
        category::Category,
        post::{NewPost, Post},
        user::{Role, User},
    },
    routes,
    state::AppState,
};
use sqlx::SqlitePool;

pub const PASSWORD: &str = "password123";

pub struct TestApp {
    pub address: String,
    pub pool: SqlitePool,
    pub client: reqwest::Client,
}

/// Fresh in-memory database with migrations applied.
///
/// A single connection keeps the in-memory database alive and shared
/// between the server and the test body.
pub async fn test_pool() -> SqlitePool {
    let pool = db::connect("sqlite::memory:", 1)
        .await
        .expect("Failed to open in-memory SQLite");
    db::migrate(&pool).await.expect("Failed to migrate database");
    pool
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        comments_premoderated: false,
        admin_username: None,
        admin_password: None,
    }
}

/// Spawns the app on a random port for testing.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(test_config()).await
}

pub async fn spawn_app_with(config: Config) -> TestApp {
    let pool = test_pool().await;

    let state = AppState {
        pool: pool.clone(),
        config,
    };
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        pool,
        client: reqwest::Client::new(),
    }
}

pub fn unique_name(prefix: &str) -> String {
    format!("{}_{}", prefix, &uuid::Uuid::new_v4().to_string()[..8])
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Registers through the API, promotes the role directly in the
    /// database when needed, and logs in. Returns (user id, token).
    pub async fn user_with_role(&self, username: &str, role: Role) -> (i64, String) {
        let resp = self
            .client
            .post(self.url("/auth/register"))
            .json(&serde_json::json!({"username": username, "password": PASSWORD}))
            .send()
            .await
            .expect("Register failed");
        assert_eq!(resp.status().as_u16(), 201);
        let user: serde_json::Value = resp.json().await.unwrap();
        let id = user["id"].as_i64().unwrap();

        if role != Role::User {
            sqlx::query("UPDATE users SET role = $1 WHERE id = $2")
                .bind(role)
                .bind(id)
                .execute(&self.pool)
                .await
                .unwrap();
        }

        (id, self.login(username).await)
    }

    /// Logs in with the shared test password and returns a fresh token.
    pub async fn login(&self, username: &str) -> String {
        let login: serde_json::Value = self
            .client
            .post(self.url("/auth/login"))
            .json(&serde_json::json!({"username": username, "password": PASSWORD}))
            .send()
            .await
            .expect("Login failed")
            .json()
            .await
            .unwrap();

        login["token"].as_str().expect("Token not found").to_string()
    }

    pub async fn user(&self, prefix: &str) -> (i64, String) {
        self.user_with_role(&unique_name(prefix), Role::User).await
    }

    pub async fn create_post(
        &self,
        token: &str,
        body: serde_json::Value,
    ) -> reqwest::Response {
        self.client
            .post(self.url("/create_post/"))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .unwrap()
    }
}

/// Inserts a user directly; the password hash is not usable for login.
pub async fn insert_user(pool: &SqlitePool, username: &str) -> User {
    User::create(pool, username, "not-a-hash", Role::User)
        .await
        .unwrap()
}

pub async fn insert_category(pool: &SqlitePool, name: &str) -> Category {
    Category::create(pool, name, &haba::utils::slug::slugify(name))
        .await
        .unwrap()
}

/// Inserts a post bypassing the API.
pub async fn insert_post(
    pool: &SqlitePool,
    author: &User,
    category: &Category,
    slug: &str,
    is_published: bool,
) -> Post {
    let mut conn = pool.acquire().await.unwrap();
    Post::create(
        &mut conn,
        &NewPost {
            category_id: category.id,
            author_id: author.id,
            title: format!("Title of {}", slug),
            slug: slug.to_string(),
            content: "<p>body</p>".to_string(),
            photo: "photos/2026/01/01/cover.jpg".to_string(),
            is_published,
            tag_ids: Vec::new(),
        },
    )
    .await
    .unwrap()
}
