// tests/api_tests.rs

mod common;

use common::{PASSWORD, insert_category, spawn_app, spawn_app_with, test_config, unique_name};
use haba::models::{tag::Tag, user::Role};

#[tokio::test]
async fn unknown_path_is_404() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(app.url("/random_path_that_does_not_exist"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn register_works_and_hides_password() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(app.url("/auth/register"))
        .json(&serde_json::json!({"username": unique_name("u"), "password": PASSWORD}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["role"], "user");
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn register_fails_validation() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(app.url("/auth/register"))
        .json(&serde_json::json!({"username": "yo", "password": PASSWORD}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn duplicate_username_conflicts_and_bad_password_is_rejected() {
    let app = spawn_app().await;
    let name = unique_name("dup");
    app.user_with_role(&name, Role::User).await;

    let again = app
        .client
        .post(app.url("/auth/register"))
        .json(&serde_json::json!({"username": name, "password": PASSWORD}))
        .send()
        .await
        .unwrap();
    assert_eq!(again.status().as_u16(), 409);

    let login = app
        .client
        .post(app.url("/auth/login"))
        .json(&serde_json::json!({"username": name, "password": "wrong-password"}))
        .send()
        .await
        .unwrap();
    assert_eq!(login.status().as_u16(), 401);
}

#[tokio::test]
async fn create_post_requires_login() {
    let app = spawn_app().await;
    insert_category(&app.pool, "News").await;

    let response = app
        .client
        .post(app.url("/create_post/"))
        .json(&serde_json::json!({"title": "t", "photo": "p.jpg", "category": "news"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn post_lifecycle_through_site_routes() {
    let app = spawn_app().await;
    insert_category(&app.pool, "Travel Notes").await;
    Tag::create(&app.pool, "rust", "rust").await.unwrap();
    let (_, token) = app.user("author").await;

    // Published post with a derived slug and a tag.
    let created = app
        .create_post(
            &token,
            serde_json::json!({
                "title": "Hello, World!",
                "content": "<p>Hi</p><script>alert(1)</script>",
                "photo": "photos/2026/10/19/hello.jpg",
                "category": "travel-notes",
                "tags": ["rust"],
                "is_published": true
            }),
        )
        .await;
    assert_eq!(created.status().as_u16(), 201);
    let post: serde_json::Value = created.json().await.unwrap();
    assert_eq!(post["slug"], "hello-world");
    assert_eq!(post["content"], "<p>Hi</p>");
    assert_eq!(post["is_blocked"], false);

    // Draft stays off the listings.
    let draft = app
        .create_post(
            &token,
            serde_json::json!({
                "title": "Draft",
                "photo": "photos/draft.jpg",
                "category": "travel-notes"
            }),
        )
        .await;
    assert_eq!(draft.status().as_u16(), 201);

    let home: Vec<serde_json::Value> = app
        .client
        .get(app.url("/"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(home.len(), 1);
    assert_eq!(home[0]["slug"], "hello-world");
    assert_eq!(home[0]["category_slug"], "travel-notes");

    // Both category spellings answer the same way.
    for path in ["/cat/travel-notes", "/cat/travel-notes/"] {
        let listing: serde_json::Value = app
            .client
            .get(app.url(path))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(listing["category"]["name"], "Travel Notes");
        assert_eq!(listing["posts"].as_array().unwrap().len(), 1);
    }

    let missing_cat = app.client.get(app.url("/cat/nope/")).send().await.unwrap();
    assert_eq!(missing_cat.status().as_u16(), 404);

    // Detail view carries taxonomy and counters.
    let detail: serde_json::Value = app
        .client
        .get(app.url("/post/hello-world/"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail["tags"][0]["slug"], "rust");
    assert_eq!(detail["category"]["slug"], "travel-notes");
    assert_eq!(detail["comment_count"], 0);
    assert_eq!(detail["like_count"], 0);

    // The draft is hidden from anonymous visitors but visible to its author.
    let anon = app.client.get(app.url("/post/draft/")).send().await.unwrap();
    assert_eq!(anon.status().as_u16(), 404);
    let own = app
        .client
        .get(app.url("/post/draft/"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(own.status().as_u16(), 200);
}

#[tokio::test]
async fn duplicate_post_slug_conflicts() {
    let app = spawn_app().await;
    insert_category(&app.pool, "News").await;
    let (_, token) = app.user("author").await;
    let body = serde_json::json!({"title": "Same title", "photo": "a.jpg", "category": "news"});

    assert_eq!(app.create_post(&token, body.clone()).await.status().as_u16(), 201);
    assert_eq!(app.create_post(&token, body).await.status().as_u16(), 409);
}

#[tokio::test]
async fn unknown_category_or_tag_is_404() {
    let app = spawn_app().await;
    insert_category(&app.pool, "News").await;
    let (_, token) = app.user("author").await;

    let no_cat = app
        .create_post(
            &token,
            serde_json::json!({"title": "A", "photo": "a.jpg", "category": "missing"}),
        )
        .await;
    assert_eq!(no_cat.status().as_u16(), 404);

    let no_tag = app
        .create_post(
            &token,
            serde_json::json!({"title": "B", "photo": "b.jpg", "category": "news", "tags": ["ghost"]}),
        )
        .await;
    assert_eq!(no_tag.status().as_u16(), 404);
}

#[tokio::test]
async fn only_author_or_moderator_may_edit_a_post() {
    let app = spawn_app().await;
    insert_category(&app.pool, "News").await;
    let (_, author) = app.user("author").await;
    let (_, stranger) = app.user("stranger").await;
    let (_, moderator) = app
        .user_with_role(&unique_name("mod"), Role::Moderator)
        .await;

    app.create_post(
        &author,
        serde_json::json!({"title": "Mine", "photo": "a.jpg", "category": "news", "is_published": true}),
    )
    .await;

    let forbidden = app
        .client
        .put(app.url("/post/mine/"))
        .bearer_auth(&stranger)
        .json(&serde_json::json!({"title": "Hijacked"}))
        .send()
        .await
        .unwrap();
    assert_eq!(forbidden.status().as_u16(), 403);

    let updated: serde_json::Value = app
        .client
        .put(app.url("/post/mine/"))
        .bearer_auth(&author)
        .json(&serde_json::json!({"title": "Mine, edited"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated["title"], "Mine, edited");
    assert_eq!(updated["slug"], "mine");

    let deleted = app
        .client
        .delete(app.url("/post/mine/"))
        .bearer_auth(&moderator)
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status().as_u16(), 204);

    let gone = app.client.get(app.url("/post/mine/")).send().await.unwrap();
    assert_eq!(gone.status().as_u16(), 404);
}

#[tokio::test]
async fn comments_add_list_and_delete() {
    let app = spawn_app().await;
    insert_category(&app.pool, "News").await;
    let (_, author) = app.user("author").await;
    let (_, reader) = app.user("reader").await;

    let post: serde_json::Value = app
        .create_post(
            &author,
            serde_json::json!({"title": "Talk", "photo": "a.jpg", "category": "news", "is_published": true}),
        )
        .await
        .json()
        .await
        .unwrap();
    let post_id = post["id"].as_i64().unwrap();

    let added = app
        .client
        .post(app.url("/comment/add/"))
        .bearer_auth(&reader)
        .json(&serde_json::json!({"post_id": post_id, "text": "Nice one"}))
        .send()
        .await
        .unwrap();
    assert_eq!(added.status().as_u16(), 201);
    let comment: serde_json::Value = added.json().await.unwrap();
    assert_eq!(comment["is_published"], true);

    let empty = app
        .client
        .post(app.url("/comment/add/"))
        .bearer_auth(&reader)
        .json(&serde_json::json!({"post_id": post_id, "text": ""}))
        .send()
        .await
        .unwrap();
    assert_eq!(empty.status().as_u16(), 400);

    let listed: Vec<serde_json::Value> = app
        .client
        .get(app.url("/comments/talk"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["text"], "Nice one");

    // The post author did not write the comment.
    let not_yours = app
        .client
        .post(app.url("/comment/delete/"))
        .bearer_auth(&author)
        .json(&serde_json::json!({"comment_id": comment["id"]}))
        .send()
        .await
        .unwrap();
    assert_eq!(not_yours.status().as_u16(), 403);

    let removed = app
        .client
        .post(app.url("/comment/delete/"))
        .bearer_auth(&reader)
        .json(&serde_json::json!({"comment_id": comment["id"]}))
        .send()
        .await
        .unwrap();
    assert_eq!(removed.status().as_u16(), 204);
}

#[tokio::test]
async fn premoderated_comments_start_hidden_but_still_count() {
    let mut config = test_config();
    config.comments_premoderated = true;
    let app = spawn_app_with(config).await;
    insert_category(&app.pool, "News").await;
    let (_, token) = app.user("author").await;

    let post: serde_json::Value = app
        .create_post(
            &token,
            serde_json::json!({"title": "Quiet", "photo": "a.jpg", "category": "news", "is_published": true}),
        )
        .await
        .json()
        .await
        .unwrap();

    let comment: serde_json::Value = app
        .client
        .post(app.url("/comment/add/"))
        .bearer_auth(&token)
        .json(&serde_json::json!({"post_id": post["id"], "text": "waiting"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(comment["is_published"], false);

    let listed: Vec<serde_json::Value> = app
        .client
        .get(app.url("/comments/quiet"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(listed.is_empty());

    let detail: serde_json::Value = app
        .client
        .get(app.url("/post/quiet/"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail["comment_count"], 1);
}

#[tokio::test]
async fn taxonomy_admin_routes_are_guarded() {
    let app = spawn_app().await;
    let (_, user) = app.user("plain").await;
    let (_, admin) = app.user_with_role(&unique_name("admin"), Role::Admin).await;

    let denied = app
        .client
        .post(app.url("/admin/categories"))
        .bearer_auth(&user)
        .json(&serde_json::json!({"name": "Science"}))
        .send()
        .await
        .unwrap();
    assert_eq!(denied.status().as_u16(), 403);

    let anonymous = app
        .client
        .post(app.url("/admin/tags"))
        .json(&serde_json::json!({"name": "rust"}))
        .send()
        .await
        .unwrap();
    assert_eq!(anonymous.status().as_u16(), 401);

    let created: serde_json::Value = app
        .client
        .post(app.url("/admin/categories"))
        .bearer_auth(&admin)
        .json(&serde_json::json!({"name": "Science Fiction"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(created["slug"], "science-fiction");

    let duplicate = app
        .client
        .post(app.url("/admin/categories"))
        .bearer_auth(&admin)
        .json(&serde_json::json!({"name": "Other", "slug": "science-fiction"}))
        .send()
        .await
        .unwrap();
    assert_eq!(duplicate.status().as_u16(), 409);

    for name in ["zeta", "alpha"] {
        let resp = app
            .client
            .post(app.url("/admin/tags"))
            .bearer_auth(&admin)
            .json(&serde_json::json!({"name": name}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 201);
    }

    let tags: Vec<serde_json::Value> = app
        .client
        .get(app.url("/tags"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let names: Vec<&str> = tags.iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["alpha", "zeta"]);
}

#[tokio::test]
async fn blank_titles_and_names_are_rejected_after_trimming() {
    let app = spawn_app().await;
    insert_category(&app.pool, "News").await;
    let (_, author) = app.user("author").await;
    let (_, admin) = app.user_with_role(&unique_name("admin"), Role::Admin).await;

    let blank_create = app
        .create_post(
            &author,
            serde_json::json!({"title": "   ", "slug": "blank", "photo": "a.jpg", "category": "news"}),
        )
        .await;
    assert_eq!(blank_create.status().as_u16(), 400);

    let created = app
        .create_post(
            &author,
            serde_json::json!({"title": "Kept", "photo": "a.jpg", "category": "news"}),
        )
        .await;
    assert_eq!(created.status().as_u16(), 201);

    let blank_update = app
        .client
        .put(app.url("/post/kept/"))
        .bearer_auth(&author)
        .json(&serde_json::json!({"title": " \t "}))
        .send()
        .await
        .unwrap();
    assert_eq!(blank_update.status().as_u16(), 400);

    let post: serde_json::Value = app
        .client
        .get(app.url("/post/kept/"))
        .bearer_auth(&author)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(post["title"], "Kept");

    let blank_tag = app
        .client
        .post(app.url("/admin/tags"))
        .bearer_auth(&admin)
        .json(&serde_json::json!({"name": "  ", "slug": "spaces"}))
        .send()
        .await
        .unwrap();
    assert_eq!(blank_tag.status().as_u16(), 400);
}

#[tokio::test]
async fn liking_twice_unlikes_and_self_likes_are_refused() {
    let app = spawn_app().await;
    insert_category(&app.pool, "News").await;
    let (author_id, author) = app.user("author").await;
    let (_, fan) = app.user("fan").await;

    let post: serde_json::Value = app
        .create_post(
            &author,
            serde_json::json!({"title": "Likeable", "photo": "a.jpg", "category": "news", "is_published": true}),
        )
        .await
        .json()
        .await
        .unwrap();
    let like_url = app.url(&format!("/like/post/{}", post["id"]));

    let first: serde_json::Value = app
        .client
        .post(&like_url)
        .bearer_auth(&fan)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(first, serde_json::json!({"liked": true, "count": 1}));

    let second: serde_json::Value = app
        .client
        .post(&like_url)
        .bearer_auth(&fan)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(second, serde_json::json!({"liked": false, "count": 0}));

    let self_like = app
        .client
        .post(app.url(&format!("/like/author/{}", author_id)))
        .bearer_auth(&author)
        .send()
        .await
        .unwrap();
    assert_eq!(self_like.status().as_u16(), 400);
}

#[tokio::test]
async fn admin_appoints_a_moderator_through_the_api() {
    let app = spawn_app().await;
    let (_, admin) = app.user_with_role(&unique_name("admin"), Role::Admin).await;
    let username = unique_name("helper");
    let (helper_id, helper) = app.user_with_role(&username, Role::User).await;

    let before = app
        .client
        .get(app.url("/moderation/complaints"))
        .bearer_auth(&helper)
        .send()
        .await
        .unwrap();
    assert_eq!(before.status().as_u16(), 403);

    // Only admins manage users.
    let not_admin = app
        .client
        .put(app.url(&format!("/admin/users/{}", helper_id)))
        .bearer_auth(&helper)
        .json(&serde_json::json!({"role": "moderator"}))
        .send()
        .await
        .unwrap();
    assert_eq!(not_admin.status().as_u16(), 403);

    let promoted: serde_json::Value = app
        .client
        .put(app.url(&format!("/admin/users/{}", helper_id)))
        .bearer_auth(&admin)
        .json(&serde_json::json!({"role": "moderator"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(promoted["role"], "moderator");
    assert!(promoted.get("password").is_none());

    let users: Vec<serde_json::Value> = app
        .client
        .get(app.url("/admin/users"))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(users.iter().any(|u| u["id"] == helper_id && u["role"] == "moderator"));

    // The role travels in the token, so a fresh login picks it up.
    let helper = app.login(&username).await;
    let after = app
        .client
        .get(app.url("/moderation/complaints"))
        .bearer_auth(&helper)
        .send()
        .await
        .unwrap();
    assert_eq!(after.status().as_u16(), 200);

    let missing = app
        .client
        .put(app.url("/admin/users/424242"))
        .bearer_auth(&admin)
        .json(&serde_json::json!({"role": "moderator"}))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status().as_u16(), 404);
}

#[tokio::test]
async fn admin_cannot_change_own_role() {
    let app = spawn_app().await;
    let (admin_id, admin) = app.user_with_role(&unique_name("admin"), Role::Admin).await;

    let resp = app
        .client
        .put(app.url(&format!("/admin/users/{}", admin_id)))
        .bearer_auth(&admin)
        .json(&serde_json::json!({"role": "user"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
}
