// tests/profile_tests.rs

mod common;

use common::{insert_category, insert_post, insert_user, spawn_app, test_pool};
use haba::models::{
    comment::Comment,
    like::{AuthorLike, CommentLike, PostLike},
    post::Post,
    user::UserContext,
};

#[tokio::test]
async fn user_context_matches_worked_example() {
    let pool = test_pool().await;
    let author = insert_user(&pool, "author").await;
    let fans: Vec<_> = {
        let mut fans = Vec::new();
        for i in 0..5 {
            fans.push(insert_user(&pool, &format!("fan{}", i)).await);
        }
        fans
    };
    let category = insert_category(&pool, "General").await;

    // 2 published posts plus 1 that a moderator blocked.
    let first = insert_post(&pool, &author, &category, "first", true).await;
    let second = insert_post(&pool, &author, &category, "second", true).await;
    let blocked = insert_post(&pool, &author, &category, "blocked", true).await;
    assert!(Post::set_blocked(&pool, blocked.id, true).await.unwrap());

    // 3 published comments and one unpublished that must not count.
    let mut comments = Vec::new();
    for text in ["a", "b", "c"] {
        comments.push(Comment::create(&pool, first.id, author.id, text, true).await.unwrap());
    }
    Comment::create(&pool, second.id, author.id, "hidden", false)
        .await
        .unwrap();

    let mut conn = pool.acquire().await.unwrap();
    // 4 author likes.
    for fan in &fans[..4] {
        assert!(AuthorLike::toggle(&mut conn, fan.id, author.id).await.unwrap());
    }
    // 5 post likes spread over the author's posts, the blocked one included.
    for fan in &fans[..3] {
        PostLike::toggle(&mut conn, fan.id, first.id).await.unwrap();
    }
    PostLike::toggle(&mut conn, fans[3].id, second.id).await.unwrap();
    PostLike::toggle(&mut conn, fans[4].id, blocked.id).await.unwrap();
    // 2 comment likes.
    CommentLike::toggle(&mut conn, fans[0].id, comments[0].id).await.unwrap();
    CommentLike::toggle(&mut conn, fans[1].id, comments[2].id).await.unwrap();
    drop(conn);

    let context = UserContext::for_user(&pool, author.id).await.unwrap();
    assert_eq!(
        context,
        UserContext {
            post_count: 2,
            comment_count: 3,
            like_receive_count: 11,
        }
    );

    // Someone else's likes never leak into the author's total.
    let fan_context = UserContext::for_user(&pool, fans[0].id).await.unwrap();
    assert_eq!(fan_context.like_receive_count, 0);
}

#[tokio::test]
async fn user_context_of_a_newcomer_is_all_zero() {
    let pool = test_pool().await;
    let user = insert_user(&pool, "newcomer").await;

    let context = UserContext::for_user(&pool, user.id).await.unwrap();
    assert_eq!(context.post_count, 0);
    assert_eq!(context.comment_count, 0);
    assert_eq!(context.like_receive_count, 0);
}

#[tokio::test]
async fn profile_endpoints_report_context() {
    let app = spawn_app().await;
    insert_category(&app.pool, "News").await;
    let (author_id, author) = app.user("author").await;
    let (_, fan) = app.user("fan").await;

    let post: serde_json::Value = app
        .create_post(
            &author,
            serde_json::json!({"title": "Liked", "photo": "a.jpg", "category": "news", "is_published": true}),
        )
        .await
        .json()
        .await
        .unwrap();

    // Fan likes the post and the author.
    let like_post: serde_json::Value = app
        .client
        .post(app.url(&format!("/like/post/{}", post["id"])))
        .bearer_auth(&fan)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(like_post["liked"], true);
    assert_eq!(like_post["count"], 1);

    let like_author = app
        .client
        .post(app.url(&format!("/like/author/{}", author_id)))
        .bearer_auth(&fan)
        .send()
        .await
        .unwrap();
    assert_eq!(like_author.status().as_u16(), 200);

    let me: serde_json::Value = app
        .client
        .get(app.url("/profile/me"))
        .bearer_auth(&author)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(me["id"], author_id);
    assert_eq!(me["post_count"], 1);
    assert_eq!(me["comment_count"], 0);
    assert_eq!(me["like_receive_count"], 2);

    let public: serde_json::Value = app
        .client
        .get(app.url(&format!("/users/{}/context", author_id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(public["like_receive_count"], 2);

    let missing = app.client.get(app.url("/users/999999/context")).send().await.unwrap();
    assert_eq!(missing.status().as_u16(), 404);

    let anonymous = app.client.get(app.url("/profile/me")).send().await.unwrap();
    assert_eq!(anonymous.status().as_u16(), 401);
}
