//! Comment endpoint tests for blog-server.
// crates/blog-server/tests/comments_api.rs
// =============================================================================
// Module: Comment API Tests
// Description: Exercise nested comment routes over HTTP.
// Purpose: Ensure id checks, counters, and not-found messages hold end to end.
// =============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

use reqwest::StatusCode;
use serde_json::Value;
use serde_json::json;

mod common;

use common::TestServer;
use common::spawn_server;

async fn create_post(server: &TestServer) -> i64 {
    let response = server
        .client
        .post(server.url("/api/posts"))
        .json(&json!({ "title": "Post", "text": "Body", "tags": [] }))
        .send()
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    body["id"].as_i64().unwrap()
}

async fn create_comment(server: &TestServer, post_id: i64, text: &str) -> Value {
    let response = server
        .client
        .post(server.url(&format!("/api/posts/{post_id}/comments")))
        .json(&json!({ "text": text, "postId": post_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    response.json().await.unwrap()
}

async fn comments_count(server: &TestServer, post_id: i64) -> i64 {
    let response =
        server.client.get(server.url(&format!("/api/posts/{post_id}"))).send().await.unwrap();
    let body: Value = response.json().await.unwrap();
    body["commentsCount"].as_i64().unwrap()
}

#[tokio::test]
async fn comment_lifecycle_tracks_counter() {
    let server = spawn_server().await;
    let post_id = create_post(&server).await;
    let first = create_comment(&server, post_id, "first").await;
    let second = create_comment(&server, post_id, "second").await;
    assert_eq!(first["postId"], post_id);
    assert_eq!(comments_count(&server, post_id).await, 2);

    let listed: Value = server
        .client
        .get(server.url(&format!("/api/posts/{post_id}/comments")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 2);
    assert_eq!(listed[0]["id"], second["id"]);

    let comment_id = first["id"].as_i64().unwrap();
    let comment_url = server.url(&format!("/api/posts/{post_id}/comments/{comment_id}"));
    let updated = server
        .client
        .put(&comment_url)
        .json(&json!({ "id": comment_id, "text": "edited", "postId": post_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(updated.status(), StatusCode::OK);
    let body: Value = updated.json().await.unwrap();
    assert_eq!(body["text"], "edited");

    let deleted = server.client.delete(&comment_url).send().await.unwrap();
    assert_eq!(deleted.status(), StatusCode::OK);
    assert_eq!(comments_count(&server, post_id).await, 1);

    let missing = server.client.get(&comment_url).send().await.unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let body: Value = missing.json().await.unwrap();
    assert_eq!(
        body["error"],
        format!("Comment with id = {comment_id} for post id = {post_id} was not found.")
    );
    server.stop().await;
}

#[tokio::test]
async fn comment_id_mismatches_are_bad_requests() {
    let server = spawn_server().await;
    let post_id = create_post(&server).await;
    let comment = create_comment(&server, post_id, "text").await;
    let comment_id = comment["id"].as_i64().unwrap();
    let comment_url = server.url(&format!("/api/posts/{post_id}/comments/{comment_id}"));

    let wrong_post = server
        .client
        .post(server.url(&format!("/api/posts/{post_id}/comments")))
        .json(&json!({ "text": "x", "postId": post_id + 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(wrong_post.status(), StatusCode::BAD_REQUEST);

    let no_id = server
        .client
        .put(&comment_url)
        .json(&json!({ "text": "x", "postId": post_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(no_id.status(), StatusCode::BAD_REQUEST);
    let body: Value = no_id.json().await.unwrap();
    assert_eq!(body["error"], "Comment id in the path and request body must match.");
    server.stop().await;
}

#[tokio::test]
async fn comments_on_missing_post_are_not_found() {
    let server = spawn_server().await;
    let listed = server.client.get(server.url("/api/posts/41/comments")).send().await.unwrap();
    assert_eq!(listed.status(), StatusCode::NOT_FOUND);
    let created = server
        .client
        .post(server.url("/api/posts/41/comments"))
        .json(&json!({ "text": "x", "postId": 41 }))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::NOT_FOUND);
    let body: Value = created.json().await.unwrap();
    assert_eq!(body["error"], "Post with id = 41 was not found.");
    server.stop().await;
}

#[tokio::test]
async fn deleting_post_removes_comments() {
    let server = spawn_server().await;
    let post_id = create_post(&server).await;
    let comment = create_comment(&server, post_id, "text").await;
    let comment_id = comment["id"].as_i64().unwrap();
    server.client.delete(server.url(&format!("/api/posts/{post_id}"))).send().await.unwrap();
    let response = server
        .client
        .get(server.url(&format!("/api/posts/{post_id}/comments/{comment_id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    server.stop().await;
}
