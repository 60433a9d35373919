//! Cross-cutting HTTP behavior tests for blog-server.
// crates/blog-server/tests/surface_api.rs
// =============================================================================
// Module: HTTP Surface Tests
// Description: Health, CORS, body limits, audit events, and the SQLite backend.
// Purpose: Ensure ambient server behavior holds independent of route logic.
// =============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

use blog_core::SharedBlogStore;
use blog_store_sqlite::SqliteBlogStore;
use blog_store_sqlite::SqliteStoreConfig;
use reqwest::Method;
use reqwest::StatusCode;
use serde_json::Value;
use serde_json::json;

mod common;

use common::spawn_server;
use common::spawn_server_with;
use common::test_config;

#[tokio::test]
async fn health_reports_ok() {
    let server = spawn_server().await;
    let response = server.client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "status": "ok" }));
    server.stop().await;
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin() {
    let server = spawn_server().await;
    let response = server
        .client
        .request(Method::OPTIONS, server.url("/api/posts"))
        .header("origin", "http://localhost:3000")
        .header("access-control-request-method", "PUT")
        .header("access-control-request-headers", "content-type")
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "http://localhost:3000");
    assert_eq!(headers["access-control-allow-credentials"], "true");
    assert_eq!(headers["access-control-max-age"], "3600");

    let foreign = server
        .client
        .get(server.url("/api/posts?search=&pageNumber=1&pageSize=1"))
        .header("origin", "http://evil.example")
        .send()
        .await
        .unwrap();
    assert!(foreign.headers().get("access-control-allow-origin").is_none());
    server.stop().await;
}

#[tokio::test]
async fn oversized_json_body_is_rejected() {
    let mut config = test_config();
    config.server.max_body_bytes = 256;
    let server =
        spawn_server_with(config, SharedBlogStore::from_store(blog_core::InMemoryBlogStore::new()))
            .await;
    let response = server
        .client
        .post(server.url("/api/posts"))
        .json(&json!({ "title": "T", "text": "x".repeat(1024), "tags": [] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
    server.stop().await;
}

#[tokio::test]
async fn every_request_is_audited() {
    let server = spawn_server().await;
    server.client.get(server.url("/api/posts/7")).send().await.unwrap();
    server.client.get(server.url("/health")).send().await.unwrap();
    let events = server.audit.events.lock().unwrap().clone();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].method, "GET");
    assert_eq!(events[0].route, "/api/posts/{id}");
    assert_eq!(events[0].status, 404);
    assert_eq!(events[0].peer_ip.as_deref(), Some("127.0.0.1"));
    assert_eq!(events[1].route, "/health");
    assert_eq!(events[1].status, 200);
    server.stop().await;
}

#[tokio::test]
async fn sqlite_backend_persists_across_restarts() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("blog.db");

    let store = SqliteBlogStore::new(SqliteStoreConfig::for_path(&path)).unwrap();
    let server = spawn_server_with(test_config(), SharedBlogStore::from_store(store)).await;
    let created: Value = server
        .client
        .post(server.url("/api/posts"))
        .json(&json!({ "title": "Durable", "text": "Body", "tags": ["db"] }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    server.stop().await;

    let store = SqliteBlogStore::new(SqliteStoreConfig::for_path(&path)).unwrap();
    let server = spawn_server_with(test_config(), SharedBlogStore::from_store(store)).await;
    let id = created["id"].as_i64().unwrap();
    let fetched: Value = server
        .client
        .get(server.url(&format!("/api/posts/{id}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["title"], "Durable");
    assert_eq!(fetched["tags"], json!(["db"]));
    server.stop().await;
}
