// crates/blog-core/src/core/dto/tests.rs
// ============================================================================
// Module: Blog Payload Tests
// Description: Unit tests for request validation and wire field names.
// Purpose: Ensure invalid bodies are rejected with field-level messages.
// Dependencies: blog-core, serde_json
// ============================================================================

//! ## Overview
//! Covers blank and missing fields on post and comment requests and checks
//! the camelCase field names used on the wire.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use super::CommentRequest;
use super::PostRequest;
use super::PostResponse;
use crate::core::error::BlogError;
use crate::core::identifiers::PostId;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn post_request(title: &str, text: &str, tags: &[&str]) -> PostRequest {
    PostRequest {
        id: None,
        title: Some(title.to_string()),
        text: Some(text.to_string()),
        tags: Some(tags.iter().map(ToString::to_string).collect()),
    }
}

fn validation_message(result: Result<(), BlogError>) -> String {
    match result.expect_err("expected validation failure") {
        BlogError::Validation(message) => message,
        other => panic!("unexpected error: {other:?}"),
    }
}

// ============================================================================
// SECTION: Post Request
// ============================================================================

#[test]
fn post_request_accepts_empty_tag_list() {
    post_request("Title", "Body", &[]).validate().expect("valid");
}

#[test]
fn post_request_rejects_blank_title_and_text() {
    let message = validation_message(post_request("  ", "\t", &["rust"]).validate());
    assert!(message.contains("title: must not be blank"));
    assert!(message.contains("text: must not be blank"));
}

#[test]
fn post_request_rejects_missing_tags() {
    let mut request = post_request("Title", "Body", &[]);
    request.tags = None;
    assert_eq!(validation_message(request.validate()), "tags: must not be null");
}

#[test]
fn post_request_rejects_blank_tag() {
    let message = validation_message(post_request("Title", "Body", &["rust", " "]).validate());
    assert_eq!(message, "tags[1]: must not be blank");
}

#[test]
fn post_request_missing_fields_parse_as_validation_errors() {
    let request: PostRequest = serde_json::from_str("{}").unwrap();
    let message = validation_message(request.validate());
    assert_eq!(
        message,
        "title: must not be blank; text: must not be blank; tags: must not be null"
    );
}

// ============================================================================
// SECTION: Comment Request
// ============================================================================

#[test]
fn comment_request_reads_camel_case_post_id() {
    let request: CommentRequest =
        serde_json::from_str(r#"{"id":3,"text":"hi","postId":7}"#).unwrap();
    assert_eq!(request.post_id, Some(7));
    assert_eq!(request.id, Some(3));
    request.validate().expect("valid");
}

#[test]
fn comment_request_rejects_missing_post_id() {
    let request = CommentRequest { id: None, text: Some("hi".to_string()), post_id: None };
    assert_eq!(validation_message(request.validate()), "postId: must not be null");
}

#[test]
fn comment_request_rejects_non_positive_post_id() {
    let request = CommentRequest { id: None, text: Some("hi".to_string()), post_id: Some(0) };
    assert_eq!(validation_message(request.validate()), "postId: must be greater than 0");
}

#[test]
fn comment_request_rejects_blank_text() {
    let request = CommentRequest { id: None, text: Some(" ".to_string()), post_id: Some(1) };
    assert_eq!(validation_message(request.validate()), "text: must not be blank");
}

// ============================================================================
// SECTION: Responses
// ============================================================================

#[test]
fn post_response_serializes_camel_case_counts() {
    let response = PostResponse {
        id: PostId::from_raw(4).unwrap(),
        title: "t".to_string(),
        text: "x".to_string(),
        tags: vec!["a".to_string()],
        likes_count: 2,
        comments_count: 1,
    };
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["id"], 4);
    assert_eq!(json["likesCount"], 2);
    assert_eq!(json["commentsCount"], 1);
}
