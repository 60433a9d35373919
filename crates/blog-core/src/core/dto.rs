// crates/blog-core/src/core/dto.rs
// ============================================================================
// Module: Blog Payloads
// Description: JSON request and response bodies for the blog HTTP API.
// Purpose: Define wire shapes and the validation applied to incoming bodies.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Payloads use camelCase field names on the wire. Request bodies keep every
//! field optional at the serde layer so that missing or `null` values surface
//! as validation messages instead of parse failures.
//!
//! Security posture: request bodies are untrusted input; call `validate` before
//! handing them to a service.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::error::BlogError;
use crate::core::identifiers::CommentId;
use crate::core::identifiers::PostId;

// ============================================================================
// SECTION: Requests
// ============================================================================

/// Body for creating or replacing a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    /// Optional post identifier; must match the path on update when present.
    #[serde(default)]
    pub id: Option<i64>,
    /// Post title.
    #[serde(default)]
    pub title: Option<String>,
    /// Post text.
    #[serde(default)]
    pub text: Option<String>,
    /// Tag names; required but may be empty.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl PostRequest {
    /// Validates required fields.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Validation`] listing every violated field.
    pub fn validate(&self) -> Result<(), BlogError> {
        let mut violations = Vec::new();
        if is_blank(self.title.as_deref()) {
            violations.push("title: must not be blank".to_string());
        }
        if is_blank(self.text.as_deref()) {
            violations.push("text: must not be blank".to_string());
        }
        match &self.tags {
            None => violations.push("tags: must not be null".to_string()),
            Some(tags) => {
                for (index, tag) in tags.iter().enumerate() {
                    if tag.trim().is_empty() {
                        violations.push(format!("tags[{index}]: must not be blank"));
                    }
                }
            }
        }
        finish(violations)
    }
}

/// Body for creating or replacing a comment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    /// Optional comment identifier; required on update.
    #[serde(default)]
    pub id: Option<i64>,
    /// Comment text.
    #[serde(default)]
    pub text: Option<String>,
    /// Owning post identifier; must match the path.
    #[serde(default)]
    pub post_id: Option<i64>,
}

impl CommentRequest {
    /// Validates required fields.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Validation`] listing every violated field.
    pub fn validate(&self) -> Result<(), BlogError> {
        let mut violations = Vec::new();
        if is_blank(self.text.as_deref()) {
            violations.push("text: must not be blank".to_string());
        }
        match self.post_id {
            None => violations.push("postId: must not be null".to_string()),
            Some(raw) if raw <= 0 => {
                violations.push("postId: must be greater than 0".to_string());
            }
            Some(_) => {}
        }
        finish(violations)
    }
}

// ============================================================================
// SECTION: Responses
// ============================================================================

/// Post as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    /// Post identifier.
    pub id: PostId,
    /// Post title.
    pub title: String,
    /// Full text or a truncated preview, depending on the endpoint.
    pub text: String,
    /// Tag names ordered by name.
    pub tags: Vec<String>,
    /// Number of likes.
    pub likes_count: u32,
    /// Number of comments.
    pub comments_count: u32,
}

/// One page of posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostsResponse {
    /// Posts on the page, newest first.
    pub posts: Vec<PostResponse>,
    /// True when a previous page exists.
    pub has_prev: bool,
    /// True when a following page exists.
    pub has_next: bool,
    /// Number of the last page (at least 1).
    pub last_page: u64,
}

/// Comment as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    /// Comment identifier.
    pub id: CommentId,
    /// Comment text.
    pub text: String,
    /// Owning post identifier.
    pub post_id: PostId,
}

/// Error body shared by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

impl ErrorResponse {
    /// Builds an error body from a message.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns true when a value is missing or whitespace only.
fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|value| value.trim().is_empty())
}

/// Converts collected violations into a validation result.
fn finish(violations: Vec<String>) -> Result<(), BlogError> {
    if violations.is_empty() { Ok(()) } else { Err(BlogError::Validation(violations.join("; "))) }
}

#[cfg(test)]
mod tests;
