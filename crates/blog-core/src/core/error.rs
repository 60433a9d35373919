// crates/blog-core/src/core/error.rs
// ============================================================================
// Module: Blog Errors
// Description: Error taxonomy shared by the post and comment services.
// Purpose: Carry client-facing messages and a category the transport maps.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Every variant carries the exact message returned to clients. The transport
//! layer chooses the HTTP status from the variant alone.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::interfaces::StoreError;

// ============================================================================
// SECTION: Blog Error
// ============================================================================

/// Errors returned by blog services.
///
/// # Invariants
/// - Display output is the client-facing message with no prefix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlogError {
    /// Request body failed validation.
    #[error("{0}")]
    Validation(String),
    /// Request is well-formed but not acceptable.
    #[error("{0}")]
    BadRequest(String),
    /// Addressed resource does not exist.
    #[error("{0}")]
    NotFound(String),
    /// Image upload or download failed.
    #[error("{0}")]
    Image(String),
    /// Store rejected a write because of conflicting data.
    #[error("{0}")]
    Conflict(String),
    /// Store failed unexpectedly.
    #[error("{0}")]
    Store(String),
}

impl BlogError {
    /// Builds the not-found error for a post addressed by a raw path id.
    #[must_use]
    pub fn post_not_found(post_id: i64) -> Self {
        Self::NotFound(format!("Post with id = {post_id} was not found."))
    }

    /// Builds the not-found error for a comment addressed by raw path ids.
    #[must_use]
    pub fn comment_not_found(post_id: i64, comment_id: i64) -> Self {
        Self::NotFound(format!(
            "Comment with id = {comment_id} for post id = {post_id} was not found."
        ))
    }

    /// Returns the client-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(message)
            | Self::BadRequest(message)
            | Self::NotFound(message)
            | Self::Image(message)
            | Self::Conflict(message)
            | Self::Store(message) => message,
        }
    }
}

impl From<StoreError> for BlogError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(message) => Self::Conflict(message),
            other => Self::Store(other.to_string()),
        }
    }
}
