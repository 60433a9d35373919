// crates/blog-core/src/runtime/comments.rs
// ============================================================================
// Module: Blog Comment Service
// Description: Comment CRUD scoped to a post.
// Purpose: Enforce path/body consistency and not-found rules for comments.
// Dependencies: crate::{core, interfaces, runtime}, tracing
// ============================================================================

//! ## Overview
//! Comments are always addressed through their post. Identifiers in request
//! bodies must agree with the path before any store call is made.

// ============================================================================
// SECTION: Imports
// ============================================================================

use tracing::debug;
use tracing::info;

use crate::core::dto::CommentRequest;
use crate::core::dto::CommentResponse;
use crate::core::error::BlogError;
use crate::core::identifiers::CommentId;
use crate::core::identifiers::PostId;
use crate::core::mapper::to_comment_response;
use crate::interfaces::CommentStore;
use crate::interfaces::PostStore;
use crate::runtime::posts::resolve_post_id;
use crate::runtime::store::SharedBlogStore;

// ============================================================================
// SECTION: Comment Service
// ============================================================================

/// Comment operations over a shared store.
#[derive(Clone)]
pub struct CommentService {
    /// Backing store.
    store: SharedBlogStore,
}

impl CommentService {
    /// Creates a comment service over the given store.
    #[must_use]
    pub const fn new(store: SharedBlogStore) -> Self {
        Self { store }
    }

    /// Lists comments of a post, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::NotFound`] when the post does not exist.
    pub fn get_comments(&self, raw_post_id: i64) -> Result<Vec<CommentResponse>, BlogError> {
        let post_id = self.existing_post(raw_post_id)?;
        let comments = self.store.find_comments(post_id)?;
        debug!(post_id = %post_id, count = comments.len(), "listed comments");
        Ok(comments.iter().map(to_comment_response).collect())
    }

    /// Loads one comment of a post.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::NotFound`] when the post or comment does not exist.
    pub fn get_comment(
        &self,
        raw_post_id: i64,
        raw_comment_id: i64,
    ) -> Result<CommentResponse, BlogError> {
        let post_id = self.existing_post(raw_post_id)?;
        let comment_id = resolve_comment_id(raw_post_id, raw_comment_id)?;
        self.store
            .find_comment(post_id, comment_id)?
            .map(|comment| to_comment_response(&comment))
            .ok_or_else(|| BlogError::comment_not_found(raw_post_id, raw_comment_id))
    }

    /// Adds a comment to a post.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Validation`] for invalid bodies,
    /// [`BlogError::NotFound`] when the post does not exist, and
    /// [`BlogError::BadRequest`] when the body post id disagrees with the path.
    pub fn create_comment(
        &self,
        raw_post_id: i64,
        request: &CommentRequest,
    ) -> Result<CommentResponse, BlogError> {
        request.validate()?;
        let post_id = self.existing_post(raw_post_id)?;
        ensure_post_id_matches(raw_post_id, request)?;
        let comment = self.store.create_comment(post_id, request_text(request))?;
        info!(post_id = %post_id, comment_id = %comment.id, "created comment");
        Ok(to_comment_response(&comment))
    }

    /// Replaces a comment's text.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Validation`] for invalid bodies,
    /// [`BlogError::BadRequest`] when body ids disagree with the path, and
    /// [`BlogError::NotFound`] when the post or comment does not exist.
    pub fn update_comment(
        &self,
        raw_post_id: i64,
        raw_comment_id: i64,
        request: &CommentRequest,
    ) -> Result<CommentResponse, BlogError> {
        request.validate()?;
        ensure_post_id_matches(raw_post_id, request)?;
        if request.id != Some(raw_comment_id) {
            return Err(BlogError::BadRequest(
                "Comment id in the path and request body must match.".to_string(),
            ));
        }
        let post_id = self.existing_post(raw_post_id)?;
        let comment_id = resolve_comment_id(raw_post_id, raw_comment_id)?;
        let comment = self
            .store
            .update_comment(post_id, comment_id, request_text(request))?
            .ok_or_else(|| BlogError::comment_not_found(raw_post_id, raw_comment_id))?;
        info!(post_id = %post_id, comment_id = %comment.id, "updated comment");
        Ok(to_comment_response(&comment))
    }

    /// Deletes a comment.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::NotFound`] when the comment does not exist on the post.
    pub fn delete_comment(&self, raw_post_id: i64, raw_comment_id: i64) -> Result<(), BlogError> {
        let not_found = || BlogError::comment_not_found(raw_post_id, raw_comment_id);
        let post_id = PostId::from_raw(raw_post_id).ok_or_else(not_found)?;
        let comment_id = CommentId::from_raw(raw_comment_id).ok_or_else(not_found)?;
        if !self.store.delete_comment(post_id, comment_id)? {
            return Err(not_found());
        }
        info!(post_id = %post_id, comment_id = %comment_id, "deleted comment");
        Ok(())
    }

    /// Resolves a path id to a post that exists.
    fn existing_post(&self, raw_post_id: i64) -> Result<PostId, BlogError> {
        let post_id = resolve_post_id(raw_post_id)?;
        if self.store.post_exists(post_id)? {
            Ok(post_id)
        } else {
            Err(BlogError::post_not_found(raw_post_id))
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Converts a raw comment path id; non-positive ids cannot exist.
fn resolve_comment_id(raw_post_id: i64, raw_comment_id: i64) -> Result<CommentId, BlogError> {
    CommentId::from_raw(raw_comment_id)
        .ok_or_else(|| BlogError::comment_not_found(raw_post_id, raw_comment_id))
}

/// Rejects a body post id that disagrees with the path.
fn ensure_post_id_matches(raw_post_id: i64, request: &CommentRequest) -> Result<(), BlogError> {
    if request.post_id == Some(raw_post_id) {
        Ok(())
    } else {
        Err(BlogError::BadRequest("Post id in the path and request body must match.".to_string()))
    }
}

/// Returns the validated comment text.
fn request_text(request: &CommentRequest) -> &str {
    request.text.as_deref().unwrap_or_default()
}
