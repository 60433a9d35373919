// crates/blog-core/src/interfaces/mod.rs
// ============================================================================
// Module: Blog Store Interfaces
// Description: Persistence traits for posts, tags, and comments.
// Purpose: Decouple the services from concrete storage backends.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! Stores are synchronous and shared across threads; async callers move store
//! calls onto a blocking pool. Each trait method is atomic: a backend applies
//! all row changes of one call in a single transaction or not at all.
//!
//! Absence is reported through `Option`/`bool` results, never through
//! [`StoreError`], so services can produce precise not-found messages.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use thiserror::Error;

use crate::core::identifiers::CommentId;
use crate::core::identifiers::PostId;
use crate::core::model::Comment;
use crate::core::model::Post;
use crate::core::model::PostImage;
use crate::core::search::SearchQuery;

// ============================================================================
// SECTION: Store Errors
// ============================================================================

/// Blog store errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store I/O error.
    #[error("blog store io error: {0}")]
    Io(String),
    /// Store data is corrupted or fails integrity checks.
    #[error("blog store corruption: {0}")]
    Corrupt(String),
    /// Store schema version is incompatible.
    #[error("blog store version mismatch: {0}")]
    VersionMismatch(String),
    /// Store data is invalid.
    #[error("blog store invalid data: {0}")]
    Invalid(String),
    /// Write conflicts with existing data.
    #[error("blog store conflict: {0}")]
    Conflict(String),
    /// Store reported an error.
    #[error("blog store error: {0}")]
    Store(String),
}

// ============================================================================
// SECTION: Store Inputs
// ============================================================================

/// Post listing filter.
///
/// # Invariants
/// - `title` and `tags` are lower-case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    /// Substring the lower-cased title must contain; empty matches all.
    pub title: String,
    /// Tags a post must carry, all of them.
    pub tags: BTreeSet<String>,
}

impl From<SearchQuery> for PostFilter {
    fn from(query: SearchQuery) -> Self {
        Self { title: query.title, tags: query.tags }
    }
}

impl PostFilter {
    /// Returns true when `post` satisfies the filter.
    #[must_use]
    pub fn matches(&self, post: &Post) -> bool {
        if !post.title.to_lowercase().contains(&self.title) {
            return false;
        }
        self.tags.iter().all(|wanted| post.tags.iter().any(|tag| &tag.name == wanted))
    }
}

/// Validated post content for inserts and updates.
///
/// # Invariants
/// - `tags` are normalized (trimmed, lower-case) and unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    /// Post title.
    pub title: String,
    /// Post text.
    pub text: String,
    /// Normalized tag names.
    pub tags: BTreeSet<String>,
}

/// One page of matching posts with the total match count.
///
/// # Invariants
/// - `posts` and `total` come from the same snapshot of the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPage {
    /// Posts in the requested window.
    pub posts: Vec<Post>,
    /// Number of posts matching the filter across all pages.
    pub total: u64,
}

// ============================================================================
// SECTION: Post Store
// ============================================================================

/// Persistence for posts, their tags, likes, and images.
pub trait PostStore {
    /// Lists matching posts ordered by `created_at` then `id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    fn find_posts(
        &self,
        filter: &PostFilter,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Post>, StoreError>;

    /// Counts matching posts.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    fn count_posts(&self, filter: &PostFilter) -> Result<u64, StoreError>;

    /// Lists one window of matching posts together with the match count.
    ///
    /// Both are read in one transaction so paging flags agree with the rows.
    /// An `offset` past the end yields an empty `posts` list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when either query fails.
    fn find_page(
        &self,
        filter: &PostFilter,
        limit: u64,
        offset: u64,
    ) -> Result<PostPage, StoreError>;

    /// Loads a post with its tags.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    fn find_post(&self, post_id: PostId) -> Result<Option<Post>, StoreError>;

    /// Returns true when the post exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    fn post_exists(&self, post_id: PostId) -> Result<bool, StoreError>;

    /// Inserts a post, any missing tags, and its tag links.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the insert fails.
    fn create_post(&self, post: &NewPost) -> Result<Post, StoreError>;

    /// Replaces title, text, and tag set of a post.
    ///
    /// Returns `None` when the post does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the update fails.
    fn update_post(&self, post_id: PostId, post: &NewPost) -> Result<Option<Post>, StoreError>;

    /// Deletes a post with its tag links and comments.
    ///
    /// Returns false when the post does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the delete fails.
    fn delete_post(&self, post_id: PostId) -> Result<bool, StoreError>;

    /// Adds one like and returns the new count (`None` when the post is missing).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the update fails.
    fn increment_likes(&self, post_id: PostId) -> Result<Option<u32>, StoreError>;

    /// Replaces the post image. Returns false when no row was updated.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the update fails.
    fn update_image(&self, post_id: PostId, image: &PostImage) -> Result<bool, StoreError>;

    /// Loads the post image.
    ///
    /// Outer `None` means the post is missing; inner `None` means it has no image.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    fn find_image(&self, post_id: PostId) -> Result<Option<Option<PostImage>>, StoreError>;

    /// Deletes tags no post links to and returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the delete fails.
    fn cleanup_unused_tags(&self) -> Result<u64, StoreError>;

    /// Reports store readiness for health probes.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store is unavailable.
    fn readiness(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

// ============================================================================
// SECTION: Comment Store
// ============================================================================

/// Persistence for comments.
pub trait CommentStore {
    /// Lists comments of a post, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    fn find_comments(&self, post_id: PostId) -> Result<Vec<Comment>, StoreError>;

    /// Loads one comment of a post.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    fn find_comment(
        &self,
        post_id: PostId,
        comment_id: CommentId,
    ) -> Result<Option<Comment>, StoreError>;

    /// Returns true when the comment exists on the post.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    fn comment_exists(&self, post_id: PostId, comment_id: CommentId) -> Result<bool, StoreError>;

    /// Inserts a comment and increments the post's comment count.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the insert fails, including
    /// [`StoreError::Conflict`] when the post does not exist.
    fn create_comment(&self, post_id: PostId, text: &str) -> Result<Comment, StoreError>;

    /// Replaces comment text (`None` when the comment is missing).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the update fails.
    fn update_comment(
        &self,
        post_id: PostId,
        comment_id: CommentId,
        text: &str,
    ) -> Result<Option<Comment>, StoreError>;

    /// Deletes a comment and decrements the post's comment count.
    ///
    /// Returns false when the comment does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the delete fails.
    fn delete_comment(&self, post_id: PostId, comment_id: CommentId) -> Result<bool, StoreError>;
}

// ============================================================================
// SECTION: Combined Store
// ============================================================================

/// Full blog store: posts and comments on one backend.
pub trait BlogStore: PostStore + CommentStore {}

impl<T: PostStore + CommentStore> BlogStore for T {}
