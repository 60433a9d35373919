// crates/blog-core/src/runtime/posts.rs
// ============================================================================
// Module: Blog Post Service
// Description: Post listing, CRUD, likes, and image handling.
// Purpose: Apply request validation and error rules on top of a blog store.
// Dependencies: crate::{core, interfaces, runtime::store}, tracing
// ============================================================================

//! ## Overview
//! [`PostService`] receives raw path identifiers and request bodies, validates
//! them, and translates store results into responses or [`BlogError`] values
//! carrying the exact client-facing message.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use tracing::debug;
use tracing::info;

use crate::core::dto::PostRequest;
use crate::core::dto::PostResponse;
use crate::core::dto::PostsResponse;
use crate::core::error::BlogError;
use crate::core::identifiers::PostId;
use crate::core::mapper::to_post_response;
use crate::core::mapper::to_posts_response;
use crate::core::model::PostImage;
use crate::core::pagination::PageRequest;
use crate::core::search::SearchQuery;
use crate::interfaces::NewPost;
use crate::interfaces::PostFilter;
use crate::interfaces::PostPage;
use crate::interfaces::PostStore;
use crate::runtime::store::SharedBlogStore;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Content type used when an upload does not declare an image type.
pub const DEFAULT_IMAGE_CONTENT_TYPE: &str = "image/jpeg";

/// Message for a body id that disagrees with the path.
const POST_ID_MISMATCH: &str = "Post id in the path and request body must match.";

// ============================================================================
// SECTION: Post Service
// ============================================================================

/// Post operations over a shared store.
#[derive(Clone)]
pub struct PostService {
    /// Backing store.
    store: SharedBlogStore,
}

impl PostService {
    /// Creates a post service over the given store.
    #[must_use]
    pub const fn new(store: SharedBlogStore) -> Self {
        Self { store }
    }

    /// Lists one page of posts matching a search string.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Validation`] for non-positive page parameters,
    /// [`BlogError::BadRequest`] for a page past the end, and store errors.
    pub fn get_posts(
        &self,
        search: &str,
        page_number: i64,
        page_size: i64,
    ) -> Result<PostsResponse, BlogError> {
        let filter = PostFilter::from(SearchQuery::parse(search));
        let request = PageRequest::new(page_number, page_size)?;
        let PostPage { posts, total } =
            self.store.find_page(&filter, request.size, request.offset)?;
        let page = request.resolve(total)?;
        debug!(
            title = %filter.title,
            tags = filter.tags.len(),
            page = page.number,
            total,
            returned = posts.len(),
            "listed posts"
        );
        Ok(to_posts_response(&posts, &page))
    }

    /// Loads one post with its full text.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::NotFound`] when the post does not exist.
    pub fn get_post(&self, raw_post_id: i64) -> Result<PostResponse, BlogError> {
        let post_id = resolve_post_id(raw_post_id)?;
        let post =
            self.store.find_post(post_id)?.ok_or_else(|| BlogError::post_not_found(raw_post_id))?;
        Ok(to_post_response(&post, &post.text))
    }

    /// Creates a post.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Validation`] for invalid bodies and store errors.
    pub fn create_post(&self, request: &PostRequest) -> Result<PostResponse, BlogError> {
        let new_post = to_new_post(request)?;
        let post = self.store.create_post(&new_post)?;
        info!(post_id = %post.id, tags = post.tags.len(), "created post");
        Ok(to_post_response(&post, &post.text))
    }

    /// Replaces a post's title, text, and tags.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Validation`] for invalid bodies,
    /// [`BlogError::BadRequest`] when the body id disagrees with the path, and
    /// [`BlogError::NotFound`] when the post does not exist.
    pub fn update_post(
        &self,
        raw_post_id: i64,
        request: &PostRequest,
    ) -> Result<PostResponse, BlogError> {
        let new_post = to_new_post(request)?;
        if request.id.is_some_and(|body_id| body_id != raw_post_id) {
            return Err(BlogError::BadRequest(POST_ID_MISMATCH.to_string()));
        }
        let post_id = resolve_post_id(raw_post_id)?;
        let post = self
            .store
            .update_post(post_id, &new_post)?
            .ok_or_else(|| BlogError::post_not_found(raw_post_id))?;
        info!(post_id = %post.id, tags = post.tags.len(), "updated post");
        Ok(to_post_response(&post, &post.text))
    }

    /// Deletes a post with its comments and tag links.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::NotFound`] when the post does not exist.
    pub fn delete_post(&self, raw_post_id: i64) -> Result<(), BlogError> {
        let post_id = resolve_post_id(raw_post_id)?;
        if !self.store.delete_post(post_id)? {
            return Err(BlogError::post_not_found(raw_post_id));
        }
        info!(post_id = %post_id, "deleted post");
        Ok(())
    }

    /// Adds a like and returns the new count.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::NotFound`] when the post does not exist.
    pub fn increment_likes(&self, raw_post_id: i64) -> Result<u32, BlogError> {
        let post_id = resolve_post_id(raw_post_id)?;
        let likes = self
            .store
            .increment_likes(post_id)?
            .ok_or_else(|| BlogError::post_not_found(raw_post_id))?;
        debug!(post_id = %post_id, likes, "liked post");
        Ok(likes)
    }

    /// Stores an uploaded image for a post.
    ///
    /// A missing or non-image `content_type` falls back to
    /// [`DEFAULT_IMAGE_CONTENT_TYPE`].
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::NotFound`] when the post does not exist and
    /// [`BlogError::Image`] for empty uploads or a refused write.
    pub fn update_image(
        &self,
        raw_post_id: i64,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<(), BlogError> {
        let post_id = resolve_post_id(raw_post_id)?;
        if !self.store.post_exists(post_id)? {
            return Err(BlogError::post_not_found(raw_post_id));
        }
        if bytes.is_empty() {
            return Err(BlogError::Image("Image cannot be empty.".to_string()));
        }
        let content_type = content_type
            .map(str::trim)
            .filter(|value| value.starts_with("image/"))
            .unwrap_or(DEFAULT_IMAGE_CONTENT_TYPE)
            .to_string();
        let size = bytes.len();
        let image = PostImage { bytes, content_type };
        if !self.store.update_image(post_id, &image)? {
            return Err(BlogError::Image("Failed to update image.".to_string()));
        }
        info!(post_id = %post_id, bytes = size, content_type = %image.content_type, "updated image");
        Ok(())
    }

    /// Loads a post's image.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::NotFound`] when the post does not exist and
    /// [`BlogError::Image`] when the post has no image.
    pub fn get_image(&self, raw_post_id: i64) -> Result<PostImage, BlogError> {
        let post_id = resolve_post_id(raw_post_id)?;
        self.store
            .find_image(post_id)?
            .ok_or_else(|| BlogError::post_not_found(raw_post_id))?
            .ok_or_else(|| {
                BlogError::Image(format!(
                    "Image for post with id = {raw_post_id} is not available."
                ))
            })
    }

    /// Deletes tags that no post references and returns the count removed.
    ///
    /// # Errors
    ///
    /// Returns store errors.
    pub fn cleanup_unused_tags(&self) -> Result<u64, BlogError> {
        let removed = self.store.cleanup_unused_tags()?;
        if removed > 0 {
            info!(removed, "removed unused tags");
        } else {
            debug!("no unused tags to remove");
        }
        Ok(removed)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Converts a raw path id; non-positive ids cannot exist.
pub(crate) fn resolve_post_id(raw: i64) -> Result<PostId, BlogError> {
    PostId::from_raw(raw).ok_or_else(|| BlogError::post_not_found(raw))
}

/// Validates a request and normalizes its tags.
fn to_new_post(request: &PostRequest) -> Result<NewPost, BlogError> {
    request.validate()?;
    let tags: BTreeSet<String> = request
        .tags
        .iter()
        .flatten()
        .map(|tag| tag.trim().to_lowercase())
        .collect();
    Ok(NewPost {
        title: request.title.clone().unwrap_or_default(),
        text: request.text.clone().unwrap_or_default(),
        tags,
    })
}
