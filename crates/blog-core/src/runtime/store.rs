// crates/blog-core/src/runtime/store.rs
// ============================================================================
// Module: Blog In-Memory Store
// Description: Mutex-guarded blog store and a shared trait-object wrapper.
// Purpose: Provide a dependency-free backend and a cloneable store handle.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! [`InMemoryBlogStore`] keeps every post, tag, and comment behind a single
//! mutex, so each trait call is atomic exactly like a database transaction.
//! [`SharedBlogStore`] wraps any backend behind an `Arc` for the services.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::core::identifiers::CommentId;
use crate::core::identifiers::PostId;
use crate::core::identifiers::TagId;
use crate::core::model::Comment;
use crate::core::model::Post;
use crate::core::model::PostImage;
use crate::core::model::Tag;
use crate::core::model::Timestamp;
use crate::interfaces::BlogStore;
use crate::interfaces::CommentStore;
use crate::interfaces::NewPost;
use crate::interfaces::PostFilter;
use crate::interfaces::PostPage;
use crate::interfaces::PostStore;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: In-Memory State
// ============================================================================

/// Post row as held in memory.
#[derive(Debug, Clone)]
struct StoredPost {
    /// Post title.
    title: String,
    /// Post text.
    text: String,
    /// Linked tag names.
    tags: BTreeSet<String>,
    /// Like counter.
    likes_count: u32,
    /// Comment counter.
    comments_count: u32,
    /// Optional image payload.
    image: Option<PostImage>,
    /// Creation time.
    created_at: Timestamp,
    /// Last modification time.
    updated_at: Timestamp,
}

/// Whole-store state guarded by one mutex.
#[derive(Debug, Default)]
struct MemoryState {
    /// Posts keyed by identifier.
    posts: BTreeMap<PostId, StoredPost>,
    /// Tag identifiers keyed by name.
    tags: BTreeMap<String, TagId>,
    /// Comments keyed by identifier.
    comments: BTreeMap<CommentId, Comment>,
    /// Last issued post identifier.
    last_post_id: i64,
    /// Last issued tag identifier.
    last_tag_id: i64,
    /// Last issued comment identifier.
    last_comment_id: i64,
}

impl MemoryState {
    /// Materializes a stored post with resolved tags.
    fn to_post(&self, post_id: PostId, stored: &StoredPost) -> Post {
        let tags = stored
            .tags
            .iter()
            .filter_map(|name| {
                self.tags.get(name).map(|tag_id| Tag { id: *tag_id, name: name.clone() })
            })
            .collect();
        Post {
            id: post_id,
            title: stored.title.clone(),
            text: stored.text.clone(),
            tags,
            likes_count: stored.likes_count,
            comments_count: stored.comments_count,
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        }
    }

    /// Registers tag names that are not yet known.
    fn ensure_tags(&mut self, names: &BTreeSet<String>) -> Result<(), StoreError> {
        for name in names {
            if !self.tags.contains_key(name) {
                let raw = next_id(&mut self.last_tag_id)?;
                let tag_id = TagId::from_raw(raw)
                    .ok_or_else(|| StoreError::Invalid(format!("invalid tag id {raw}")))?;
                self.tags.insert(name.clone(), tag_id);
            }
        }
        Ok(())
    }

    /// Returns the comment when it belongs to the post.
    fn comment_on(&self, post_id: PostId, comment_id: CommentId) -> Option<&Comment> {
        self.comments.get(&comment_id).filter(|comment| comment.post_id == post_id)
    }

    /// Returns posts matching the filter, newest first.
    fn matching(&self, filter: &PostFilter) -> Vec<Post> {
        let mut posts: Vec<Post> = self
            .posts
            .iter()
            .map(|(post_id, stored)| self.to_post(*post_id, stored))
            .filter(|post| filter.matches(post))
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        posts
    }
}

/// Issues the next identifier from a counter.
fn next_id(counter: &mut i64) -> Result<i64, StoreError> {
    *counter = counter
        .checked_add(1)
        .ok_or_else(|| StoreError::Invalid("identifier space exhausted".to_string()))?;
    Ok(*counter)
}

/// Converts a `u64` into a collection index bound.
fn to_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// In-memory blog store for tests and local runs.
///
/// # Invariants
/// - All state lives behind one mutex; every call observes a consistent view.
/// - Data is lost when the last clone is dropped.
#[derive(Debug, Default, Clone)]
pub struct InMemoryBlogStore {
    /// Shared store state.
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryBlogStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the store state.
    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StoreError> {
        self.state.lock().map_err(|_| StoreError::Store("in-memory store mutex poisoned".to_string()))
    }
}

impl PostStore for InMemoryBlogStore {
    fn find_posts(
        &self,
        filter: &PostFilter,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Post>, StoreError> {
        let state = self.lock()?;
        Ok(state.matching(filter).into_iter().skip(to_usize(offset)).take(to_usize(limit)).collect())
    }

    fn count_posts(&self, filter: &PostFilter) -> Result<u64, StoreError> {
        let state = self.lock()?;
        u64::try_from(state.matching(filter).len())
            .map_err(|err| StoreError::Invalid(err.to_string()))
    }

    fn find_page(
        &self,
        filter: &PostFilter,
        limit: u64,
        offset: u64,
    ) -> Result<PostPage, StoreError> {
        let state = self.lock()?;
        let matching = state.matching(filter);
        let total =
            u64::try_from(matching.len()).map_err(|err| StoreError::Invalid(err.to_string()))?;
        let posts = matching.into_iter().skip(to_usize(offset)).take(to_usize(limit)).collect();
        Ok(PostPage { posts, total })
    }

    fn find_post(&self, post_id: PostId) -> Result<Option<Post>, StoreError> {
        let state = self.lock()?;
        Ok(state.posts.get(&post_id).map(|stored| state.to_post(post_id, stored)))
    }

    fn post_exists(&self, post_id: PostId) -> Result<bool, StoreError> {
        Ok(self.lock()?.posts.contains_key(&post_id))
    }

    fn create_post(&self, post: &NewPost) -> Result<Post, StoreError> {
        let mut state = self.lock()?;
        state.ensure_tags(&post.tags)?;
        let raw = next_id(&mut state.last_post_id)?;
        let post_id = PostId::from_raw(raw)
            .ok_or_else(|| StoreError::Invalid(format!("invalid post id {raw}")))?;
        let now = Timestamp::now();
        let stored = StoredPost {
            title: post.title.clone(),
            text: post.text.clone(),
            tags: post.tags.clone(),
            likes_count: 0,
            comments_count: 0,
            image: None,
            created_at: now,
            updated_at: now,
        };
        let created = state.to_post(post_id, &stored);
        state.posts.insert(post_id, stored);
        Ok(created)
    }

    fn update_post(&self, post_id: PostId, post: &NewPost) -> Result<Option<Post>, StoreError> {
        let mut state = self.lock()?;
        if !state.posts.contains_key(&post_id) {
            return Ok(None);
        }
        state.ensure_tags(&post.tags)?;
        let Some(stored) = state.posts.get_mut(&post_id) else {
            return Ok(None);
        };
        stored.title.clone_from(&post.title);
        stored.text.clone_from(&post.text);
        stored.tags.clone_from(&post.tags);
        stored.updated_at = Timestamp::now();
        let snapshot = stored.clone();
        Ok(Some(state.to_post(post_id, &snapshot)))
    }

    fn delete_post(&self, post_id: PostId) -> Result<bool, StoreError> {
        let mut state = self.lock()?;
        if state.posts.remove(&post_id).is_none() {
            return Ok(false);
        }
        state.comments.retain(|_, comment| comment.post_id != post_id);
        Ok(true)
    }

    fn increment_likes(&self, post_id: PostId) -> Result<Option<u32>, StoreError> {
        let mut state = self.lock()?;
        let Some(stored) = state.posts.get_mut(&post_id) else {
            return Ok(None);
        };
        stored.likes_count = stored
            .likes_count
            .checked_add(1)
            .ok_or_else(|| StoreError::Invalid("likes counter overflow".to_string()))?;
        stored.updated_at = Timestamp::now();
        Ok(Some(stored.likes_count))
    }

    fn update_image(&self, post_id: PostId, image: &PostImage) -> Result<bool, StoreError> {
        let mut state = self.lock()?;
        let Some(stored) = state.posts.get_mut(&post_id) else {
            return Ok(false);
        };
        stored.image = Some(image.clone());
        stored.updated_at = Timestamp::now();
        Ok(true)
    }

    fn find_image(&self, post_id: PostId) -> Result<Option<Option<PostImage>>, StoreError> {
        let state = self.lock()?;
        Ok(state.posts.get(&post_id).map(|stored| stored.image.clone()))
    }

    fn cleanup_unused_tags(&self) -> Result<u64, StoreError> {
        let mut state = self.lock()?;
        let used: BTreeSet<String> =
            state.posts.values().flat_map(|stored| stored.tags.iter().cloned()).collect();
        let before = state.tags.len();
        state.tags.retain(|name, _| used.contains(name));
        u64::try_from(before - state.tags.len()).map_err(|err| StoreError::Invalid(err.to_string()))
    }
}

impl CommentStore for InMemoryBlogStore {
    fn find_comments(&self, post_id: PostId) -> Result<Vec<Comment>, StoreError> {
        let state = self.lock()?;
        let mut comments: Vec<Comment> =
            state.comments.values().filter(|comment| comment.post_id == post_id).cloned().collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(comments)
    }

    fn find_comment(
        &self,
        post_id: PostId,
        comment_id: CommentId,
    ) -> Result<Option<Comment>, StoreError> {
        Ok(self.lock()?.comment_on(post_id, comment_id).cloned())
    }

    fn comment_exists(&self, post_id: PostId, comment_id: CommentId) -> Result<bool, StoreError> {
        Ok(self.lock()?.comment_on(post_id, comment_id).is_some())
    }

    fn create_comment(&self, post_id: PostId, text: &str) -> Result<Comment, StoreError> {
        let mut state = self.lock()?;
        if !state.posts.contains_key(&post_id) {
            return Err(StoreError::Conflict(format!("post {post_id} does not exist")));
        }
        let raw = next_id(&mut state.last_comment_id)?;
        let comment_id = CommentId::from_raw(raw)
            .ok_or_else(|| StoreError::Invalid(format!("invalid comment id {raw}")))?;
        let now = Timestamp::now();
        if let Some(stored) = state.posts.get_mut(&post_id) {
            stored.comments_count = stored.comments_count.saturating_add(1);
            stored.updated_at = now;
        }
        let comment =
            Comment { id: comment_id, post_id, text: text.to_string(), created_at: now, updated_at: now };
        state.comments.insert(comment_id, comment.clone());
        Ok(comment)
    }

    fn update_comment(
        &self,
        post_id: PostId,
        comment_id: CommentId,
        text: &str,
    ) -> Result<Option<Comment>, StoreError> {
        let mut state = self.lock()?;
        let Some(comment) =
            state.comments.get_mut(&comment_id).filter(|comment| comment.post_id == post_id)
        else {
            return Ok(None);
        };
        comment.text = text.to_string();
        comment.updated_at = Timestamp::now();
        Ok(Some(comment.clone()))
    }

    fn delete_comment(&self, post_id: PostId, comment_id: CommentId) -> Result<bool, StoreError> {
        let mut state = self.lock()?;
        if state.comment_on(post_id, comment_id).is_none() {
            return Ok(false);
        }
        state.comments.remove(&comment_id);
        if let Some(stored) = state.posts.get_mut(&post_id) {
            stored.comments_count = stored.comments_count.saturating_sub(1);
            stored.updated_at = Timestamp::now();
        }
        Ok(true)
    }
}

// ============================================================================
// SECTION: Shared Store
// ============================================================================

/// Shared blog store backed by a trait object.
#[derive(Clone)]
pub struct SharedBlogStore {
    /// Inner store implementation.
    inner: Arc<dyn BlogStore + Send + Sync>,
}

impl SharedBlogStore {
    /// Wraps a store implementation in an `Arc`.
    #[must_use]
    pub fn from_store(store: impl BlogStore + Send + Sync + 'static) -> Self {
        Self { inner: Arc::new(store) }
    }

    /// Wraps an existing shared store.
    #[must_use]
    pub fn new(inner: Arc<dyn BlogStore + Send + Sync>) -> Self {
        Self { inner }
    }
}

impl PostStore for SharedBlogStore {
    fn find_posts(
        &self,
        filter: &PostFilter,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Post>, StoreError> {
        self.inner.find_posts(filter, limit, offset)
    }

    fn count_posts(&self, filter: &PostFilter) -> Result<u64, StoreError> {
        self.inner.count_posts(filter)
    }

    fn find_page(
        &self,
        filter: &PostFilter,
        limit: u64,
        offset: u64,
    ) -> Result<PostPage, StoreError> {
        self.inner.find_page(filter, limit, offset)
    }

    fn find_post(&self, post_id: PostId) -> Result<Option<Post>, StoreError> {
        self.inner.find_post(post_id)
    }

    fn post_exists(&self, post_id: PostId) -> Result<bool, StoreError> {
        self.inner.post_exists(post_id)
    }

    fn create_post(&self, post: &NewPost) -> Result<Post, StoreError> {
        self.inner.create_post(post)
    }

    fn update_post(&self, post_id: PostId, post: &NewPost) -> Result<Option<Post>, StoreError> {
        self.inner.update_post(post_id, post)
    }

    fn delete_post(&self, post_id: PostId) -> Result<bool, StoreError> {
        self.inner.delete_post(post_id)
    }

    fn increment_likes(&self, post_id: PostId) -> Result<Option<u32>, StoreError> {
        self.inner.increment_likes(post_id)
    }

    fn update_image(&self, post_id: PostId, image: &PostImage) -> Result<bool, StoreError> {
        self.inner.update_image(post_id, image)
    }

    fn find_image(&self, post_id: PostId) -> Result<Option<Option<PostImage>>, StoreError> {
        self.inner.find_image(post_id)
    }

    fn cleanup_unused_tags(&self) -> Result<u64, StoreError> {
        self.inner.cleanup_unused_tags()
    }

    fn readiness(&self) -> Result<(), StoreError> {
        self.inner.readiness()
    }
}

impl CommentStore for SharedBlogStore {
    fn find_comments(&self, post_id: PostId) -> Result<Vec<Comment>, StoreError> {
        self.inner.find_comments(post_id)
    }

    fn find_comment(
        &self,
        post_id: PostId,
        comment_id: CommentId,
    ) -> Result<Option<Comment>, StoreError> {
        self.inner.find_comment(post_id, comment_id)
    }

    fn comment_exists(&self, post_id: PostId, comment_id: CommentId) -> Result<bool, StoreError> {
        self.inner.comment_exists(post_id, comment_id)
    }

    fn create_comment(&self, post_id: PostId, text: &str) -> Result<Comment, StoreError> {
        self.inner.create_comment(post_id, text)
    }

    fn update_comment(
        &self,
        post_id: PostId,
        comment_id: CommentId,
        text: &str,
    ) -> Result<Option<Comment>, StoreError> {
        self.inner.update_comment(post_id, comment_id, text)
    }

    fn delete_comment(&self, post_id: PostId, comment_id: CommentId) -> Result<bool, StoreError> {
        self.inner.delete_comment(post_id, comment_id)
    }
}
