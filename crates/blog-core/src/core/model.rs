// crates/blog-core/src/core/model.rs
// ============================================================================
// Module: Blog Domain Model
// Description: Posts, tags, comments, and post images as stored.
// Purpose: Shared record types returned by every store backend.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! Domain records mirror the persisted rows. Tags are attached to posts by
//! name and always listed in name order. Images are kept out of [`Post`] and
//! loaded on demand through [`PostImage`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;

use crate::core::identifiers::CommentId;
use crate::core::identifiers::PostId;
use crate::core::identifiers::TagId;

// ============================================================================
// SECTION: Timestamp
// ============================================================================

/// Wall-clock timestamp in unix milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Returns the current UTC time.
    #[must_use]
    pub fn now() -> Self {
        let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
        Self(i64::try_from(millis).unwrap_or(i64::MAX))
    }

    /// Creates a timestamp from unix milliseconds.
    #[must_use]
    pub const fn from_unix_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the timestamp as unix milliseconds.
    #[must_use]
    pub const fn as_unix_millis(self) -> i64 {
        self.0
    }
}

// ============================================================================
// SECTION: Records
// ============================================================================

/// Tag attached to one or more posts.
///
/// # Invariants
/// - `name` is trimmed and lower-case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag identifier.
    pub id: TagId,
    /// Normalized tag name.
    pub name: String,
}

/// Blog post without its image payload.
///
/// # Invariants
/// - `tags` are unique by name and sorted by name.
/// - `comments_count` equals the number of stored comments for the post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Post identifier.
    pub id: PostId,
    /// Post title.
    pub title: String,
    /// Full post text.
    pub text: String,
    /// Tags attached to the post.
    pub tags: Vec<Tag>,
    /// Number of likes.
    pub likes_count: u32,
    /// Number of comments.
    pub comments_count: u32,
    /// Creation time.
    pub created_at: Timestamp,
    /// Last modification time.
    pub updated_at: Timestamp,
}

impl Post {
    /// Returns the tag names in display order.
    #[must_use]
    pub fn tag_names(&self) -> Vec<String> {
        self.tags.iter().map(|tag| tag.name.clone()).collect()
    }
}

/// Comment left on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment identifier.
    pub id: CommentId,
    /// Owning post identifier.
    pub post_id: PostId,
    /// Comment text.
    pub text: String,
    /// Creation time.
    pub created_at: Timestamp,
    /// Last modification time.
    pub updated_at: Timestamp,
}

/// Image bytes stored for a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostImage {
    /// Raw image bytes.
    pub bytes: Vec<u8>,
    /// MIME type reported at upload time.
    pub content_type: String,
}
