// crates/blog-core/src/core/mapper.rs
// ============================================================================
// Module: Blog Response Mapping
// Description: Conversion from domain records to API responses.
// Purpose: Build responses and the truncated text previews used in listings.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Listing responses carry a preview of each post's text. Previews count
//! Unicode scalar values, so multi-byte characters are never split.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::dto::CommentResponse;
use crate::core::dto::PostResponse;
use crate::core::dto::PostsResponse;
use crate::core::model::Comment;
use crate::core::model::Post;
use crate::core::pagination::Page;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum number of characters kept in a preview.
pub const PREVIEW_LIMIT: usize = 128;

/// Marker appended to truncated previews.
pub const ELLIPSIS: char = '\u{2026}';

// ============================================================================
// SECTION: Mapping
// ============================================================================

/// Returns `text` unchanged when it fits the preview limit, otherwise its first
/// [`PREVIEW_LIMIT`] characters followed by [`ELLIPSIS`].
#[must_use]
pub fn truncate_preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_LIMIT) {
        None => text.to_string(),
        Some((cut, _)) => {
            let mut preview = String::with_capacity(cut + ELLIPSIS.len_utf8());
            preview.push_str(&text[.. cut]);
            preview.push(ELLIPSIS);
            preview
        }
    }
}

/// Maps a post to a response carrying the given text.
#[must_use]
pub fn to_post_response(post: &Post, text: &str) -> PostResponse {
    PostResponse {
        id: post.id,
        title: post.title.clone(),
        text: text.to_string(),
        tags: post.tag_names(),
        likes_count: post.likes_count,
        comments_count: post.comments_count,
    }
}

/// Maps one page of posts to a listing response with text previews.
#[must_use]
pub fn to_posts_response(posts: &[Post], page: &Page) -> PostsResponse {
    PostsResponse {
        posts: posts.iter().map(|post| to_post_response(post, &truncate_preview(&post.text))).collect(),
        has_prev: page.has_prev,
        has_next: page.has_next,
        last_page: page.last_page,
    }
}

/// Maps a comment to its response.
#[must_use]
pub fn to_comment_response(comment: &Comment) -> CommentResponse {
    CommentResponse { id: comment.id, text: comment.text.clone(), post_id: comment.post_id }
}
