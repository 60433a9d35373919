// crates/blog-core/src/core/mod.rs
// ============================================================================
// Module: Blog Core Types
// Description: Domain model, payloads, and pure helpers for the blog.
// Purpose: Group the side-effect free building blocks used by the services.
// Dependencies: serde, thiserror, time
// ============================================================================

//! ## Overview
//! Everything in this module is deterministic and free of I/O: identifiers,
//! domain records, HTTP payloads with their validation rules, mapping into
//! responses, search parsing, and page arithmetic.

pub mod dto;
pub mod error;
pub mod identifiers;
pub mod mapper;
pub mod model;
pub mod pagination;
pub mod search;

pub use dto::CommentRequest;
pub use dto::CommentResponse;
pub use dto::ErrorResponse;
pub use dto::PostRequest;
pub use dto::PostResponse;
pub use dto::PostsResponse;
pub use error::BlogError;
pub use identifiers::CommentId;
pub use identifiers::PostId;
pub use identifiers::TagId;
pub use mapper::ELLIPSIS;
pub use mapper::PREVIEW_LIMIT;
pub use mapper::to_comment_response;
pub use mapper::to_post_response;
pub use mapper::to_posts_response;
pub use mapper::truncate_preview;
pub use model::Comment;
pub use model::Post;
pub use model::PostImage;
pub use model::Tag;
pub use model::Timestamp;
pub use pagination::Page;
pub use pagination::PageRequest;
pub use search::SearchQuery;
pub use search::TAG_PREFIX;
