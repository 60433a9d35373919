// crates/blog-core/src/lib.rs
// ============================================================================
// Module: Blog Core Library
// Description: Public API surface for the blog domain.
// Purpose: Expose domain types, store interfaces, and post/comment services.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Blog core owns the domain model for posts, tags, and comments together with
//! the request/response payloads exchanged over HTTP. Persistence is reached
//! through the [`PostStore`] and [`CommentStore`] interfaces so the services
//! stay backend-agnostic; an in-memory backend ships for tests and demos.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use interfaces::BlogStore;
pub use interfaces::CommentStore;
pub use interfaces::NewPost;
pub use interfaces::PostFilter;
pub use interfaces::PostPage;
pub use interfaces::PostStore;
pub use interfaces::StoreError;
pub use runtime::CommentService;
pub use runtime::DEFAULT_IMAGE_CONTENT_TYPE;
pub use runtime::InMemoryBlogStore;
pub use runtime::PostService;
pub use runtime::SharedBlogStore;
