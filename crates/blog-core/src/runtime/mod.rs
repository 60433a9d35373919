// crates/blog-core/src/runtime/mod.rs
// ============================================================================
// Module: Blog Runtime
// Description: Services and the in-memory store.
// Purpose: Execute blog operations against any store backend.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Services are cheap to clone and synchronous; callers on an async runtime
//! should run them on a blocking pool.

pub mod comments;
pub mod posts;
pub mod store;

pub use comments::CommentService;
pub use posts::DEFAULT_IMAGE_CONTENT_TYPE;
pub use posts::PostService;
pub use store::InMemoryBlogStore;
pub use store::SharedBlogStore;
