// crates/blog-store-sqlite/src/lib.rs
// ============================================================================
// Module: Blog SQLite Store
// Description: SQLite-backed implementation of the blog store traits.
// Purpose: Persist posts, tags, and comments durably with transactional writes.
// Dependencies: blog-core, rusqlite
// ============================================================================

//! ## Overview
//! Provides [`SqliteBlogStore`], a [`blog_core::PostStore`] and
//! [`blog_core::CommentStore`] backed by a single `SQLite` database file.

pub mod store;

pub use store::SqliteBlogStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
