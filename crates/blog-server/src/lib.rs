// crates/blog-server/src/lib.rs
// ============================================================================
// Module: Blog Server Library
// Description: HTTP server exposing the blog API.
// Purpose: Wire configuration, stores, and services into an axum router.
// Dependencies: axum, blog-config, blog-core, blog-store-sqlite, tokio
// ============================================================================

//! ## Overview
//! The blog server maps the REST routes under `/api/posts` onto
//! [`blog_core::PostService`] and [`blog_core::CommentService`]. Store access is
//! synchronous and runs on the blocking pool. Every request emits an audit
//! event, and a background task prunes unused tags on a fixed interval.
//! Security posture: request bodies and path parameters are untrusted.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod cleanup;
pub mod error;
pub mod routes;
pub mod server;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::RequestAuditEvent;
pub use audit::RequestAuditSink;
pub use audit::StderrAuditSink;
pub use cleanup::spawn_tag_cleanup;
pub use error::ApiError;
pub use routes::AppState;
pub use routes::build_router;
pub use server::BlogServer;
pub use server::BlogServerError;
