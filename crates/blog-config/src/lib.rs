// crates/blog-config/src/lib.rs
// ============================================================================
// Module: Blog Config Library
// Description: Configuration model and validation for the blog server.
// Purpose: Single source of truth for blog.toml semantics.
// Dependencies: blog-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! `blog-config` defines the configuration model for the blog server and
//! provides strict, fail-closed loading and validation.
//!
//! Security posture: config inputs are untrusted.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
