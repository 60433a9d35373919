// crates/blog-server/src/cleanup.rs
// ============================================================================
// Module: Tag Cleanup Task
// Description: Periodic removal of tags no longer linked to any post.
// Purpose: Keep the tag table from accumulating orphans after post edits.
// Dependencies: blog-core, tokio, tracing
// ============================================================================

//! ## Overview
//! The cleanup task sleeps for one interval, deletes unused tags, and repeats.
//! The first run happens one full interval after startup. Failures are logged
//! and the next tick proceeds normally.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use blog_core::PostService;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio::time::MissedTickBehavior;
use tracing::info;
use tracing::warn;

// ============================================================================
// SECTION: Task
// ============================================================================

/// Spawns the periodic unused tag cleanup on the current runtime.
///
/// The returned handle should be aborted on shutdown.
#[must_use]
pub fn spawn_tag_cleanup(posts: PostService, period: Duration) -> JoinHandle<()> {
    info!(interval_secs = period.as_secs(), "tag cleanup scheduled");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            run_cleanup(posts.clone()).await;
        }
    })
}

/// Runs one cleanup pass on the blocking pool.
async fn run_cleanup(posts: PostService) {
    match tokio::task::spawn_blocking(move || posts.cleanup_unused_tags()).await {
        Ok(Ok(_)) => {}
        Ok(Err(err)) => warn!(error = %err, "tag cleanup failed"),
        Err(err) => warn!(error = %err, "tag cleanup task panicked"),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
