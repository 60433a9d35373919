//! Store, cleanup, and logging validation tests for blog-config.
// crates/blog-config/tests/store_validation.rs
// =============================================================================
// Module: Store Config Validation Tests
// Description: Validate store backend, cleanup schedule, and log filter rules.
// Purpose: Ensure backend selection and schedules fail closed.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use blog_config::MAX_CLEANUP_INTERVAL_SECS;
use blog_config::MIN_CLEANUP_INTERVAL_SECS;
use blog_config::StoreType;

mod common;

use common::TestResult;
use common::assert_invalid;
use common::minimal_config;

#[test]
fn memory_store_rejects_path() -> TestResult {
    let mut config = minimal_config()?;
    config.store.path = Some(PathBuf::from("blog.db"));
    assert_invalid(config.validate(), "memory store must not set path")
}

#[test]
fn sqlite_store_requires_path() -> TestResult {
    let mut config = minimal_config()?;
    config.store.store_type = StoreType::Sqlite;
    assert_invalid(config.validate(), "sqlite store requires path")?;
    assert_invalid(config.store.sqlite_config(), "sqlite store requires path")
}

#[test]
fn sqlite_store_rejects_empty_path() -> TestResult {
    let mut config = minimal_config()?;
    config.store.store_type = StoreType::Sqlite;
    config.store.path = Some(PathBuf::new());
    assert_invalid(config.validate(), "store path must be non-empty")
}

#[test]
fn sqlite_config_carries_timeout() -> TestResult {
    let mut config = minimal_config()?;
    config.store.store_type = StoreType::Sqlite;
    config.store.path = Some(PathBuf::from("data/blog.db"));
    config.store.busy_timeout_ms = 250;
    config.validate().map_err(|err| err.to_string())?;
    let sqlite = config.store.sqlite_config().map_err(|err| err.to_string())?;
    if sqlite.busy_timeout_ms != 250 {
        return Err("busy timeout not propagated".to_string());
    }
    Ok(())
}

#[test]
fn cleanup_interval_bounds() -> TestResult {
    let mut config = minimal_config()?;
    config.cleanup.interval_secs = MIN_CLEANUP_INTERVAL_SECS - 1;
    assert_invalid(config.validate(), "cleanup.interval_secs must be between")?;
    config.cleanup.interval_secs = MAX_CLEANUP_INTERVAL_SECS + 1;
    assert_invalid(config.validate(), "cleanup.interval_secs must be between")?;
    config.cleanup.interval_secs = MIN_CLEANUP_INTERVAL_SECS;
    config.validate().map_err(|err| err.to_string())?;
    if config.cleanup.interval() != Duration::from_secs(60) {
        return Err("unexpected interval".to_string());
    }
    Ok(())
}

#[test]
fn log_filter_must_be_non_empty() -> TestResult {
    let mut config = minimal_config()?;
    config.logging.filter = " ".to_string();
    assert_invalid(config.validate(), "logging.filter must be non-empty")
}
