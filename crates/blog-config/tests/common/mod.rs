// crates/blog-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config validation tests.
// Purpose: Reduce duplication across integration tests for blog-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use blog_config::BlogConfig;
use blog_config::ConfigError;

/// Result type used by config test cases.
pub type TestResult = Result<(), String>;

/// Parses a TOML string into a `BlogConfig` without validation.
pub fn config_from_toml(toml_str: &str) -> Result<BlogConfig, toml::de::Error> {
    toml::from_str(toml_str)
}

/// Returns a minimal config with all defaults applied.
pub fn minimal_config() -> Result<BlogConfig, String> {
    config_from_toml("").map_err(|err| err.to_string())
}

/// Asserts that validation failed with a message containing `needle`.
pub fn assert_invalid<T>(result: Result<T, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}
