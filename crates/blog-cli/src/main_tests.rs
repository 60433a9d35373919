// crates/blog-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Tests
// Description: Unit tests for argument parsing and config commands.
// Purpose: Ensure command wiring and config failures surface as CLI errors.
// Dependencies: blog-cli main helpers
// ============================================================================

//! ## Overview
//! Parses representative command lines and runs `config validate` against
//! temporary files.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use super::Cli;
use super::Commands;
use super::ConfigCommand;
use super::ConfigValidateCommand;
use super::command_config_validate;
use super::log_filter;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn parses_serve_with_config_path() {
    let cli = Cli::try_parse_from(["blog", "serve", "--config", "site.toml"]).unwrap();
    match cli.command {
        Commands::Serve(command) => assert_eq!(command.config, Some(PathBuf::from("site.toml"))),
        Commands::Config { .. } => panic!("expected serve command"),
    }
}

#[test]
fn parses_config_validate_without_path() {
    let cli = Cli::try_parse_from(["blog", "config", "validate"]).unwrap();
    match cli.command {
        Commands::Config { command: ConfigCommand::Validate(command) } => {
            assert!(command.config.is_none());
        }
        Commands::Serve(_) => panic!("expected config command"),
    }
}

#[test]
fn rejects_unknown_subcommand() {
    assert!(Cli::try_parse_from(["blog", "migrate"]).is_err());
}

#[test]
fn config_validate_accepts_valid_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("blog.toml");
    fs::write(&path, "[server]\nbind = \"127.0.0.1:9000\"\n").unwrap();
    let code = command_config_validate(&ConfigValidateCommand { config: Some(path) }).unwrap();
    assert_eq!(code, ExitCode::SUCCESS);
}

#[test]
fn config_validate_reports_invalid_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("blog.toml");
    fs::write(&path, "[store]\ntype = \"sqlite\"\n").unwrap();
    let err = command_config_validate(&ConfigValidateCommand { config: Some(path) }).unwrap_err();
    assert!(err.to_string().contains("sqlite store requires path"));
}

#[test]
fn log_filter_rejects_malformed_directive() {
    if std::env::var_os("RUST_LOG").is_none() {
        assert!(log_filter("blog_server=notalevel").is_err());
        assert!(log_filter("info,blog_server=debug").is_ok());
    }
}
