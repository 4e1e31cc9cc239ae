//! Health checks and validation infrastructure
//!
//! This module provides a unified interface for running environment health
//! checks. All checks implement the `Check` trait, making it easy to add
//! new checks without modifying core logic.
//!
//! # Built-in Checks
//!
//! - **git**: System git is installed and the workspace is a repository
//! - **workspace**: conveyor.toml parses and the manifest version field reads
//! - **runtime**: The pinned runtime is installed and matches the pin
//! - **packaging-tool**: The packaging tool is installed
//! - **secrets**: Token environment variables are present (never validated)
//! - **platform-api**: The platform API answers (thorough mode only)

mod git;
mod platform_api;
mod runner;
mod secrets;
mod toolchain;
mod trait_def;
mod workspace;

// Re-export public API
pub use runner::create_default_runner;
pub use secrets::{PLATFORM_TOKEN_ENV, REGISTRY_TOKEN_ENV};
pub use trait_def::{CheckContext, CheckResult, Severity};

// Individual checks are not exported - they're registered in create_default_runner()
// This keeps the API simple and prevents misuse
