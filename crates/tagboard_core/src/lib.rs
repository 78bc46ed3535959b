//! Core domain library for Tagboard (config, key codec, tagging, storage).

/// Configuration loading and defaults.
pub mod config;
/// Shared constants.
pub mod constants;
/// Database access layer.
pub mod db;
/// Process-global environment mutation helpers.
pub mod env;
/// Application error types (storage/domain).
pub mod error;
/// Sorted-key namespaces and range bounds.
pub mod keys;
/// Data models for requests and persistence.
pub mod models;
/// Signed session cookie values.
pub mod session;
/// Message sanitizing, tag extraction, and tagged rendering.
pub mod tagger;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::Config;
pub use constants::{DEFAULT_PORT, PAGE_SIZE};
pub use db::Database;
pub use error::AppError;
