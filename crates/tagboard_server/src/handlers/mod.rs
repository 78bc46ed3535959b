//! HTTP request handlers.

/// Feed, tag, single-message, and posting endpoints.
pub mod board;
