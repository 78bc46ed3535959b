//! Data models for persistence and form payloads.

/// Message models and form payloads.
pub mod message;
/// Opaque visitor sessions.
pub mod session;
