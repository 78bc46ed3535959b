//! Configuration loading from environment variables.

use crate::constants::{
    DEFAULT_DB_PATH, DEFAULT_MAX_MESSAGE_SIZE, DEFAULT_PORT, DEFAULT_STATIC_DIR,
};
use crate::error::AppError;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

/// Runtime configuration for Tagboard.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub db_path: String,
    pub port: u16,
    pub max_message_size: usize,
    pub static_dir: String,
    /// Secret used to sign session cookies; `Some` only when sessions are enabled.
    pub session_secret: Option<String>,
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: String) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = resolve_home_dir() {
            return home.join(rest).to_string_lossy().to_string();
        }
    }
    path
}

fn resolve_home_dir() -> Option<PathBuf> {
    if let Ok(home) = env::var("HOME") {
        if !home.trim().is_empty() {
            return Some(PathBuf::from(home));
        }
    }

    if let Ok(profile) = env::var("USERPROFILE") {
        if !profile.trim().is_empty() {
            return Some(PathBuf::from(profile));
        }
    }

    None
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment.
///
/// Missing or unrecognized values are treated as `false`.
pub fn env_flag_enabled(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing.
    ///
    /// # Errors
    /// Returns [`AppError::Config`] when `ENABLE_SESSIONS` is set but no
    /// `SESSION` secret is provided.
    pub fn from_env() -> Result<Self, AppError> {
        let session_secret = if env_flag_enabled("ENABLE_SESSIONS") {
            match non_empty_env("SESSION") {
                Some(secret) => Some(secret),
                None => {
                    return Err(AppError::Config(
                        "ENABLE_SESSIONS requires a SESSION secret".to_string(),
                    ))
                }
            }
        } else {
            None
        };

        Ok(Self {
            db_path: non_empty_env("DB_PATH")
                .map(expand_tilde)
                .unwrap_or_else(|| DEFAULT_DB_PATH.to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(DEFAULT_PORT),
            max_message_size: env::var("MAX_MESSAGE_SIZE")
                .ok()
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(DEFAULT_MAX_MESSAGE_SIZE),
            static_dir: non_empty_env("STATIC_DIR")
                .unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string()),
            session_secret,
        })
    }

    /// Whether opaque sessions are issued to visitors.
    pub fn sessions_enabled(&self) -> bool {
        self.session_secret.is_some()
    }
}
