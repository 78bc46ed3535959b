//! Process-global environment mutation helpers.

use std::sync::{Mutex, OnceLock};

/// Return the global lock used to serialize environment mutations in tests.
pub fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

/// Set an environment variable through a compatibility wrapper.
///
/// Rust toolchains differ on whether env mutation APIs are `unsafe`.
#[allow(unused_unsafe)]
pub fn set_env_var(key: &str, value: &str) {
    // SAFETY: Callers must serialize mutation when test threads may run in parallel.
    unsafe {
        std::env::set_var(key, value);
    }
}

/// Remove an environment variable through a compatibility wrapper.
#[allow(unused_unsafe)]
pub fn remove_env_var(key: &str) {
    // SAFETY: Callers must serialize mutation when test threads may run in parallel.
    unsafe {
        std::env::remove_var(key);
    }
}

/// Restores an environment variable value on drop.
pub struct EnvGuard {
    key: String,
    previous: Option<String>,
}

impl EnvGuard {
    /// Set `key=value` and restore the previous value when dropped.
    pub fn set(key: &str, value: &str) -> Self {
        let previous = std::env::var(key).ok();
        set_env_var(key, value);
        Self {
            key: key.to_string(),
            previous,
        }
    }

    /// Remove `key` and restore the previous value when dropped.
    pub fn remove(key: &str) -> Self {
        let previous = std::env::var(key).ok();
        remove_env_var(key);
        Self {
            key: key.to_string(),
            previous,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.as_deref() {
            set_env_var(self.key.as_str(), previous);
        } else {
            remove_env_var(self.key.as_str());
        }
    }
}
