//! Creation timestamps for index keys.

use crate::error::AppError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

pub(super) fn unix_timestamp_millis(now: SystemTime) -> Result<u64, AppError> {
    now.duration_since(UNIX_EPOCH)
        .map_err(|err| {
            AppError::StorageMessage(format!(
                "Failed to compute message timestamp from system clock: {}",
                err
            ))
        })
        .and_then(|duration| {
            u64::try_from(duration.as_millis()).map_err(|_| {
                AppError::StorageMessage("System clock is out of range".to_string())
            })
        })
}

/// Millisecond clock that never hands out the same value twice.
///
/// Two posts in the same millisecond would otherwise collide on their feed key.
#[derive(Debug, Default)]
pub(super) struct MonotonicClock {
    last: AtomicU64,
}

impl MonotonicClock {
    pub(super) fn next_millis(&self) -> Result<u64, AppError> {
        let now = unix_timestamp_millis(SystemTime::now())?;
        let mut previous = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(previous.saturating_add(1));
            match self.last.compare_exchange_weak(
                previous,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return Ok(candidate),
                Err(actual) => previous = actual,
            }
        }
    }
}
