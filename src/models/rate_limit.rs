use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::constants::{MAX_SEARCHES_PER_HOUR, MAX_SEARCHES_PER_MINUTE};
use crate::error::{AppError, Result};

/// Shared per-user search quota map, keyed by user id
pub type RateLimiter = Arc<Mutex<HashMap<i64, RateLimitRecord>>>;

/// Windowed counters guarding the external product-search path
///
/// External nutrition APIs have request quotas; this keeps one user from
/// exhausting them. Counters reset when their window expires.
#[derive(Debug, Clone)]
pub struct RateLimitRecord {
    /// Searches in the current minute window
    pub searches_this_minute: u32,
    /// Searches in the current hour window
    pub searches_this_hour: u32,
    /// Unix timestamp when the minute counter resets
    pub minute_reset_at: i64,
    /// Unix timestamp when the hour counter resets
    pub hour_reset_at: i64,
}

impl RateLimitRecord {
    /// Create a new record with fresh windows
    pub fn new(now: i64) -> Self {
        Self {
            searches_this_minute: 0,
            searches_this_hour: 0,
            minute_reset_at: now + 60,
            hour_reset_at: now + 3600,
        }
    }

    /// Check if the quotas allow another search, and count it if so
    /// Returns Ok(()) if allowed, Err(RateLimitExceeded) if not
    pub fn check_and_increment(&mut self, now: i64) -> Result<()> {
        // Reset counters if time windows have expired
        if now >= self.minute_reset_at {
            self.searches_this_minute = 0;
            self.minute_reset_at = now + 60;
        }

        if now >= self.hour_reset_at {
            self.searches_this_hour = 0;
            self.hour_reset_at = now + 3600;
        }

        if self.searches_this_minute >= MAX_SEARCHES_PER_MINUTE {
            tracing::warn!(
                "Per-minute search limit would be exceeded: {}/{}",
                self.searches_this_minute,
                MAX_SEARCHES_PER_MINUTE
            );
            return Err(AppError::RateLimitExceeded);
        }

        if self.searches_this_hour >= MAX_SEARCHES_PER_HOUR {
            tracing::warn!(
                "Per-hour search limit would be exceeded: {}/{}",
                self.searches_this_hour,
                MAX_SEARCHES_PER_HOUR
            );
            return Err(AppError::RateLimitExceeded);
        }

        self.searches_this_minute += 1;
        self.searches_this_hour += 1;

        Ok(())
    }
}

/// Apply the search quota for one user against the shared map
pub fn check_search_quota(limiter: &RateLimiter, user_id: i64, now: i64) -> Result<()> {
    let mut map = limiter
        .lock()
        .map_err(|_| AppError::Internal("Rate limiter lock poisoned".to_string()))?;

    map.entry(user_id)
        .or_insert_with(|| RateLimitRecord::new(now))
        .check_and_increment(now)
}
