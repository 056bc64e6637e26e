//! Per-day request accounting.

use serde::{Deserialize, Serialize};
use spellkit_core::Timestamp;
use std::time::Duration;

/// Persisted usage counters for one calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageStats {
    /// `YYYY-MM-DD` of the day these counters belong to.
    pub date: String,
    pub count: u32,
    /// Epoch milliseconds of the last real provider call, 0 if none.
    pub last_request_timestamp: i64,
    /// Epoch milliseconds until which calls fail fast, 0 if none.
    pub cooldown_until: i64,
}

impl UsageStats {
    pub fn fresh(now: Timestamp) -> Self {
        Self {
            date: day_key(now),
            count: 0,
            last_request_timestamp: 0,
            cooldown_until: 0,
        }
    }

    /// Reset the counters when `now` falls on a different day.
    /// Returns true if a reset happened.
    pub fn roll_over(&mut self, now: Timestamp) -> bool {
        let today = day_key(now);
        if self.date == today {
            return false;
        }
        *self = Self::fresh(now);
        true
    }

    /// Time left on an active cooldown.
    pub fn cooldown_remaining(&self, now: Timestamp) -> Option<Duration> {
        let now_ms = now.timestamp_millis();
        if self.cooldown_until > now_ms {
            Some(Duration::from_millis((self.cooldown_until - now_ms) as u64))
        } else {
            None
        }
    }

    /// Wait needed before the next call to keep `min_interval` between calls.
    pub fn throttle_wait(&self, now: Timestamp, min_interval: Duration) -> Option<Duration> {
        if self.last_request_timestamp == 0 {
            return None;
        }
        let elapsed = now.timestamp_millis() - self.last_request_timestamp;
        let min_ms = min_interval.as_millis() as i64;
        if elapsed < min_ms {
            Some(Duration::from_millis((min_ms - elapsed.max(0)) as u64))
        } else {
            None
        }
    }

    pub fn record_call(&mut self, now: Timestamp) {
        self.count += 1;
        self.last_request_timestamp = now.timestamp_millis();
    }

    pub fn start_cooldown(&mut self, now: Timestamp, cooldown: Duration) {
        let now_ms = now.timestamp_millis();
        self.last_request_timestamp = now_ms;
        self.cooldown_until = now_ms + cooldown.as_millis() as i64;
    }
}

pub(crate) fn day_key(now: Timestamp) -> String {
    now.format("%Y-%m-%d").to_string()
}
