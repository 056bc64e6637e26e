//! Time source seam.
//!
//! The guardrail reads wall-clock time for date rollover, cooldowns and cache
//! expiry, and suspends for throttling. Both go through [`Clock`] so tests can
//! drive time by hand.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use spellkit_core::Timestamp;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

#[async_trait]
pub trait Clock: Send + Sync {
    /// Current wall-clock time.
    fn now(&self) -> Timestamp;

    /// Suspend for `duration` without blocking the executor.
    async fn sleep(&self, duration: Duration);
}

/// Real time: `Utc::now()` and `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Hand-driven clock. `sleep` advances the clock instead of waiting and
/// records the requested duration.
#[derive(Debug, Clone)]
pub struct ManualClock {
    inner: Arc<Mutex<ManualState>>,
}

#[derive(Debug)]
struct ManualState {
    now: Timestamp,
    slept: Vec<Duration>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ManualState {
                now: start,
                slept: Vec::new(),
            })),
        }
    }

    // A panicking test thread must not make the clock fall back to real time.
    fn state(&self) -> MutexGuard<'_, ManualState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn advance(&self, by: Duration) {
        self.state().now += to_chrono(by);
    }

    pub fn set(&self, to: Timestamp) {
        self.state().now = to;
    }

    /// Durations passed to `sleep`, in call order.
    pub fn slept(&self) -> Vec<Duration> {
        self.state().slept.clone()
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.state().now
    }

    async fn sleep(&self, duration: Duration) {
        let mut state = self.state();
        state.now += to_chrono(duration);
        state.slept.push(duration);
    }
}

pub(crate) fn to_chrono(d: Duration) -> ChronoDuration {
    ChronoDuration::from_std(d).unwrap_or_else(|_| ChronoDuration::days(36_500))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[tokio::test]
    async fn test_manual_clock_sleep_advances() {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        clock.sleep(Duration::from_millis(1500)).await;
        clock.advance(Duration::from_secs(1));

        assert_eq!(clock.now() - start, ChronoDuration::milliseconds(2500));
        assert_eq!(clock.slept(), vec![Duration::from_millis(1500)]);
    }

    #[test]
    fn test_manual_clock_survives_poisoned_lock() {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let clock = ManualClock::new(start);

        let shared = clock.clone();
        let result = std::thread::spawn(move || {
            let _guard = shared.inner.lock().unwrap();
            panic!("poison the clock");
        })
        .join();
        assert!(result.is_err());
        assert!(clock.inner.is_poisoned());

        assert_eq!(clock.now(), start);
        clock.advance(Duration::from_secs(5));
        assert_eq!(clock.now() - start, ChronoDuration::seconds(5));
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
