//! The request guardrail: the one gate every generation call passes through.
//!
//! Check order on each call is cooldown, daily cap, cache, throttle, call.
//! State lives behind a single async mutex that is held for the whole call,
//! so at most one provider request is in flight per guardrail and counting,
//! caching and persistence happen strictly in call order.

use crate::cache::{Lookup, ResponseCache};
use crate::clock::{Clock, SystemClock};
use crate::store::{load_json, save_json, KeyValueStore, MemoryStore, CACHE_KEY, USAGE_KEY};
use crate::usage::UsageStats;
use serde::{de::DeserializeOwned, Serialize};
use spellkit_core::{
    Fingerprint, GuardrailConfig, GuardrailError, SpellError, SpellResult, StoreError,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Where the guardrail currently sits in its Available / CoolingDown /
/// Blocked state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    CoolingDown { remaining: Duration },
    /// Daily cap reached. Lifts at date rollover.
    Blocked,
}

/// Snapshot for front ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardStatus {
    pub availability: Availability,
    pub count_today: u32,
    pub limit: u32,
}

struct Inner {
    usage: UsageStats,
    cache: ResponseCache,
}

pub struct Guardrail {
    config: GuardrailConfig,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    inner: Mutex<Inner>,
}

impl Guardrail {
    /// Load persisted state from `store`. Corrupt entries are discarded and
    /// replaced with fresh state; I/O failures are returned.
    pub fn new(
        config: GuardrailConfig,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> SpellResult<Self> {
        config.validate()?;
        let now = clock.now();

        let mut usage = load_or_default(store.as_ref(), USAGE_KEY, || UsageStats::fresh(now))?;
        usage.roll_over(now);
        let mut cache = load_or_default(store.as_ref(), CACHE_KEY, ResponseCache::new)?;
        let purged = cache.purge_expired(now, config.cache_ttl);
        if purged > 0 {
            tracing::debug!(purged, "Dropped expired cache entries on load");
        }

        Ok(Self {
            config,
            store,
            clock,
            inner: Mutex::new(Inner { usage, cache }),
        })
    }

    /// Process-local guardrail on the system clock. Nothing survives exit.
    pub fn in_memory(config: GuardrailConfig) -> SpellResult<Self> {
        Self::new(config, Arc::new(MemoryStore::new()), Arc::new(SystemClock))
    }

    pub fn config(&self) -> &GuardrailConfig {
        &self.config
    }

    /// Run `call` under the guardrail.
    ///
    /// Returns a cached value for `fingerprint` without invoking `call` when
    /// one is fresh. A provider quota error opens the cooldown breaker and
    /// comes back as [`GuardrailError::QuotaLimit`]; every other error is
    /// returned unchanged.
    pub async fn execute<T, F, Fut>(&self, fingerprint: &Fingerprint, call: F) -> SpellResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = SpellResult<T>>,
    {
        let mut inner = self.inner.lock().await;
        let now = self.clock.now();

        if inner.usage.roll_over(now) {
            tracing::info!(date = %inner.usage.date, "New day, usage counters reset");
            self.flush_usage(&inner.usage);
        }

        if let Some(remaining) = inner.usage.cooldown_remaining(now) {
            let remaining_secs = ceil_secs(remaining);
            tracing::warn!(remaining_secs, "Cooldown active, request refused");
            return Err(GuardrailError::CooldownActive { remaining_secs }.into());
        }

        if inner.usage.count >= self.config.max_daily_requests {
            tracing::warn!(
                count = inner.usage.count,
                limit = self.config.max_daily_requests,
                "Daily request limit reached"
            );
            return Err(GuardrailError::DailyQuotaExceeded {
                limit: self.config.max_daily_requests,
            }
            .into());
        }

        match inner.cache.get(fingerprint.as_str(), now, self.config.cache_ttl) {
            Lookup::Hit(value) => match serde_json::from_value::<T>(value) {
                Ok(hit) => {
                    tracing::info!(fingerprint = %fingerprint, "Cache hit");
                    return Ok(hit);
                }
                Err(e) => {
                    tracing::warn!(
                        fingerprint = %fingerprint,
                        error = %e,
                        "Cached response has the wrong shape, dropping it"
                    );
                    inner.cache.remove(fingerprint.as_str());
                    self.flush_cache(&inner.cache);
                }
            },
            Lookup::Expired => self.flush_cache(&inner.cache),
            Lookup::Miss => {}
        }

        if let Some(wait) = inner.usage.throttle_wait(now, self.config.min_interval) {
            tracing::debug!(wait_ms = wait.as_millis() as u64, "Throttling");
            self.clock.sleep(wait).await;
        }

        tracing::info!(
            fingerprint = %fingerprint,
            call_number = inner.usage.count + 1,
            limit = self.config.max_daily_requests,
            "Calling generation service"
        );

        match call().await {
            Ok(value) => {
                let done = self.clock.now();
                inner.usage.record_call(done);
                match serde_json::to_value(&value) {
                    Ok(json) => inner.cache.insert(
                        fingerprint.as_str(),
                        json,
                        done,
                        self.config.cache_capacity,
                    ),
                    Err(e) => {
                        tracing::warn!(error = %e, "Response not cacheable");
                    }
                }
                self.flush_usage(&inner.usage);
                self.flush_cache(&inner.cache);
                Ok(value)
            }
            Err(SpellError::Llm(e)) if e.is_quota_exhaustion() => {
                let done = self.clock.now();
                inner.usage.start_cooldown(done, self.config.cooldown);
                self.flush_usage(&inner.usage);
                let cooldown_secs = self.config.cooldown.as_secs();
                tracing::error!(
                    error = %e,
                    cooldown_secs,
                    "Provider quota exhausted, cooldown started"
                );
                Err(GuardrailError::QuotaLimit { cooldown_secs }.into())
            }
            Err(e) => Err(e),
        }
    }

    pub async fn status(&self) -> GuardStatus {
        let mut inner = self.inner.lock().await;
        let now = self.clock.now();
        if inner.usage.roll_over(now) {
            self.flush_usage(&inner.usage);
        }

        let availability = if let Some(remaining) = inner.usage.cooldown_remaining(now) {
            Availability::CoolingDown { remaining }
        } else if inner.usage.count >= self.config.max_daily_requests {
            Availability::Blocked
        } else {
            Availability::Available
        };

        GuardStatus {
            availability,
            count_today: inner.usage.count,
            limit: self.config.max_daily_requests,
        }
    }

    /// Forget usage counters and cached responses, in memory and in storage.
    pub async fn reset(&self) -> SpellResult<()> {
        let mut inner = self.inner.lock().await;
        self.store.remove(USAGE_KEY)?;
        self.store.remove(CACHE_KEY)?;
        inner.usage = UsageStats::fresh(self.clock.now());
        inner.cache = ResponseCache::new();
        tracing::info!("Guardrail state reset");
        Ok(())
    }

    // Persistence failures never fail a call that already succeeded.
    fn flush_usage(&self, usage: &UsageStats) {
        if let Err(e) = save_json(self.store.as_ref(), USAGE_KEY, usage) {
            tracing::warn!(error = %e, "Failed to persist usage stats");
        }
    }

    fn flush_cache(&self, cache: &ResponseCache) {
        if let Err(e) = save_json(self.store.as_ref(), CACHE_KEY, cache) {
            tracing::warn!(error = %e, "Failed to persist response cache");
        }
    }
}

impl std::fmt::Debug for Guardrail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Guardrail")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn load_or_default<T, D>(store: &dyn KeyValueStore, key: &str, default: D) -> SpellResult<T>
where
    T: DeserializeOwned,
    D: FnOnce() -> T,
{
    match load_json(store, key) {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Ok(default()),
        Err(StoreError::Serde { reason, .. }) => {
            tracing::warn!(key, reason = %reason, "Discarding unreadable guardrail state");
            Ok(default())
        }
        Err(e) => Err(e.into()),
    }
}

fn ceil_secs(d: Duration) -> u64 {
    let ms = d.as_millis() as u64;
    ms.div_ceil(1000)
}
