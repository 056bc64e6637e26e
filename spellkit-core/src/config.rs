//! Configuration types

use crate::{ConfigError, SpellError, SpellResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_MIN_INTERVAL_MS: u64 = 3_000;
const DEFAULT_MAX_DAILY_REQUESTS: u32 = 100;
const DEFAULT_COOLDOWN_SECS: u64 = 60;
const DEFAULT_CACHE_TTL_SECS: u64 = 24 * 60 * 60;
const DEFAULT_CACHE_CAPACITY: usize = 50;

const DEFAULT_TARGET_SIZE: usize = 15;
const DEFAULT_MIN_VIABLE_WORDS: usize = 5;
const DEFAULT_CANDIDATE_FLOOR: usize = 30;
const DEFAULT_CANDIDATE_POOL: usize = 60;

// ============================================================================
// GUARDRAIL CONFIG
// ============================================================================

/// Limits enforced by the request guardrail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardrailConfig {
    /// Minimum gap between two outgoing calls
    #[serde(with = "duration_ms")]
    pub min_interval: Duration,
    /// Calls allowed per calendar day
    pub max_daily_requests: u32,
    /// How long the breaker stays open after a provider quota error
    #[serde(with = "duration_ms")]
    pub cooldown: Duration,
    #[serde(with = "duration_ms")]
    pub cache_ttl: Duration,
    pub cache_capacity: usize,
}

impl Default for GuardrailConfig {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_millis(DEFAULT_MIN_INTERVAL_MS),
            max_daily_requests: DEFAULT_MAX_DAILY_REQUESTS,
            cooldown: Duration::from_secs(DEFAULT_COOLDOWN_SECS),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl GuardrailConfig {
    /// Create GuardrailConfig from environment variables.
    ///
    /// # Environment Variables
    /// - `SPELLKIT_MIN_INTERVAL_MS`: Minimum gap between calls (default: 3000)
    /// - `SPELLKIT_MAX_DAILY_REQUESTS`: Daily call cap (default: 100)
    /// - `SPELLKIT_COOLDOWN_SECS`: Cooldown after a quota error (default: 60)
    /// - `SPELLKIT_CACHE_TTL_SECS`: Cache entry lifetime (default: 86400)
    /// - `SPELLKIT_CACHE_CAPACITY`: Maximum cached responses (default: 50)
    pub fn from_env() -> Self {
        let min_interval = Duration::from_millis(
            std::env::var("SPELLKIT_MIN_INTERVAL_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MIN_INTERVAL_MS),
        );

        let max_daily_requests = std::env::var("SPELLKIT_MAX_DAILY_REQUESTS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_MAX_DAILY_REQUESTS);

        let cooldown = Duration::from_secs(
            std::env::var("SPELLKIT_COOLDOWN_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_COOLDOWN_SECS),
        );

        let cache_ttl = Duration::from_secs(
            std::env::var("SPELLKIT_CACHE_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_CACHE_TTL_SECS),
        );

        let cache_capacity = std::env::var("SPELLKIT_CACHE_CAPACITY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_CACHE_CAPACITY);

        Self {
            min_interval,
            max_daily_requests,
            cooldown,
            cache_ttl,
            cache_capacity,
        }
    }

    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }

    pub fn with_max_daily_requests(mut self, max: u32) -> Self {
        self.max_daily_requests = max;
        self
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Validate that all limits are usable.
    pub fn validate(&self) -> SpellResult<()> {
        if self.max_daily_requests == 0 {
            return Err(SpellError::Config(ConfigError::InvalidValue {
                field: "max_daily_requests".to_string(),
                value: self.max_daily_requests.to_string(),
                reason: "max_daily_requests must be positive".to_string(),
            }));
        }

        if self.cooldown.is_zero() {
            return Err(SpellError::Config(ConfigError::InvalidValue {
                field: "cooldown".to_string(),
                value: format!("{:?}", self.cooldown),
                reason: "cooldown must be positive".to_string(),
            }));
        }

        if self.cache_capacity == 0 {
            return Err(SpellError::Config(ConfigError::InvalidValue {
                field: "cache_capacity".to_string(),
                value: self.cache_capacity.to_string(),
                reason: "cache_capacity must be positive".to_string(),
            }));
        }

        Ok(())
    }
}

// ============================================================================
// ENGINE CONFIG
// ============================================================================

/// Sizing of word set generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Words per worksheet
    pub target_size: usize,
    /// Below this the result is not worth a worksheet
    pub min_viable_words: usize,
    /// Minimum candidates requested per category
    pub candidate_floor: usize,
    /// Candidate pool shared across categories
    pub candidate_pool: usize,
    /// Fixed seed for reproducible shuffles
    #[serde(default)]
    pub shuffle_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            target_size: DEFAULT_TARGET_SIZE,
            min_viable_words: DEFAULT_MIN_VIABLE_WORDS,
            candidate_floor: DEFAULT_CANDIDATE_FLOOR,
            candidate_pool: DEFAULT_CANDIDATE_POOL,
            shuffle_seed: None,
        }
    }
}

impl EngineConfig {
    pub fn with_target_size(mut self, target_size: usize) -> Self {
        self.target_size = target_size;
        self
    }

    pub fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.shuffle_seed = Some(seed);
        self
    }

    /// Candidates requested per category: `max(floor, ceil(pool / n))`.
    pub fn candidates_per_category(&self, category_count: usize) -> usize {
        if category_count == 0 {
            return self.candidate_floor;
        }
        self.candidate_floor
            .max(self.candidate_pool.div_ceil(category_count))
    }

    pub fn validate(&self) -> SpellResult<()> {
        if self.min_viable_words == 0 {
            return Err(SpellError::Config(ConfigError::InvalidValue {
                field: "min_viable_words".to_string(),
                value: self.min_viable_words.to_string(),
                reason: "min_viable_words must be positive".to_string(),
            }));
        }

        if self.target_size < self.min_viable_words {
            return Err(SpellError::Config(ConfigError::InvalidValue {
                field: "target_size".to_string(),
                value: self.target_size.to_string(),
                reason: format!("target_size must be at least {}", self.min_viable_words),
            }));
        }

        if self.candidate_floor == 0 {
            return Err(SpellError::Config(ConfigError::InvalidValue {
                field: "candidate_floor".to_string(),
                value: self.candidate_floor.to_string(),
                reason: "candidate_floor must be positive".to_string(),
            }));
        }

        Ok(())
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guardrail_defaults() {
        let config = GuardrailConfig::default();
        assert_eq!(config.min_interval, Duration::from_secs(3));
        assert_eq!(config.max_daily_requests, 100);
        assert_eq!(config.cooldown, Duration::from_secs(60));
        assert_eq!(config.cache_ttl, Duration::from_secs(86_400));
        assert_eq!(config.cache_capacity, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_guardrail_validate_rejects_zero_cap() {
        let config = GuardrailConfig::default().with_max_daily_requests(0);
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            SpellError::Config(ConfigError::InvalidValue { ref field, .. }) if field == "max_daily_requests"
        ));
    }

    #[test]
    fn test_candidates_per_category() {
        let config = EngineConfig::default();
        assert_eq!(config.candidates_per_category(1), 60);
        assert_eq!(config.candidates_per_category(2), 30);
        assert_eq!(config.candidates_per_category(3), 30);
        assert_eq!(config.candidates_per_category(7), 30);
    }

    #[test]
    fn test_engine_validate_target_below_minimum() {
        let config = EngineConfig::default().with_target_size(3);
        assert!(config.validate().is_err());
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_guardrail_config_serde_millis() {
        let json = serde_json::to_value(GuardrailConfig::default()).unwrap();
        assert_eq!(json["min_interval"], 3000);
        let parsed: GuardrailConfig = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, GuardrailConfig::default());
    }
}
