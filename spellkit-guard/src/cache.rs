//! Fingerprint-keyed response cache with TTL and bounded size.

use serde::{Deserialize, Serialize};
use spellkit_core::Timestamp;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub response: serde_json::Value,
    /// Epoch milliseconds at insertion.
    pub timestamp: i64,
}

impl CacheEntry {
    fn is_expired(&self, now_ms: i64, ttl: Duration) -> bool {
        now_ms - self.timestamp > ttl.as_millis() as i64
    }
}

/// Persisted as a plain `{fingerprint: entry}` map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseCache {
    entries: HashMap<String, CacheEntry>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fresh entry for `key`. An expired entry is removed on the way out.
    pub fn get(&mut self, key: &str, now: Timestamp, ttl: Duration) -> Lookup {
        let now_ms = now.timestamp_millis();
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now_ms, ttl) => Lookup::Hit(entry.response.clone()),
            Some(_) => {
                self.entries.remove(key);
                Lookup::Expired
            }
            None => Lookup::Miss,
        }
    }

    /// Insert or replace. When full, the entry with the oldest timestamp goes.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        response: serde_json::Value,
        now: Timestamp,
        capacity: usize,
    ) {
        let key = key.into();
        if !self.entries.contains_key(&key) {
            while !self.entries.is_empty() && self.entries.len() >= capacity {
                let oldest = self
                    .entries
                    .iter()
                    .min_by_key(|(_, e)| e.timestamp)
                    .map(|(k, _)| k.clone());
                match oldest {
                    Some(k) => {
                        self.entries.remove(&k);
                    }
                    None => break,
                }
            }
        }
        self.entries.insert(
            key,
            CacheEntry {
                response,
                timestamp: now.timestamp_millis(),
            },
        );
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&mut self, now: Timestamp, ttl: Duration) -> usize {
        let now_ms = now.timestamp_millis();
        let before = self.entries.len();
        self.entries.retain(|_, e| !e.is_expired(now_ms, ttl));
        before - self.entries.len()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

/// Outcome of a cache lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Hit(serde_json::Value),
    Expired,
    Miss,
}
