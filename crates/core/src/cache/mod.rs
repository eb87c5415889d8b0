//! Process-wide, TTL-bounded, in-memory key/value cache.
//!
//! Maps opaque string keys to JSON values so list controllers can skip
//! redundant network fetches for the first, unfiltered page of a listing.
//!
//! ### Semantics
//! - Expiry is lazy: an expired entry is dropped on the `get`/`has` that
//!   observes it.
//! - The `size <= max_size` bound is restored lazily too: a `set` at capacity
//!   first drops expired entries, then evicts the least-hit 20% of the
//!   surviving snapshot (ties broken by insertion order).
//! - Entries are immutable value snapshots; concurrent writers get
//!   last-writer-wins, which is fine because keys encode exact query
//!   parameters.
//!
//! The cache is explicitly constructed and injected (never a module-level
//! global), so tests get isolated instances.

mod entry;
mod stats;

pub use stats::CacheStats;

use crate::error::Error;
use entry::CacheEntry;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Fraction of `max_size` evicted when cleanup still finds the cache full.
const EVICT_FRACTION: f64 = 0.2;

/// Cache sizing and default expiry.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub max_size: usize,
    pub default_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { max_size: 100, default_ttl: Duration::from_secs(5 * 60) }
    }
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    next_seq: u64,
    hit_count: u64,
    miss_count: u64,
}

/// Shared in-memory TTL cache. Cheap to clone; clones share storage.
#[derive(Debug, Clone)]
pub struct KeyValueCache {
    config: CacheConfig,
    inner: Arc<Mutex<CacheInner>>,
}

impl Default for KeyValueCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl KeyValueCache {
    pub fn new(config: CacheConfig) -> Self {
        Self { config, inner: Arc::new(Mutex::new(CacheInner::default())) }
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a value under `key` with the default TTL.
    pub fn set(&self, key: &str, value: Value) {
        self.set_with_ttl(key, value, self.config.default_ttl);
    }

    /// Store a value under `key` with an explicit TTL.
    ///
    /// If the cache is at capacity, expired and least-used entries are
    /// dropped first.
    pub fn set_with_ttl(&self, key: &str, value: Value, ttl: Duration) {
        let mut inner = self.lock();
        if inner.entries.len() >= self.config.max_size {
            Self::cleanup(&mut inner, self.config.max_size);
        }
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.entries.insert(key.to_string(), CacheEntry::new(value, ttl, seq));
    }

    /// Serialize `value` and store it under `key` with the default TTL.
    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), Error> {
        let value = serde_json::to_value(value).map_err(|e| Error::Parse(e.to_string()))?;
        self.set(key, value);
        Ok(())
    }

    /// Fetch a live value. Expired entries are removed and counted as misses;
    /// a hit bumps both the entry's and the global hit counter.
    pub fn get(&self, key: &str) -> Option<Value> {
        let mut inner = self.lock();
        let now = Instant::now();

        let expired = match inner.entries.get(key) {
            None => {
                inner.miss_count += 1;
                return None;
            }
            Some(entry) => entry.is_expired(now),
        };

        if expired {
            inner.entries.remove(key);
            inner.miss_count += 1;
            return None;
        }

        inner.hit_count += 1;
        let entry = inner.entries.get_mut(key)?;
        entry.hits += 1;
        Some(entry.value.clone())
    }

    /// Fetch and deserialize a live value. A value that no longer matches the
    /// expected shape is treated as a miss.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get(key)?;
        match serde_json::from_value(value) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(key, error = %e, "cached value no longer deserializes; dropping");
                self.delete(key);
                None
            }
        }
    }

    /// Expiry-aware existence check. Does not touch hit/miss counters.
    pub fn has(&self, key: &str) -> bool {
        let mut inner = self.lock();
        let now = Instant::now();
        match inner.entries.get(key) {
            None => false,
            Some(entry) if entry.is_expired(now) => {
                inner.entries.remove(key);
                false
            }
            Some(_) => true,
        }
    }

    /// Remove one key. Returns whether it was present.
    pub fn delete(&self, key: &str) -> bool {
        self.lock().entries.remove(key).is_some()
    }

    /// Drop every entry and reset the hit/miss counters.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.hit_count = 0;
        inner.miss_count = 0;
    }

    /// Delete every key matching `pattern` (a regex). Returns the number of
    /// entries removed.
    pub fn invalidate_pattern(&self, pattern: &str) -> Result<usize, Error> {
        let re = regex::Regex::new(pattern)
            .map_err(|e| Error::InvalidInput(format!("invalid cache pattern: {e}")))?;
        let mut inner = self.lock();
        let keys: Vec<String> = inner.entries.keys().filter(|k| re.is_match(k)).cloned().collect();
        for key in &keys {
            inner.entries.remove(key);
        }
        if !keys.is_empty() {
            tracing::debug!(pattern, deleted = keys.len(), "invalidated cache entries");
        }
        Ok(keys.len())
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        CacheStats::new(inner.entries.len(), self.config.max_size, inner.hit_count, inner.miss_count)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop expired entries; if the cache is still at/above capacity, evict
    /// the least-hit `EVICT_FRACTION` of the surviving pre-cleanup snapshot.
    fn cleanup(inner: &mut CacheInner, max_size: usize) {
        let now = Instant::now();
        let before = inner.entries.len();
        inner.entries.retain(|_, entry| !entry.is_expired(now));

        if inner.entries.len() >= max_size {
            let mut survivors: Vec<(String, u64, u64)> = inner
                .entries
                .iter()
                .map(|(k, e)| (k.clone(), e.hits, e.seq))
                .collect();
            survivors.sort_by(|a, b| a.1.cmp(&b.1).then(a.2.cmp(&b.2)));

            let to_evict = (max_size as f64 * EVICT_FRACTION).floor() as usize;
            for (key, _, _) in survivors.into_iter().take(to_evict) {
                inner.entries.remove(&key);
            }
        }

        tracing::debug!(before, after = inner.entries.len(), "cache cleanup");
    }
}
