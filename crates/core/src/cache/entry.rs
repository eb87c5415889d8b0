//! Cache entry bookkeeping.

use serde_json::Value;
use std::time::{Duration, Instant};

/// A single cached value with its expiry and usage bookkeeping.
///
/// `seq` records insertion order; eviction uses it to break hit-count ties
/// deterministically.
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry {
    pub value: Value,
    pub stored_at: Instant,
    pub ttl: Duration,
    pub hits: u64,
    pub seq: u64,
}

impl CacheEntry {
    pub fn new(value: Value, ttl: Duration, seq: u64) -> Self {
        Self { value, stored_at: Instant::now(), ttl, hits: 0, seq }
    }

    /// An entry is expired once its age exceeds its TTL.
    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.stored_at) > self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_entry_is_not_expired() {
        let entry = CacheEntry::new(Value::Null, Duration::from_secs(60), 0);
        assert!(!entry.is_expired(Instant::now()));
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let entry = CacheEntry::new(Value::Null, Duration::from_millis(5), 0);
        std::thread::sleep(Duration::from_millis(10));
        assert!(entry.is_expired(Instant::now()));
    }
}
