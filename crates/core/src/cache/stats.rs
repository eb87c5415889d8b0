//! Cache usage statistics.

use serde::Serialize;

/// Point-in-time snapshot of cache usage.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub max_size: usize,
    pub hit_count: u64,
    pub miss_count: u64,
    /// `hits / (hits + misses)`, or `0.0` before any access.
    pub hit_rate: f64,
}

impl CacheStats {
    pub(crate) fn new(size: usize, max_size: usize, hit_count: u64, miss_count: u64) -> Self {
        let total = hit_count + miss_count;
        let hit_rate = if total == 0 { 0.0 } else { hit_count as f64 / total as f64 };
        Self { size, max_size, hit_count, miss_count, hit_rate }
    }
}
