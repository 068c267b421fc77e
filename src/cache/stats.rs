//! Cache Statistics Module
//!
//! Tracks cache counters reported by `GET /api/cache/stats`.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of cache counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Fresh lookups
    pub hits: u64,
    /// Lookups for absent or expired keys
    pub misses: u64,
    /// Successful writes
    pub sets: u64,
    /// Deletes that removed a key
    pub deletes: u64,
    /// Keys dropped to stay within capacity
    pub evictions: u64,
    /// Keys currently held in the fresh slot
    pub key_count: usize,
    /// Default TTL in seconds
    pub ttl: u64,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

impl CacheStats {
    pub fn new(ttl: u64) -> Self {
        Self {
            ttl,
            ..Self::default()
        }
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate, 0.0 before any lookup.
    pub fn compute_hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_set(&mut self) {
        self.sets += 1;
    }

    pub fn record_delete(&mut self) {
        self.deletes += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Returns a copy with the derived fields filled in.
    pub fn snapshot(&self, key_count: usize) -> Self {
        Self {
            key_count,
            hit_rate: self.compute_hit_rate(),
            ..self.clone()
        }
    }
}
