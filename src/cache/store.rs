//! Cache Store Module
//!
//! In-memory TTL cache with a last-known-good slot per key and LRU eviction.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, LruTracker, SharedClock, MAX_KEY_LENGTH};
use crate::error::{ProxyError, Result};

// == Cache Store ==
/// Cache storage with freshness tracking and stale fallback.
///
/// `entries` holds the fresh slot and is subject to lazy expiry and the
/// periodic sweep. `last_known_good` mirrors every write but is never
/// swept; it only shrinks on delete, clear, or capacity eviction.
#[derive(Debug)]
pub struct CacheStore {
    entries: HashMap<String, CacheEntry>,
    last_known_good: HashMap<String, CacheEntry>,
    lru: LruTracker,
    stats: CacheStats,
    clock: SharedClock,
    max_entries: usize,
    default_ttl: u64,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a store with the given capacity, default TTL (seconds) and clock.
    pub fn new(max_entries: usize, default_ttl: u64, clock: SharedClock) -> Self {
        Self {
            entries: HashMap::new(),
            last_known_good: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(default_ttl),
            clock,
            max_entries: max_entries.max(1),
            default_ttl,
        }
    }

    // == Set ==
    /// Stores a payload under `key`, overwriting any previous entry and
    /// resetting its expiry. Uses the default TTL when `ttl` is `None`.
    pub fn set(&mut self, key: &str, value: Arc<Value>, ttl: Option<u64>) -> Result<()> {
        validate_key(key)?;

        let is_overwrite = self.last_known_good.contains_key(key);
        if !is_overwrite && self.last_known_good.len() >= self.max_entries {
            self.evict_oldest()?;
        }

        let ttl = ttl.unwrap_or(self.default_ttl);
        let entry = CacheEntry::new(value, self.clock.now_ms(), ttl);
        self.entries.insert(key.to_string(), entry.clone());
        self.last_known_good.insert(key.to_string(), entry);
        self.lru.touch(key);
        self.stats.record_set();

        debug!(key, ttl, "cache set");
        Ok(())
    }

    // == Get ==
    /// Returns the entry for `key` if it is fresh.
    ///
    /// Expired entries are dropped from the fresh slot and counted as misses.
    pub fn get(&mut self, key: &str) -> Option<CacheEntry> {
        let now = self.clock.now_ms();

        match self.entries.get(key) {
            Some(entry) if entry.is_fresh(now) => {
                let entry = entry.clone();
                self.stats.record_hit();
                self.lru.touch(key);
                debug!(key, "cache hit");
                Some(entry)
            }
            Some(_) => {
                self.entries.remove(key);
                self.stats.record_miss();
                debug!(key, "cache miss (expired)");
                None
            }
            None => {
                self.stats.record_miss();
                debug!(key, "cache miss");
                None
            }
        }
    }

    // == Get Stale ==
    /// Returns the last value written for `key`, regardless of freshness.
    ///
    /// Does not touch hit/miss counters.
    pub fn get_stale(&self, key: &str) -> Option<CacheEntry> {
        let entry = self.last_known_good.get(key).cloned();
        debug!(key, found = entry.is_some(), "cache stale lookup");
        entry
    }

    /// Whether `key` has a fresh entry. Does not touch counters.
    pub fn contains_fresh(&self, key: &str) -> bool {
        let now = self.clock.now_ms();
        self.entries.get(key).is_some_and(|e| e.is_fresh(now))
    }

    // == Delete ==
    /// Removes `key` from both slots, returning the number of keys removed.
    pub fn delete(&mut self, key: &str) -> usize {
        let fresh = self.entries.remove(key).is_some();
        let known = self.last_known_good.remove(key).is_some();
        self.lru.remove(key);

        if fresh || known {
            self.stats.record_delete();
            debug!(key, "cache delete");
            1
        } else {
            0
        }
    }

    // == Clear ==
    /// Drops every entry from both slots. Counters are kept.
    pub fn clear(&mut self) {
        let count = self.last_known_good.len();
        self.entries.clear();
        self.last_known_good.clear();
        self.lru.clear();
        debug!(count, "cache cleared");
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.entries.len())
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the fresh slot.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_fresh(now));
        before - self.entries.len()
    }

    /// Number of keys in the fresh slot.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict_oldest(&mut self) -> Result<()> {
        let evicted = self.lru.evict_oldest().ok_or_else(|| {
            ProxyError::Internal("cache is full and eviction failed".to_string())
        })?;
        self.entries.remove(&evicted);
        self.last_known_good.remove(&evicted);
        self.stats.record_eviction();
        debug!(key = %evicted, "cache evict");
        Ok(())
    }
}

/// Rejects empty keys and keys longer than `MAX_KEY_LENGTH` bytes.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(ProxyError::InvalidRequest(
            "Key cannot be empty".to_string(),
        ));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(ProxyError::InvalidRequest(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}
