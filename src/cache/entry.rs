//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;

// == Cache Entry ==
/// A cached upstream payload and the time it was stored.
///
/// Payloads are shared behind an `Arc` so the fresh slot, the
/// last-known-good slot and in-flight responses can hold the same value.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// The stored payload
    pub value: Arc<Value>,
    /// Store timestamp (Unix milliseconds)
    pub stored_at: u64,
    /// Time-to-live in milliseconds
    pub ttl_ms: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry stored at `now_ms` with a TTL in seconds.
    pub fn new(value: Arc<Value>, now_ms: u64, ttl_seconds: u64) -> Self {
        Self {
            value,
            stored_at: now_ms,
            ttl_ms: ttl_seconds.saturating_mul(1000),
        }
    }

    // == Freshness ==
    /// An entry is fresh iff `now - stored_at < ttl`.
    pub fn is_fresh(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.stored_at) < self.ttl_ms
    }

    pub fn is_expired(&self, now_ms: u64) -> bool {
        !self.is_fresh(now_ms)
    }

    /// Store time as a UTC datetime.
    pub fn stored_at_utc(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.stored_at as i64).unwrap_or_default()
    }
}
