//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the cache contract over generated operation sequences.

use std::sync::Arc;

use proptest::prelude::*;
use serde_json::{json, Value};

use crate::cache::{CacheStore, ManualClock};

// == Test Configuration ==
const TEST_MAX_ENTRIES: usize = 100;
const TEST_DEFAULT_TTL: u64 = 300;

fn new_store(max_entries: usize) -> (CacheStore, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    (
        CacheStore::new(max_entries, TEST_DEFAULT_TTL, clock.clone()),
        clock,
    )
}

// == Strategies ==
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9_]{1,48}"
}

fn payload_strategy() -> impl Strategy<Value = Value> {
    (
        prop::collection::vec("[a-zA-Z0-9 ]{0,24}", 0..6),
        any::<i64>(),
    )
        .prop_map(|(names, ts)| json!({ "data": names, "timestamp": ts }))
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: Value },
    Get { key: String },
    Delete { key: String },
    Advance { secs: u64 },
    Sweep,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (valid_key_strategy(), payload_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        valid_key_strategy().prop_map(|key| CacheOp::Get { key }),
        valid_key_strategy().prop_map(|key| CacheOp::Delete { key }),
        (0u64..400).prop_map(|secs| CacheOp::Advance { secs }),
        Just(CacheOp::Sweep),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Counters match the outcomes observed by the caller.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let (mut store, clock) = new_store(TEST_MAX_ENTRIES);
        let mut hits = 0u64;
        let mut misses = 0u64;
        let mut sets = 0u64;
        let mut deletes = 0u64;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    if store.set(&key, Arc::new(value), None).is_ok() {
                        sets += 1;
                    }
                }
                CacheOp::Get { key } => match store.get(&key) {
                    Some(_) => hits += 1,
                    None => misses += 1,
                },
                CacheOp::Delete { key } => deletes += store.delete(&key) as u64,
                CacheOp::Advance { secs } => clock.advance_secs(secs),
                CacheOp::Sweep => {
                    store.cleanup_expired();
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, hits);
        prop_assert_eq!(stats.misses, misses);
        prop_assert_eq!(stats.sets, sets);
        prop_assert_eq!(stats.deletes, deletes);
        prop_assert_eq!(stats.key_count, store.len());
    }

    // A read within TTL returns exactly what was stored.
    #[test]
    fn prop_read_within_ttl_returns_stored_value(
        key in valid_key_strategy(),
        value in payload_strategy(),
        elapsed in 0u64..TEST_DEFAULT_TTL,
    ) {
        let (mut store, clock) = new_store(TEST_MAX_ENTRIES);
        store.set(&key, Arc::new(value.clone()), None).unwrap();
        clock.advance_secs(elapsed);

        let entry = store.get(&key);
        prop_assert!(entry.is_some());
        prop_assert_eq!(&*entry.unwrap().value, &value);
        prop_assert_eq!(store.stats().hits, 1);
    }

    // Once the TTL has elapsed the key reads as absent, but its
    // last-known-good value survives both lazy expiry and the sweep.
    #[test]
    fn prop_expiry_keeps_last_known_good(
        key in valid_key_strategy(),
        value in payload_strategy(),
        ttl in 1u64..120,
        extra in 0u64..1000,
        sweep_first in any::<bool>(),
    ) {
        let (mut store, clock) = new_store(TEST_MAX_ENTRIES);
        store.set(&key, Arc::new(value.clone()), Some(ttl)).unwrap();
        clock.advance_secs(ttl + extra);

        if sweep_first {
            prop_assert_eq!(store.cleanup_expired(), 1);
        }

        prop_assert!(store.get(&key).is_none());
        let stale = store.get_stale(&key);
        prop_assert!(stale.is_some());
        prop_assert_eq!(&*stale.unwrap().value, &value);
    }

    // Capacity bounds both slots.
    #[test]
    fn prop_capacity_enforcement(
        entries in prop::collection::vec((valid_key_strategy(), payload_strategy()), 1..120)
    ) {
        let max_entries = 16;
        let (mut store, _) = new_store(max_entries);

        for (key, value) in entries {
            store.set(&key, Arc::new(value), None).unwrap();
            prop_assert!(store.len() <= max_entries);
        }
    }

    // Clearing twice leaves no keys and changes nothing the second time.
    #[test]
    fn prop_clear_is_idempotent(
        entries in prop::collection::vec((valid_key_strategy(), payload_strategy()), 0..30)
    ) {
        let (mut store, _) = new_store(TEST_MAX_ENTRIES);
        for (key, value) in &entries {
            store.set(key, Arc::new(value.clone()), None).unwrap();
        }

        store.clear();
        let first = store.stats();
        store.clear();
        let second = store.stats();

        prop_assert_eq!(first.key_count, 0);
        prop_assert_eq!(first, second);
        for (key, _) in &entries {
            prop_assert!(store.get_stale(key).is_none());
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // Every error variant renders a JSON body with a string "error" field.
    #[test]
    fn prop_error_response_format(msg in "[a-zA-Z0-9 _-]{1,80}", status in 400u16..600) {
        use crate::error::ProxyError;
        use axum::body::to_bytes;
        use axum::response::IntoResponse;

        let variants = vec![
            ProxyError::Timeout,
            ProxyError::Http { status, status_text: msg.clone() },
            ProxyError::Network(msg.clone()),
            ProxyError::CacheIo(msg.clone()),
            ProxyError::NotFound(msg.clone()),
            ProxyError::InvalidRequest(msg.clone()),
            ProxyError::RateLimited { retry_after_secs: 60 },
            ProxyError::ServiceUnavailable(msg.clone()),
            ProxyError::Internal(msg.clone()),
        ];

        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        for error in variants {
            let response = error.into_response();
            let content_type = response
                .headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            prop_assert!(content_type.contains("application/json"));

            let bytes = rt.block_on(to_bytes(response.into_body(), usize::MAX)).unwrap();
            let json: Value = serde_json::from_slice(&bytes).unwrap();
            prop_assert!(json["error"].is_string());
        }
    }
}
