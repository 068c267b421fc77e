//! Stale-while-revalidate handler
//!
//! Serves a fresh cache hit, else fetches upstream and stores the result,
//! else falls back to the last known value, else fails with 503.

use std::future::Future;
use std::sync::Arc;

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::cache::SharedCache;
use crate::error::{ProxyError, Result};

pub const STALE_WARNING: &str = "MetaForge API temporarily unavailable, serving cached data";

/// Metadata keys written by the proxy; payload fields with these names are shadowed.
const METADATA_KEYS: [&str; 5] = ["cached", "cachedAt", "fetchedAt", "stale", "warning"];

/// How a response was produced.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheStatus {
    /// Fresh cache hit
    Fresh { cached_at: DateTime<Utc> },
    /// Cold miss, fetched from upstream just now
    Fetched { fetched_at: DateTime<Utc> },
    /// Upstream failed; last known value served
    Stale { warning: String },
}

/// A payload annotated with its cache status.
#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub payload: Arc<Value>,
    pub status: CacheStatus,
}

impl CachedResponse {
    pub fn is_cached(&self) -> bool {
        !matches!(self.status, CacheStatus::Fetched { .. })
    }

    pub fn is_stale(&self) -> bool {
        matches!(self.status, CacheStatus::Stale { .. })
    }
}

fn rfc3339(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Object payloads are merged with the metadata fields at the top level;
/// any other payload is nested under `data`.
impl Serialize for CachedResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;

        match self.payload.as_ref() {
            Value::Object(fields) => {
                for (k, v) in fields {
                    if !METADATA_KEYS.contains(&k.as_str()) {
                        map.serialize_entry(k, v)?;
                    }
                }
            }
            other => map.serialize_entry("data", other)?,
        }

        match &self.status {
            CacheStatus::Fresh { cached_at } => {
                map.serialize_entry("cached", &true)?;
                map.serialize_entry("cachedAt", &rfc3339(cached_at))?;
            }
            CacheStatus::Fetched { fetched_at } => {
                map.serialize_entry("cached", &false)?;
                map.serialize_entry("fetchedAt", &rfc3339(fetched_at))?;
            }
            CacheStatus::Stale { warning } => {
                map.serialize_entry("cached", &true)?;
                map.serialize_entry("stale", &true)?;
                map.serialize_entry("warning", warning)?;
            }
        }

        map.end()
    }
}

impl IntoResponse for CachedResponse {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Resolves `key` through the cache, calling `fetch` on a miss.
///
/// No lock is held while `fetch` runs, so concurrent misses for the same
/// key each go upstream. A failed cache write is logged and the fetched
/// payload is still returned.
pub async fn serve_cached<F, Fut>(cache: &SharedCache, key: &str, fetch: F) -> Result<CachedResponse>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Value>>,
{
    if let Some(entry) = cache.write().await.get(key) {
        return Ok(CachedResponse {
            status: CacheStatus::Fresh {
                cached_at: entry.stored_at_utc(),
            },
            payload: entry.value,
        });
    }

    match fetch().await {
        Ok(value) => {
            let payload = Arc::new(value);
            if let Err(err) = cache.write().await.set(key, payload.clone(), None) {
                warn!(key, error = %err, "failed to cache upstream response");
            }
            Ok(CachedResponse {
                payload,
                status: CacheStatus::Fetched {
                    fetched_at: Utc::now(),
                },
            })
        }
        Err(err) => {
            error!(key, error = %err, "upstream fetch failed");

            let stale = cache.read().await.get_stale(key);
            match stale {
                Some(entry) => {
                    info!(key, "serving stale cache");
                    Ok(CachedResponse {
                        payload: entry.value,
                        status: CacheStatus::Stale {
                            warning: STALE_WARNING.to_string(),
                        },
                    })
                }
                None => Err(ProxyError::ServiceUnavailable(err.to_string())),
            }
        }
    }
}
