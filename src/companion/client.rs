//! Companion app data client
//!
//! Fetches collections from the proxy and keeps a device-side copy. A
//! fresh local copy is served without touching the network; a failed
//! fetch falls back to whatever copy exists, however old.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use super::storage::{FileStore, KeyValueStore};
use crate::cache::SharedClock;
use crate::error::{ProxyError, Result};
use crate::models::game::Identified;
use crate::models::{ApiResponse, ArcEnemy, GameMap, Item};

/// How long a device-side copy counts as fresh.
pub const CACHE_DURATION: Duration = Duration::from_secs(24 * 60 * 60);

/// Timeout for calls to the proxy.
pub const API_TIMEOUT: Duration = Duration::from_secs(10);

/// A collection the companion app browses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Items,
    Arcs,
    Maps,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Collection::Items, Collection::Arcs, Collection::Maps];

    /// Storage key holding the serialized collection.
    pub fn payload_key(self) -> &'static str {
        match self {
            Collection::Items => "@arc_raiders_items",
            Collection::Arcs => "@arc_raiders_arcs",
            Collection::Maps => "@arc_raiders_maps",
        }
    }

    /// Storage key holding the fetch time in epoch milliseconds.
    pub fn timestamp_key(self) -> &'static str {
        match self {
            Collection::Items => "@arc_raiders_items_timestamp",
            Collection::Arcs => "@arc_raiders_arcs_timestamp",
            Collection::Maps => "@arc_raiders_maps_timestamp",
        }
    }

    /// Proxy endpoint, relative to the API base URL.
    pub fn endpoint(self) -> &'static str {
        match self {
            Collection::Items => "/items",
            Collection::Arcs => "/arcs",
            Collection::Maps => "/maps",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Collection::Items => "items",
            Collection::Arcs => "ARCs",
            Collection::Maps => "maps",
        }
    }
}

/// Outcome of fetching a collection.
///
/// Lets callers tell an empty collection from a failed fetch;
/// `into_items` collapses it to the degrade-to-empty view.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionFetch<T> {
    /// Fresh device-side copy, no network call made
    Cached(Vec<T>),
    /// Fetched from the proxy and stored
    Fetched(Vec<T>),
    /// Fetch failed; an older device-side copy was served
    Stale { items: Vec<T>, error: ProxyError },
    /// Fetch failed and no usable copy exists
    Failed(ProxyError),
}

impl<T> CollectionFetch<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            CollectionFetch::Cached(items)
            | CollectionFetch::Fetched(items)
            | CollectionFetch::Stale { items, .. } => items,
            CollectionFetch::Failed(_) => Vec::new(),
        }
    }

    pub fn error(&self) -> Option<&ProxyError> {
        match self {
            CollectionFetch::Stale { error, .. } | CollectionFetch::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// Client for the proxy with a device-side cache in front of it.
pub struct CompanionClient<S> {
    http: Client,
    base_url: String,
    store: S,
    clock: SharedClock,
}

impl<S: KeyValueStore> CompanionClient<S> {
    /// `base_url` is the proxy API root, e.g. `http://localhost:3000/api`.
    pub fn new(base_url: impl Into<String>, store: S, clock: SharedClock) -> Result<Self> {
        let http = Client::builder()
            .timeout(API_TIMEOUT)
            .build()
            .map_err(|e| ProxyError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            store,
            clock,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // == Collections ==

    /// Resolves a collection through the device cache and the proxy.
    pub async fn fetch_collection<T: DeserializeOwned>(
        &self,
        collection: Collection,
    ) -> CollectionFetch<T> {
        if self.is_cache_valid(collection) {
            if let Some(items) = self.read_payload(collection) {
                info!("Returning cached {}", collection.label());
                return CollectionFetch::Cached(items);
            }
        }

        match self.fetch_remote(collection).await {
            Ok(raw) => {
                self.write_payload(collection, &raw);
                CollectionFetch::Fetched(decode_collection(collection, &raw).unwrap_or_else(
                    || {
                        warn!("Proxy returned non-array {}", collection.label());
                        Vec::new()
                    },
                ))
            }
            Err(err) => {
                error!(error = %err, "Error fetching {}", collection.label());

                match self.read_payload(collection) {
                    Some(items) => {
                        info!(
                            "Returning expired cached {} due to fetch error",
                            collection.label()
                        );
                        CollectionFetch::Stale { items, error: err }
                    }
                    None => CollectionFetch::Failed(err),
                }
            }
        }
    }

    /// Degrade-to-empty view of `fetch_collection`.
    pub async fn fetch_all<T: DeserializeOwned>(&self, collection: Collection) -> Vec<T> {
        self.fetch_collection(collection).await.into_items()
    }

    /// Linear scan of the collection for `id`.
    pub async fn fetch_by_id<T>(&self, collection: Collection, id: &str) -> Option<T>
    where
        T: DeserializeOwned + Identified,
    {
        self.fetch_all::<T>(collection)
            .await
            .into_iter()
            .find(|entry| entry.id() == id)
    }

    pub async fn fetch_items(&self) -> Vec<Item> {
        self.fetch_all(Collection::Items).await
    }

    pub async fn fetch_item_by_id(&self, id: &str) -> Option<Item> {
        self.fetch_by_id(Collection::Items, id).await
    }

    pub async fn fetch_arcs(&self) -> Vec<ArcEnemy> {
        self.fetch_all(Collection::Arcs).await
    }

    pub async fn fetch_arc_by_id(&self, id: &str) -> Option<ArcEnemy> {
        self.fetch_by_id(Collection::Arcs, id).await
    }

    pub async fn fetch_maps(&self) -> Vec<GameMap> {
        self.fetch_all(Collection::Maps).await
    }

    pub async fn fetch_map_by_id(&self, id: &str) -> Option<GameMap> {
        self.fetch_by_id(Collection::Maps, id).await
    }

    /// Removes every stored collection and timestamp. Failures are logged.
    pub fn clear_cache(&self) {
        let mut failed = false;
        for collection in Collection::ALL {
            for key in [collection.payload_key(), collection.timestamp_key()] {
                if let Err(err) = self.store.remove_item(key) {
                    error!(key, error = %err, "Error clearing cache");
                    failed = true;
                }
            }
        }
        if !failed {
            info!("Cache cleared successfully");
        }
    }

    // == Device cache ==

    fn is_cache_valid(&self, collection: Collection) -> bool {
        let raw = match self.store.get_item(collection.timestamp_key()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return false,
            Err(err) => {
                error!(error = %err, "Error checking cache validity");
                return false;
            }
        };

        match raw.trim().parse::<u64>() {
            Ok(stored_at) => {
                let age = self.clock.now_ms().saturating_sub(stored_at);
                age < CACHE_DURATION.as_millis() as u64
            }
            Err(_) => {
                warn!(key = collection.timestamp_key(), "Ignoring malformed cache timestamp");
                false
            }
        }
    }

    /// Reads and decodes the stored collection; any failure is a miss.
    fn read_payload<T: DeserializeOwned>(&self, collection: Collection) -> Option<Vec<T>> {
        let raw = match self.store.get_item(collection.payload_key()) {
            Ok(raw) => raw?,
            Err(err) => {
                error!(error = %err, "Error reading cache");
                return None;
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => decode_collection(collection, &value),
            Err(err) => {
                error!(error = %err, "Error reading cache");
                None
            }
        }
    }

    /// Payload first, then timestamp, so a timestamp never vouches for a
    /// payload that was not written.
    fn write_payload(&self, collection: Collection, raw: &Value) {
        let result = serde_json::to_string(raw)
            .map_err(|e| ProxyError::CacheIo(e.to_string()))
            .and_then(|json| self.store.set_item(collection.payload_key(), &json))
            .and_then(|()| {
                self.store.set_item(
                    collection.timestamp_key(),
                    &self.clock.now_ms().to_string(),
                )
            });

        if let Err(err) = result {
            error!(error = %err, "Error writing cache");
        }
    }

    /// GETs the collection and returns its `data` field untouched.
    async fn fetch_remote(&self, collection: Collection) -> Result<Value> {
        let url = format!("{}{}", self.base_url, collection.endpoint());
        debug!(%url, "Fetching {}", collection.label());

        let envelope: ApiResponse<Value> = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(envelope.data)
    }
}

impl CompanionClient<FileStore> {
    /// Client backed by files in the platform data directory.
    pub fn on_device(base_url: impl Into<String>, clock: SharedClock) -> Result<Self> {
        let store = FileStore::new().ok_or_else(|| {
            ProxyError::CacheIo("no data directory available for device storage".to_string())
        })?;
        Self::new(base_url, store, clock)
    }
}

/// Decodes each element on its own, skipping records that do not fit `T`.
/// Returns `None` when `raw` is not an array.
fn decode_collection<T: DeserializeOwned>(collection: Collection, raw: &Value) -> Option<Vec<T>> {
    let elements = raw.as_array()?;

    let items = elements
        .iter()
        .enumerate()
        .filter_map(|(index, element)| match T::deserialize(element) {
            Ok(item) => Some(item),
            Err(err) => {
                warn!(index, error = %err, "Skipping malformed {} record", collection.label());
                None
            }
        })
        .collect();

    Some(items)
}
