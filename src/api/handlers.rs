//! API Handlers
//!
//! HTTP request handlers for each proxy endpoint.

use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Query, State},
    Json,
};
use tokio::sync::RwLock;
use tracing::info;

use super::rate_limit::RateLimiter;
use crate::cache::{system_clock, CacheStats, CacheStore, SharedCache, SharedClock};
use crate::config::Config;
use crate::error::{ProxyError, Result};
use crate::models::{
    AttributionResponse, ClearResponse, HealthResponse, IndexResponse, MapQuery, UpstreamHealth,
};
use crate::proxy::{serve_cached, CachedResponse};
use crate::upstream::UpstreamClient;

pub const ITEMS_KEY: &str = "arc_raiders_items";
pub const ARCS_KEY: &str = "arc_raiders_arcs";
pub const QUESTS_KEY: &str = "arc_raiders_quests";
pub const TRADERS_KEY: &str = "arc_raiders_traders";

/// Application state shared across all handlers.
///
/// Built once at startup; the cache is the only mutable part.
#[derive(Clone)]
pub struct AppState {
    /// Shared cache store
    pub cache: SharedCache,
    /// MetaForge client
    pub upstream: UpstreamClient,
    /// Per-client request budget for `/api/*`
    pub rate_limiter: Arc<RateLimiter>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates the state from configuration with an explicit clock.
    pub fn new(config: Config, clock: SharedClock) -> Result<Self> {
        let cache = CacheStore::new(config.cache_max_entries, config.cache_ttl, clock.clone());
        let upstream = UpstreamClient::new(&config.upstream_base_url, config.upstream_timeout())?;
        let rate_limiter = RateLimiter::new(
            config.rate_limit_max_requests,
            config.rate_limit_window(),
            clock,
        );

        Ok(Self {
            cache: Arc::new(RwLock::new(cache)),
            upstream,
            rate_limiter: Arc::new(rate_limiter),
            config: Arc::new(config),
        })
    }

    /// Creates the state from configuration using the system clock.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.clone(), system_clock())
    }
}

/// Handler for GET /
pub async fn index_handler() -> Json<IndexResponse> {
    Json(IndexResponse::default())
}

/// Handler for GET /api/items
pub async fn items_handler(State(state): State<AppState>) -> Result<CachedResponse> {
    let upstream = state.upstream.clone();
    serve_cached(&state.cache, ITEMS_KEY, || async move { upstream.items().await }).await
}

/// Handler for GET /api/arcs
pub async fn arcs_handler(State(state): State<AppState>) -> Result<CachedResponse> {
    let upstream = state.upstream.clone();
    serve_cached(&state.cache, ARCS_KEY, || async move { upstream.arcs().await }).await
}

/// Handler for GET /api/quests
pub async fn quests_handler(State(state): State<AppState>) -> Result<CachedResponse> {
    let upstream = state.upstream.clone();
    serve_cached(&state.cache, QUESTS_KEY, || async move { upstream.quests().await }).await
}

/// Handler for GET /api/traders
pub async fn traders_handler(State(state): State<AppState>) -> Result<CachedResponse> {
    let upstream = state.upstream.clone();
    serve_cached(&state.cache, TRADERS_KEY, || async move { upstream.traders().await }).await
}

/// Handler for GET /api/maps[?map=ID]
///
/// Each map id gets its own cache key.
pub async fn maps_handler(
    State(state): State<AppState>,
    Query(query): Query<MapQuery>,
) -> Result<CachedResponse> {
    if let Some(error_msg) = query.validate() {
        return Err(ProxyError::InvalidRequest(error_msg));
    }

    let key = query.cache_key();
    let map_id = query.map_id().map(String::from);
    let upstream = state.upstream.clone();

    serve_cached(&state.cache, &key, || async move {
        upstream.maps(map_id.as_deref()).await
    })
    .await
}

/// Handler for GET /api/health
///
/// Probes the upstream; the proxy itself always reports healthy.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let cache = state.cache.read().await.stats();
    let healthy = state.upstream.health_check().await;

    Json(HealthResponse::healthy(
        cache,
        UpstreamHealth {
            healthy,
            base_url: state.upstream.base_url().to_string(),
        },
    ))
}

/// Handler for GET /api/attribution
pub async fn attribution_handler() -> Json<AttributionResponse> {
    Json(AttributionResponse::default())
}

/// Handler for POST /api/cache/clear
// TODO: guard behind an admin token once the proxy is deployed publicly
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.cache.write().await.clear();
    info!("Cache cleared via API");
    Json(ClearResponse::cleared())
}

/// Handler for GET /api/cache/stats
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.read().await.stats())
}

/// Fallback for unknown routes and unsupported methods
///
/// Reads the original URI so paths under `/api` keep their prefix.
pub async fn not_found_handler(OriginalUri(uri): OriginalUri) -> ProxyError {
    ProxyError::NotFound(uri.path().to_string())
}
