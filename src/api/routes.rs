//! API Routes
//!
//! Configures the Axum router with all proxy endpoints and middleware.

use axum::{
    http::{
        header::{self, HeaderName},
        HeaderValue, Method,
    },
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::warn;

use super::handlers::{
    arcs_handler, attribution_handler, cache_stats_handler, clear_cache_handler, health_handler,
    index_handler, items_handler, maps_handler, not_found_handler, quests_handler,
    traders_handler, AppState,
};
use super::rate_limit::rate_limit;

/// Creates the main router with all endpoints configured.
///
/// Unsupported methods on known paths get the same JSON 404 as unknown
/// paths. Unknown `/api/*` paths are not counted by the limiter.
///
/// # Middleware
/// - Rate limiting on `/api/*` routes
/// - CORS restricted to the configured origins
/// - gzip compression and hardening headers
/// - Tracing of every request
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/items", get(items_handler).fallback(not_found_handler))
        .route("/arcs", get(arcs_handler).fallback(not_found_handler))
        .route("/quests", get(quests_handler).fallback(not_found_handler))
        .route("/traders", get(traders_handler).fallback(not_found_handler))
        .route("/maps", get(maps_handler).fallback(not_found_handler))
        .route("/health", get(health_handler).fallback(not_found_handler))
        .route("/attribution", get(attribution_handler).fallback(not_found_handler))
        .route("/cache/clear", post(clear_cache_handler).fallback(not_found_handler))
        .route("/cache/stats", get(cache_stats_handler).fallback(not_found_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit));

    Router::new()
        .route("/", get(index_handler).fallback(not_found_handler))
        .nest("/api", api)
        .fallback(not_found_handler)
        .layer(cors_layer(&state.config.allowed_origins))
        .layer(CompressionLayer::new())
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for browser clients. Requests without an `Origin` header (the
/// mobile app, curl) are not affected.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::ACCEPT,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-requested-with"),
        ])
        .allow_credentials(true)
}
