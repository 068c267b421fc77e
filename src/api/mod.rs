//! API Module
//!
//! HTTP handlers and routing for the proxy REST API.
//!
//! # Endpoints
//! - `GET /` - Service index
//! - `GET /api/items`, `/api/arcs`, `/api/quests`, `/api/traders` - Cached collections
//! - `GET /api/maps[?map=ID]` - Cached map data
//! - `GET /api/health` - Proxy and upstream health
//! - `GET /api/attribution` - Data source attribution
//! - `POST /api/cache/clear` - Drop all cached data
//! - `GET /api/cache/stats` - Cache counters

pub mod handlers;
pub mod rate_limit;
pub mod routes;

pub use handlers::*;
pub use rate_limit::{RateDecision, RateLimiter};
pub use routes::create_router;
