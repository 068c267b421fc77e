//! Arc Raiders Proxy - A caching proxy in front of the MetaForge API
//!
//! Serves game data collections with TTL caching, stale fallback when the
//! upstream is down, and per-client rate limiting. The `companion` module
//! holds the device-side cache used by the companion app.

pub mod api;
pub mod cache;
pub mod companion;
pub mod config;
pub mod error;
pub mod models;
pub mod proxy;
pub mod tasks;
pub mod upstream;

pub use api::{create_router, AppState};
pub use config::Config;
pub use error::{ProxyError, Result};
pub use tasks::spawn_cleanup_task;
