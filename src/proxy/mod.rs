//! Proxy Module
//!
//! Stale-while-revalidate request handling on top of the cache store.

mod swr;

pub use swr::{serve_cached, CacheStatus, CachedResponse, STALE_WARNING};
