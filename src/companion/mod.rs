//! Companion Module
//!
//! Client-side cache wrapper used by the companion app: device storage
//! plus a collection client that talks to the proxy.

mod client;
mod storage;

pub use client::{Collection, CollectionFetch, CompanionClient, API_TIMEOUT, CACHE_DURATION};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
