//! Upstream Module
//!
//! Outbound client for the MetaForge Arc Raiders API.

mod client;

pub use client::{UpstreamClient, USER_AGENT_VALUE};
