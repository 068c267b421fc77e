//! Configuration Module
//!
//! Handles loading and managing proxy configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_ORIGIN: &str = "http://localhost:19006";
const DEFAULT_UPSTREAM_BASE: &str = "https://metaforge.app/api/arc-raiders";

/// Proxy configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Origins allowed by the CORS layer
    pub allowed_origins: Vec<String>,
    /// Base URL of the MetaForge API
    pub upstream_base_url: String,
    /// Upstream request timeout in milliseconds
    pub upstream_timeout_ms: u64,
    /// Cache TTL in seconds
    pub cache_ttl: u64,
    /// Background sweep interval in seconds
    pub cache_check_period: u64,
    /// Maximum number of cached keys
    pub cache_max_entries: usize,
    /// Rate limit window in milliseconds
    pub rate_limit_window_ms: u64,
    /// Requests allowed per client per window
    pub rate_limit_max_requests: u32,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    ///
    /// # Environment Variables
    /// - `PORT` - HTTP server port (default: 3000)
    /// - `ALLOWED_ORIGINS` - Comma-separated CORS origins (default: Expo dev server)
    /// - `METAFORGE_API_BASE` - Upstream base URL
    /// - `UPSTREAM_TIMEOUT_MS` - Upstream timeout (default: 10000)
    /// - `CACHE_TTL` - Cache TTL in seconds (default: 3600)
    /// - `CACHE_CHECK_PERIOD` - Sweep interval in seconds (default: 600)
    /// - `CACHE_MAX_ENTRIES` - Maximum cached keys (default: 1000)
    /// - `RATE_LIMIT_WINDOW_MS` - Rate limit window (default: 900000)
    /// - `RATE_LIMIT_MAX_REQUESTS` - Requests per window (default: 100)
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let defaults = Self::default();
        Self {
            server_port: env_or("PORT", defaults.server_port),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .ok()
                .map(|v| parse_origins(&v))
                .filter(|origins| !origins.is_empty())
                .unwrap_or(defaults.allowed_origins),
            upstream_base_url: env::var("METAFORGE_API_BASE")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.upstream_base_url),
            upstream_timeout_ms: env_or("UPSTREAM_TIMEOUT_MS", defaults.upstream_timeout_ms),
            cache_ttl: env_or("CACHE_TTL", defaults.cache_ttl),
            cache_check_period: env_or("CACHE_CHECK_PERIOD", defaults.cache_check_period),
            cache_max_entries: env_or("CACHE_MAX_ENTRIES", defaults.cache_max_entries),
            rate_limit_window_ms: env_or("RATE_LIMIT_WINDOW_MS", defaults.rate_limit_window_ms),
            rate_limit_max_requests: env_or(
                "RATE_LIMIT_MAX_REQUESTS",
                defaults.rate_limit_max_requests,
            ),
        }
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_millis(self.upstream_timeout_ms)
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_millis(self.rate_limit_window_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            allowed_origins: vec![DEFAULT_ORIGIN.to_string()],
            upstream_base_url: DEFAULT_UPSTREAM_BASE.to_string(),
            upstream_timeout_ms: 10_000,
            cache_ttl: 3600,
            cache_check_period: 600,
            cache_max_entries: 1000,
            rate_limit_window_ms: 900_000,
            rate_limit_max_requests: 100,
        }
    }
}

/// Reads and parses an env var, falling back when unset, zero or unparseable.
fn env_or<T>(name: &str, default: T) -> T
where
    T: FromStr + PartialEq + Default,
{
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .filter(|v| *v != T::default())
        .unwrap_or(default)
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}
