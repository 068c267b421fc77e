//! Response DTOs for the proxy API
//!
//! Defines the structure of outgoing HTTP response bodies. Cached data
//! responses are built in `proxy::swr` since their shape follows the
//! upstream payload.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{ATTRIBUTION_NOTICE, DATA_SOURCE, DATA_SOURCE_DISCORD, DATA_SOURCE_WEBSITE};
use crate::cache::CacheStats;

/// Public data endpoints, listed by the index and 404 responses.
pub const API_ENDPOINTS: [(&str, &str); 7] = [
    ("items", "/api/items"),
    ("arcs", "/api/arcs"),
    ("quests", "/api/quests"),
    ("traders", "/api/traders"),
    ("maps", "/api/maps"),
    ("health", "/api/health"),
    ("attribution", "/api/attribution"),
];

/// Upstream reachability as seen by the health check.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamHealth {
    pub healthy: bool,
    pub base_url: String,
}

/// Response body for `GET /api/health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status of the proxy itself
    pub status: String,
    /// Current timestamp in RFC 3339 format
    pub timestamp: String,
    pub cache: CacheStats,
    pub metaforge: UpstreamHealth,
    pub attribution: &'static str,
}

impl HealthResponse {
    /// The proxy reports healthy even when the upstream is down, since
    /// cached data can still be served.
    pub fn healthy(cache: CacheStats, metaforge: UpstreamHealth) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            cache,
            metaforge,
            attribution: ATTRIBUTION_NOTICE,
        }
    }
}

/// Response body for `POST /api/cache/clear`
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: String,
}

impl ClearResponse {
    pub fn cleared() -> Self {
        Self {
            success: true,
            message: "Cache cleared successfully".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Response body for `GET /api/attribution`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributionResponse {
    pub data_source: &'static str,
    pub website: &'static str,
    pub discord: &'static str,
    pub license: &'static str,
    pub notice: &'static str,
    pub commercial_use: &'static str,
}

impl Default for AttributionResponse {
    fn default() -> Self {
        Self {
            data_source: DATA_SOURCE,
            website: DATA_SOURCE_WEBSITE,
            discord: DATA_SOURCE_DISCORD,
            license: "Free use with attribution required",
            notice: "This app uses game data from MetaForge, a community-driven Arc Raiders database.",
            commercial_use: "Requires permission - contact MetaForge team via Discord",
        }
    }
}

/// Short attribution block embedded in the index response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributionSummary {
    pub data_source: &'static str,
    pub website: &'static str,
    pub discord: &'static str,
}

/// Response body for `GET /`
#[derive(Debug, Clone, Serialize)]
pub struct IndexResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub endpoints: BTreeMap<&'static str, &'static str>,
    pub attribution: AttributionSummary,
}

impl Default for IndexResponse {
    fn default() -> Self {
        Self {
            name: "Arc Raiders API Proxy",
            version: env!("CARGO_PKG_VERSION"),
            description: "Backend proxy for MetaForge Arc Raiders API",
            endpoints: API_ENDPOINTS.into_iter().collect(),
            attribution: AttributionSummary {
                data_source: DATA_SOURCE,
                website: DATA_SOURCE_WEBSITE,
                discord: DATA_SOURCE_DISCORD,
            },
        }
    }
}

/// Response body for unknown routes
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotFoundResponse {
    pub error: &'static str,
    pub message: String,
    pub available_endpoints: Vec<&'static str>,
}

impl NotFoundResponse {
    pub fn for_path(path: &str) -> Self {
        Self {
            error: "Not Found",
            message: format!("Endpoint {} not found", path),
            available_endpoints: API_ENDPOINTS.iter().map(|(_, path)| *path).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy(
            CacheStats::new(3600).snapshot(0),
            UpstreamHealth {
                healthy: false,
                base_url: "https://metaforge.app/api/arc-raiders".to_string(),
            },
        );
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["metaforge"]["healthy"], false);
        assert_eq!(
            json["metaforge"]["baseUrl"],
            "https://metaforge.app/api/arc-raiders"
        );
        assert_eq!(json["cache"]["ttl"], 3600);
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_attribution_serialize_camel_case() {
        let json = serde_json::to_value(AttributionResponse::default()).unwrap();
        assert_eq!(json["dataSource"], "MetaForge");
        assert!(json["commercialUse"].is_string());
    }

    #[test]
    fn test_index_lists_endpoints() {
        let json = serde_json::to_value(IndexResponse::default()).unwrap();
        assert_eq!(json["endpoints"]["maps"], "/api/maps");
        assert_eq!(json["attribution"]["dataSource"], "MetaForge");
    }

    #[test]
    fn test_not_found_response() {
        let json = serde_json::to_value(NotFoundResponse::for_path("/nope")).unwrap();
        assert_eq!(json["error"], "Not Found");
        assert_eq!(json["message"], "Endpoint /nope not found");
        assert_eq!(json["availableEndpoints"].as_array().unwrap().len(), 7);
    }

    #[test]
    fn test_clear_response() {
        let resp = ClearResponse::cleared();
        assert!(resp.success);
        assert!(resp.message.contains("cleared"));
    }
}
