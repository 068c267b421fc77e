//! MetaForge API HTTP client.
//!
//! Applies a hard timeout to every call and maps failures onto
//! `Timeout`, `Http` and `Network`. No retries happen here; fallback is
//! the caller's job.

use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT},
    Client,
};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::error::{ProxyError, Result};

pub const USER_AGENT_VALUE: &str = "Arc-Raiders-Companion-App/1.0";

/// Client for the third-party game-data API.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl UpstreamClient {
    /// Creates a client for `base_url` with the given per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ProxyError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GETs `endpoint` (relative to the base URL) and decodes the JSON body.
    ///
    /// The whole exchange, body included, runs under the timeout; when it
    /// fires the in-flight request future is dropped, which aborts the call.
    pub async fn request(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Value> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(%url, "MetaForge fetch");

        match tokio::time::timeout(self.timeout, self.send(&url, query)).await {
            Ok(Ok(value)) => {
                debug!(%url, "MetaForge fetch succeeded");
                Ok(value)
            }
            Ok(Err(err)) => {
                error!(%url, error = %err, "MetaForge fetch failed");
                Err(err)
            }
            Err(_) => {
                warn!(%url, timeout_ms = self.timeout.as_millis() as u64, "MetaForge fetch timed out");
                Err(ProxyError::Timeout)
            }
        }
    }

    async fn send(&self, url: &str, query: &[(&str, &str)]) -> Result<Value> {
        let mut builder = self.client.get(url);
        if !query.is_empty() {
            builder = builder.query(query);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ProxyError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProxyError::Http {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ProxyError::Network(format!("invalid JSON body: {e}")))
    }

    /// All items.
    pub async fn items(&self) -> Result<Value> {
        self.request("/items", &[]).await
    }

    /// All ARC enemies.
    pub async fn arcs(&self) -> Result<Value> {
        self.request("/arcs", &[]).await
    }

    pub async fn quests(&self) -> Result<Value> {
        self.request("/quests", &[]).await
    }

    pub async fn traders(&self) -> Result<Value> {
        self.request("/traders", &[]).await
    }

    /// Map data, optionally narrowed to a single map.
    pub async fn maps(&self, map_id: Option<&str>) -> Result<Value> {
        match map_id {
            Some(id) => self.request("/game-map-data", &[("map", id)]).await,
            None => self.request("/game-map-data", &[]).await,
        }
    }

    /// True when the items endpoint answers successfully.
    pub async fn health_check(&self) -> bool {
        match self.items().await {
            Ok(_) => true,
            Err(err) => {
                warn!(error = %err, "MetaForge health check failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client =
            UpstreamClient::new("https://metaforge.app/api/arc-raiders/", Duration::from_secs(1))
                .unwrap();
        assert_eq!(client.base_url(), "https://metaforge.app/api/arc-raiders");
        assert_eq!(client.timeout(), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client =
            UpstreamClient::new(format!("http://{addr}"), Duration::from_secs(5)).unwrap();
        let err = client.items().await.unwrap_err();
        assert!(matches!(err, ProxyError::Network(_)), "got {err:?}");
        assert!(!client.health_check().await);
    }
}
