//! Error types for the proxy
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::{NotFoundResponse, ATTRIBUTION_NOTICE};

// == Proxy Error Enum ==
/// Unified error type for the proxy and the companion client.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProxyError {
    /// Upstream call exceeded the configured timeout and was aborted
    #[error("MetaForge API request timeout")]
    Timeout,

    /// Upstream answered with a non-2xx status
    #[error("MetaForge API error: {status} {status_text}")]
    Http { status: u16, status_text: String },

    /// Transport-level failure (connect, TLS, body decode)
    #[error("Network error: {0}")]
    Network(String),

    /// Local storage read/write failure
    #[error("Cache storage error: {0}")]
    CacheIo(String),

    /// Unknown route; carries the request path
    #[error("Endpoint {0} not found")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Client exceeded the request budget for the current window
    #[error("Too many requests, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Upstream failed and no cached copy was available
    #[error("{0}")]
    ServiceUnavailable(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for ProxyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return ProxyError::Timeout;
        }
        if let Some(status) = err.status() {
            return ProxyError::Http {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("").to_string(),
            };
        }
        ProxyError::Network(err.to_string())
    }
}

impl From<std::io::Error> for ProxyError {
    fn from(err: std::io::Error) -> Self {
        ProxyError::CacheIo(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        match self {
            ProxyError::ServiceUnavailable(message) => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "error": "Service temporarily unavailable",
                    "message": message,
                    "attribution": ATTRIBUTION_NOTICE,
                })),
            )
                .into_response(),
            ProxyError::NotFound(path) => (
                StatusCode::NOT_FOUND,
                Json(NotFoundResponse::for_path(&path)),
            )
                .into_response(),
            ProxyError::RateLimited { retry_after_secs } => {
                let mut response = (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(json!({
                        "error": "Too many requests from this IP, please try again later.",
                        "retryAfter": retry_after_secs,
                    })),
                )
                    .into_response();
                response
                    .headers_mut()
                    .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
                response
            }
            other => {
                let status = match &other {
                    ProxyError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
                    ProxyError::Timeout => StatusCode::GATEWAY_TIMEOUT,
                    ProxyError::Http { .. } | ProxyError::Network(_) => StatusCode::BAD_GATEWAY,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };

                let body = Json(json!({
                    "error": other.to_string(),
                    "timestamp": chrono::Utc::now().to_rfc3339(),
                }));

                (status, body).into_response()
            }
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the proxy.
pub type Result<T> = std::result::Result<T, ProxyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_message() {
        let err = ProxyError::Http {
            status: 502,
            status_text: "Bad Gateway".to_string(),
        };
        assert_eq!(err.to_string(), "MetaForge API error: 502 Bad Gateway");
    }

    #[test]
    fn test_service_unavailable_status() {
        let response = ProxyError::ServiceUnavailable("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_rate_limited_sets_retry_after() {
        let response = ProxyError::RateLimited {
            retry_after_secs: 42,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "42");
    }

    #[test]
    fn test_not_found_lists_endpoints() {
        let response = ProxyError::NotFound("/api/loadouts".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let bytes = rt
            .block_on(axum::body::to_bytes(response.into_body(), usize::MAX))
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Not Found");
        assert_eq!(body["message"], "Endpoint /api/loadouts not found");
        assert!(body["availableEndpoints"].is_array());
    }

    #[test]
    fn test_invalid_request_status() {
        let response = ProxyError::InvalidRequest("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
