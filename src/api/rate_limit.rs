//! Rate limiting
//!
//! Fixed-window request counter per client IP, applied to `/api/*`.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use super::handlers::AppState;
use crate::cache::SharedClock;
use crate::error::ProxyError;

/// Prune expired windows once the table grows past this many clients.
const PRUNE_THRESHOLD: usize = 10_000;

const RATELIMIT_LIMIT: &str = "ratelimit-limit";
const RATELIMIT_REMAINING: &str = "ratelimit-remaining";
const RATELIMIT_RESET: &str = "ratelimit-reset";

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: u64,
    count: u32,
}

/// Outcome of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed { remaining: u32, reset_secs: u64 },
    Limited { retry_after_secs: u64 },
}

/// In-memory fixed-window limiter.
#[derive(Debug)]
pub struct RateLimiter {
    windows: Mutex<HashMap<String, Window>>,
    max_requests: u32,
    window_ms: u64,
    clock: SharedClock,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration, clock: SharedClock) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            max_requests,
            window_ms: (window.as_millis() as u64).max(1),
            clock,
        }
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    /// Counts one request for `client` and decides whether it may proceed.
    pub fn check(&self, client: &str) -> RateDecision {
        let now = self.clock.now_ms();
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());

        if windows.len() > PRUNE_THRESHOLD {
            let window_ms = self.window_ms;
            windows.retain(|_, w| now.saturating_sub(w.started_at) < window_ms);
        }

        let window = windows.entry(client.to_string()).or_insert(Window {
            started_at: now,
            count: 0,
        });
        if now.saturating_sub(window.started_at) >= self.window_ms {
            *window = Window {
                started_at: now,
                count: 0,
            };
        }

        let reset_ms = (window.started_at + self.window_ms).saturating_sub(now);
        let reset_secs = reset_ms.div_ceil(1000);

        if window.count >= self.max_requests {
            return RateDecision::Limited {
                retry_after_secs: self.window_ms.div_ceil(1000),
            };
        }

        window.count += 1;
        RateDecision::Allowed {
            remaining: self.max_requests - window.count,
            reset_secs,
        }
    }
}

/// Best-effort client address: proxy headers first, then the socket peer.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').map(str::trim).find(|ip| !ip.is_empty()))
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(str::trim)
                .filter(|ip| !ip.is_empty())
        })
        .map(String::from)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Middleware enforcing the limiter stored in `AppState`.
pub async fn rate_limit(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0);
    let ip = client_ip(req.headers(), peer);
    let limiter = &state.rate_limiter;

    match limiter.check(&ip) {
        RateDecision::Allowed {
            remaining,
            reset_secs,
        } => {
            debug!(%ip, remaining, "rate limit ok");
            let mut response = next.run(req).await;
            let headers = response.headers_mut();
            headers.insert(
                RATELIMIT_LIMIT,
                HeaderValue::from(limiter.max_requests()),
            );
            headers.insert(RATELIMIT_REMAINING, HeaderValue::from(remaining));
            headers.insert(RATELIMIT_RESET, HeaderValue::from(reset_secs));
            response
        }
        RateDecision::Limited { retry_after_secs } => {
            warn!(%ip, "rate limit exceeded");
            let mut response = ProxyError::RateLimited { retry_after_secs }.into_response();
            let headers = response.headers_mut();
            headers.insert(
                RATELIMIT_LIMIT,
                HeaderValue::from(limiter.max_requests()),
            );
            headers.insert(RATELIMIT_REMAINING, HeaderValue::from(0u32));
            response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::cache::ManualClock;

    fn limiter(max: u32) -> (RateLimiter, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(0));
        (
            RateLimiter::new(max, Duration::from_secs(60), clock.clone()),
            clock,
        )
    }

    #[test]
    fn test_allows_up_to_max_then_limits() {
        let (limiter, _) = limiter(2);

        assert_eq!(
            limiter.check("1.2.3.4"),
            RateDecision::Allowed {
                remaining: 1,
                reset_secs: 60
            }
        );
        assert!(matches!(
            limiter.check("1.2.3.4"),
            RateDecision::Allowed { remaining: 0, .. }
        ));
        assert_eq!(
            limiter.check("1.2.3.4"),
            RateDecision::Limited {
                retry_after_secs: 60
            }
        );
    }

    #[test]
    fn test_clients_are_independent() {
        let (limiter, _) = limiter(1);
        assert!(matches!(limiter.check("a"), RateDecision::Allowed { .. }));
        assert!(matches!(limiter.check("b"), RateDecision::Allowed { .. }));
        assert!(matches!(limiter.check("a"), RateDecision::Limited { .. }));
    }

    #[test]
    fn test_window_resets() {
        let (limiter, clock) = limiter(1);
        assert!(matches!(limiter.check("a"), RateDecision::Allowed { .. }));
        assert!(matches!(limiter.check("a"), RateDecision::Limited { .. }));

        clock.advance_secs(30);
        assert!(matches!(limiter.check("a"), RateDecision::Limited { .. }));

        clock.advance_secs(30);
        assert!(matches!(
            limiter.check("a"),
            RateDecision::Allowed { remaining: 0, .. }
        ));
    }

    #[test]
    fn test_client_ip_precedence() {
        let peer: SocketAddr = "10.0.0.9:5555".parse().unwrap();
        let mut headers = HeaderMap::new();
        assert_eq!(client_ip(&headers, None), "unknown");
        assert_eq!(client_ip(&headers, Some(peer)), "10.0.0.9");

        headers.insert("x-real-ip", HeaderValue::from_static("192.168.1.2"));
        assert_eq!(client_ip(&headers, Some(peer)), "192.168.1.2");

        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static(" 203.0.113.7 , 10.0.0.1"),
        );
        assert_eq!(client_ip(&headers, Some(peer)), "203.0.113.7");
    }
}
