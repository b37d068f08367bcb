use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::error::ApiError;

// Expired windows are swept once the table grows past this many clients.
const SWEEP_THRESHOLD: usize = 1024;

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window request counter keyed by client address.
///
/// Separate instances back the general API limit and the stricter login
/// limit, each with its own counters and refusal message.
#[derive(Clone)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    message: &'static str,
    windows: Arc<Mutex<HashMap<String, Window>>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window_secs: u64, message: &'static str) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
            message,
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Count one request for `key`; errors once the window's quota is spent.
    pub fn check(&self, key: &str) -> Result<(), ApiError> {
        let now = Instant::now();
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());

        if windows.len() > SWEEP_THRESHOLD {
            windows.retain(|_, w| now.duration_since(w.started) < self.window);
        }

        let window = windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(window.started) >= self.window {
            window.started = now;
            window.count = 0;
        }

        if window.count >= self.max_requests {
            return Err(ApiError::rate_limited(self.message));
        }

        window.count += 1;
        Ok(())
    }
}

/// Prefer the proxy-supplied client address, fall back to the socket peer.
fn client_key(request: &Request) -> String {
    if let Some(forwarded) = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn rate_limit(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let key = client_key(&request);
    if let Err(err) = limiter.check(&key) {
        warn!("rate limit hit for {} on {}", key, request.uri().path());
        return Err(err);
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_within_quota_pass() {
        let limiter = RateLimiter::new(3, 60, "slow down");
        for _ in 0..3 {
            assert!(limiter.check("1.2.3.4").is_ok());
        }
    }

    #[test]
    fn quota_exhaustion_is_rate_limited() {
        let limiter = RateLimiter::new(2, 60, "slow down");
        limiter.check("1.2.3.4").unwrap();
        limiter.check("1.2.3.4").unwrap();
        let err = limiter.check("1.2.3.4").unwrap_err();
        assert!(matches!(err, ApiError::RateLimited(_)));
    }

    #[test]
    fn clients_are_counted_separately() {
        let limiter = RateLimiter::new(1, 60, "slow down");
        limiter.check("1.2.3.4").unwrap();
        assert!(limiter.check("5.6.7.8").is_ok());
        assert!(limiter.check("1.2.3.4").is_err());
    }

    #[test]
    fn window_resets_after_expiry() {
        let limiter = RateLimiter::new(1, 0, "slow down");
        limiter.check("1.2.3.4").unwrap();
        // Zero-length window: the next check starts a fresh window.
        assert!(limiter.check("1.2.3.4").is_ok());
    }

    #[test]
    fn forwarded_header_wins_over_socket_addr() {
        let mut request = Request::new(axum::body::Body::empty());
        request
            .headers_mut()
            .insert("x-forwarded-for", "9.9.9.9, 10.0.0.1".parse().unwrap());
        request.extensions_mut().insert(ConnectInfo(SocketAddr::from((
            [127, 0, 0, 1],
            4444,
        ))));
        assert_eq!(client_key(&request), "9.9.9.9");
    }

    #[test]
    fn socket_addr_used_without_proxy_header() {
        let mut request = Request::new(axum::body::Body::empty());
        request.extensions_mut().insert(ConnectInfo(SocketAddr::from((
            [127, 0, 0, 1],
            4444,
        ))));
        assert_eq!(client_key(&request), "127.0.0.1");
    }

    #[test]
    fn unknown_key_without_any_source() {
        let request = Request::new(axum::body::Body::empty());
        assert_eq!(client_key(&request), "unknown");
    }
}
