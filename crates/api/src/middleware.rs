// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Middleware module for HTTP request processing
//!
//! This module provides middleware for rate limiting and request metrics.
//! Rate limiting is keyed by caller identity when the request carries a
//! usable `user-id` header and by client address otherwise, so anonymous
//! and misidentified traffic cannot drain a caller's budget.

use std::{
    net::IpAddr,
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, MatchedPath, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode, header::RETRY_AFTER},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use envelope::{ApiError, CallerId};
use tracing::{debug, warn};

use crate::{config::RateLimitingConfig, metrics};

// Rate limiting constants
const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(60);
const MAX_TRACKED_KEYS: usize = 10_000;

/// Key a request is throttled under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum RateKey {
    /// Identified caller, from the `user-id` header
    Caller(i64),
    /// Anonymous caller, tracked by client address
    Ip(IpAddr),
}

/// Determine the throttling key for a request
fn rate_key(headers: &HeaderMap, client_ip: IpAddr) -> RateKey {
    match CallerId::from_headers(headers) {
        Ok(caller) => RateKey::Caller(caller.0),
        Err(_) => RateKey::Ip(client_ip),
    }
}

#[derive(Debug, Clone)]
struct Window {
    count: u32,
    started: Instant,
}

/// Rate limiting middleware state
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimitingConfig,
    // Lock-free concurrent windows, bounded by periodic eviction
    windows: Arc<DashMap<RateKey, Window>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given configuration
    pub fn new(config: RateLimitingConfig) -> Self {
        Self {
            config,
            windows: Arc::new(DashMap::new()),
        }
    }

    /// Check if rate limiting is enabled
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Admit or refuse a request under the given key
    ///
    /// # Errors
    ///
    /// Returns the number of seconds until the key's window resets when the
    /// request is over the limit.
    fn check(&self, key: RateKey) -> Result<(), u64> {
        if !self.config.enabled {
            return Ok(());
        }

        let now = Instant::now();

        if self.windows.len() > MAX_TRACKED_KEYS {
            self.evict_stale(now);
        }

        let window = self
            .windows
            .entry(key)
            .and_modify(|window| {
                if now.duration_since(window.started) > RATE_LIMIT_WINDOW {
                    window.count = 1;
                    window.started = now;
                } else {
                    window.count += 1;
                }
            })
            .or_insert_with(|| Window {
                count: 1,
                started: now,
            });

        if window.count <= self.config.requests_per_minute {
            return Ok(());
        }

        let elapsed = now.duration_since(window.started);
        let retry_after = RATE_LIMIT_WINDOW.saturating_sub(elapsed).as_secs().max(1);
        Err(retry_after)
    }

    /// Drop windows that have fallen out of the rate limit interval
    fn evict_stale(&self, now: Instant) {
        let before = self.windows.len();
        self.windows
            .retain(|_, window| now.duration_since(window.started) <= RATE_LIMIT_WINDOW);
        let evicted = before.saturating_sub(self.windows.len());

        if evicted > 0 {
            debug!("evicted {} stale rate limit windows", evicted);
        }
        if self.windows.len() > MAX_TRACKED_KEYS {
            warn!(
                "rate limiter still tracks {} keys after eviction",
                self.windows.len()
            );
        }
    }
}

/// Rate limiting middleware function
pub async fn rate_limiting_middleware(
    ConnectInfo(addr): ConnectInfo<std::net::SocketAddr>,
    State(rate_limiter): State<RateLimiter>,
    req: Request,
    next: Next,
) -> Response {
    let key = rate_key(req.headers(), addr.ip());

    match rate_limiter.check(key) {
        Ok(()) => next.run(req).await,
        Err(retry_after) => {
            warn!(?key, retry_after, "rate limit exceeded");
            ApiError::new("rate limit exceeded")
                .with_status(StatusCode::TOO_MANY_REQUESTS)
                .with_header(RETRY_AFTER, HeaderValue::from(retry_after))
                .into_response()
        }
    }
}

/// Metrics recording middleware function
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| "unmatched".to_string(), |p| p.as_str().to_string());

    let started = Instant::now();
    let response = next.run(req).await;

    metrics::observe_request(
        method.as_str(),
        &path,
        response.status(),
        started.elapsed().as_secs_f64(),
    );

    response
}

#[cfg(test)]
mod tests {
    use envelope::USER_ID_HEADER;

    use super::*;

    fn make_limiter(enabled: bool, requests_per_minute: u32) -> RateLimiter {
        RateLimiter::new(RateLimitingConfig {
            enabled,
            requests_per_minute,
        })
    }

    #[test]
    fn disabled_limiter_admits_everything() {
        let limiter = make_limiter(false, 1);
        let key = RateKey::Caller(1);

        for _ in 0..10 {
            assert!(limiter.check(key).is_ok());
        }
    }

    #[test]
    fn requests_within_limit_are_admitted() {
        let limiter = make_limiter(true, 5);
        let key = RateKey::Caller(7);

        for _ in 0..5 {
            assert!(limiter.check(key).is_ok());
        }
    }

    #[test]
    fn requests_over_limit_are_refused() {
        let limiter = make_limiter(true, 3);
        let key = RateKey::Caller(7);

        for _ in 0..3 {
            assert!(limiter.check(key).is_ok());
        }

        let retry_after = limiter.check(key).expect_err("over the limit");
        assert!((1..=60).contains(&retry_after));

        // Subsequent requests stay refused within the window
        assert!(limiter.check(key).is_err());
    }

    #[test]
    fn keys_are_throttled_independently() {
        let limiter = make_limiter(true, 2);
        let alice = RateKey::Caller(1);
        let bob = RateKey::Caller(2);
        let anonymous = RateKey::Ip("127.0.0.1".parse().expect("valid address"));

        assert!(limiter.check(alice).is_ok());
        assert!(limiter.check(bob).is_ok());
        assert!(limiter.check(anonymous).is_ok());
        assert!(limiter.check(alice).is_ok());
        assert!(limiter.check(bob).is_ok());
        assert!(limiter.check(anonymous).is_ok());

        assert!(limiter.check(alice).is_err());
        assert!(limiter.check(bob).is_err());
        assert!(limiter.check(anonymous).is_err());
    }

    #[test]
    fn identified_requests_key_on_the_caller() {
        let ip: IpAddr = "10.0.0.1".parse().expect("valid address");

        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("42"));
        assert_eq!(rate_key(&headers, ip), RateKey::Caller(42));
    }

    #[test]
    fn unidentified_requests_key_on_the_address() {
        let ip: IpAddr = "10.0.0.1".parse().expect("valid address");

        assert_eq!(rate_key(&HeaderMap::new(), ip), RateKey::Ip(ip));

        // A malformed identity falls back to the address as well
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("not-a-number"));
        assert_eq!(rate_key(&headers, ip), RateKey::Ip(ip));
    }
}
