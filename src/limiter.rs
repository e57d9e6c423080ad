// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Token bucket rate limiter for the submission endpoint.
//!
//! One bucket per client IP: capacity is the configured per-window
//! maximum, refilled continuously at `max / window` tokens per second.
//! With the defaults (5 per 60s), the sixth request inside a window is
//! rejected before the endpoint logic runs.

use crate::config::RateLimitConfig;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

/// Result of a rate limit check.
#[derive(Debug, Clone)]
pub enum RateLimitResult {
    /// Request is allowed
    Allowed {
        /// Remaining requests in current window
        remaining: u32,
        /// Time until window resets
        reset_in: Duration,
    },
    /// Request is rate limited
    Limited {
        /// Time until a request would be accepted again
        retry_after: Duration,
    },
}

/// Token bucket for rate limiting.
#[derive(Debug)]
struct TokenBucket {
    /// Available tokens
    tokens: f64,
    /// Maximum tokens (bucket capacity)
    max_tokens: f64,
    /// Token refill rate per second
    refill_rate: f64,
    /// Rate window, reported as the retry hint when the bucket never refills
    window: Duration,
    /// Last time tokens were refilled
    last_refill: Instant,
}

impl TokenBucket {
    fn new(config: &RateLimitConfig) -> Self {
        let max_tokens = config.max_per_window as f64;
        let refill_rate = max_tokens / config.window_secs.max(1) as f64;

        Self {
            tokens: max_tokens,
            max_tokens,
            refill_rate,
            window: config.window_duration(),
            last_refill: Instant::now(),
        }
    }

    /// Refill tokens based on elapsed time.
    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_rate).min(self.max_tokens);
        self.last_refill = now;
    }

    /// Try to consume a token. Returns true if successful.
    fn try_consume(&mut self) -> bool {
        self.refill();
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Get remaining tokens.
    fn remaining(&self) -> u32 {
        self.tokens.floor() as u32
    }

    /// Get time until a token is available.
    fn time_until_available(&self) -> Duration {
        if self.tokens >= 1.0 {
            Duration::ZERO
        } else if self.refill_rate <= 0.0 {
            // A zero-capacity bucket never refills; report a full window.
            self.window
        } else {
            let needed = 1.0 - self.tokens;
            Duration::from_secs_f64(needed / self.refill_rate)
        }
    }
}

/// Thread-safe per-IP rate limiter.
pub struct RateLimiter {
    /// Configuration
    config: RateLimitConfig,
    /// Per-IP buckets
    buckets: Arc<RwLock<HashMap<IpAddr, TokenBucket>>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given configuration.
    pub fn new(config: RateLimitConfig) -> Self {
        Self { config, buckets: Arc::new(RwLock::new(HashMap::new())) }
    }

    /// Check and consume the rate limit for an IP address.
    pub async fn check_ip(&self, ip: IpAddr) -> RateLimitResult {
        let mut buckets = self.buckets.write().await;
        let bucket = buckets
            .entry(ip)
            .or_insert_with(|| TokenBucket::new(&self.config));

        if bucket.try_consume() {
            RateLimitResult::Allowed {
                remaining: bucket.remaining(),
                reset_in: self.config.window_duration(),
            }
        } else {
            let retry_after = bucket.time_until_available();
            debug!(%ip, ?retry_after, "IP rate limit exceeded");
            RateLimitResult::Limited { retry_after }
        }
    }

    /// Clean up stale buckets (should be called periodically).
    pub async fn cleanup(&self) {
        let now = Instant::now();
        let stale_threshold = Duration::from_secs(300); // 5 minutes

        let mut buckets = self.buckets.write().await;
        buckets.retain(|_, bucket| now.duration_since(bucket.last_refill) < stale_threshold);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn config(max: u32) -> RateLimitConfig {
        RateLimitConfig { max_per_window: max, window_secs: 60 }
    }

    #[tokio::test]
    async fn test_ip_rate_limiting() {
        let limiter = RateLimiter::new(config(5));
        let ip = IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1));

        // First 5 requests should succeed
        for _ in 0..5 {
            match limiter.check_ip(ip).await {
                RateLimitResult::Allowed { .. } => {}
                RateLimitResult::Limited { .. } => panic!("Should not be limited"),
            }
        }

        // 6th request should be limited
        match limiter.check_ip(ip).await {
            RateLimitResult::Limited { retry_after } => {
                assert!(retry_after > Duration::ZERO);
            }
            RateLimitResult::Allowed { .. } => panic!("Should be limited"),
        }
    }

    #[tokio::test]
    async fn test_ips_limited_independently() {
        let limiter = RateLimiter::new(config(1));
        let first = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
        let second = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));

        assert!(matches!(limiter.check_ip(first).await, RateLimitResult::Allowed { .. }));
        assert!(matches!(limiter.check_ip(first).await, RateLimitResult::Limited { .. }));

        // A different IP is unaffected
        assert!(matches!(limiter.check_ip(second).await, RateLimitResult::Allowed { .. }));
    }

    #[tokio::test]
    async fn test_remaining_counts_down() {
        let limiter = RateLimiter::new(config(3));
        let ip = IpAddr::V4(Ipv4Addr::new(10, 1, 0, 1));

        match limiter.check_ip(ip).await {
            RateLimitResult::Allowed { remaining, .. } => assert_eq!(remaining, 2),
            _ => panic!("Should be allowed"),
        }
        match limiter.check_ip(ip).await {
            RateLimitResult::Allowed { remaining, .. } => assert_eq!(remaining, 1),
            _ => panic!("Should be allowed"),
        }
    }

    #[tokio::test]
    async fn test_zero_capacity_limits_every_request() {
        let limiter = RateLimiter::new(RateLimitConfig { max_per_window: 0, window_secs: 60 });
        let ip = IpAddr::V4(Ipv4Addr::new(10, 3, 0, 1));

        for _ in 0..3 {
            match limiter.check_ip(ip).await {
                RateLimitResult::Limited { retry_after } => {
                    assert_eq!(retry_after, Duration::from_secs(60));
                }
                RateLimitResult::Allowed { .. } => panic!("Should be limited"),
            }
        }
    }

    #[tokio::test]
    async fn test_cleanup_evicts_nothing_fresh() {
        let limiter = RateLimiter::new(config(5));
        let ip = IpAddr::V4(Ipv4Addr::new(10, 2, 0, 1));

        limiter.check_ip(ip).await;
        limiter.cleanup().await;

        // Fresh bucket should survive cleanup and keep counting
        match limiter.check_ip(ip).await {
            RateLimitResult::Allowed { remaining, .. } => assert_eq!(remaining, 3),
            _ => panic!("Should be allowed"),
        }
    }
}
