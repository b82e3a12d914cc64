// # Rate Limiter Implementations
//
// - `TokenBucketRateLimiter`: governor-backed token bucket shared by all
//   remote calls of one or more handlers
// - `Unlimited`: admits every call immediately (tests, local fakes)

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota};
use std::num::NonZeroU32;
use std::sync::Arc;

use crate::config::RateLimitConfig;
use crate::traits::RateLimiter;

/// Token bucket limiter
///
/// Waiting callers are admitted in the order the bucket refills. The
/// limiter is cheap to share behind an `Arc`.
#[derive(Debug)]
pub struct TokenBucketRateLimiter {
    limiter: DefaultDirectRateLimiter,
}

impl TokenBucketRateLimiter {
    /// Create a limiter admitting `requests_per_second` with bursts up to `burst`
    pub fn new(requests_per_second: NonZeroU32, burst: NonZeroU32) -> Self {
        let quota = Quota::per_second(requests_per_second).allow_burst(burst);
        Self {
            limiter: DefaultDirectRateLimiter::direct(quota),
        }
    }
}

#[async_trait]
impl RateLimiter for TokenBucketRateLimiter {
    async fn accept(&self) {
        self.limiter.until_ready().await;
    }
}

/// Limiter that never waits
#[derive(Debug, Clone, Copy, Default)]
pub struct Unlimited;

#[async_trait]
impl RateLimiter for Unlimited {
    async fn accept(&self) {}
}

/// Build a limiter from configuration
///
/// A disabled or zero-valued configuration yields [`Unlimited`].
pub fn from_config(config: &RateLimitConfig) -> Arc<dyn RateLimiter> {
    if !config.enabled {
        return Arc::new(Unlimited);
    }
    match (
        NonZeroU32::new(config.requests_per_second),
        NonZeroU32::new(config.burst),
    ) {
        (Some(rate), Some(burst)) => Arc::new(TokenBucketRateLimiter::new(rate, burst)),
        _ => {
            tracing::warn!("Rate limit configured with zero rate or burst, admission control disabled");
            Arc::new(Unlimited)
        }
    }
}
