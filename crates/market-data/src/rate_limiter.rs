//! Token bucket rate limiter for a single market data provider.
//!
//! Each provider owns one limiter built from its [`RateLimit`]. Enrichment
//! tasks run concurrently and unordered, so the bucket is the only thing that
//! keeps a burst of new symbols from hammering the upstream API.

use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::provider::RateLimit;

#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    last_update: Instant,
    /// Tokens per second.
    rate: f64,
    capacity: f64,
}

impl TokenBucket {
    fn new(requests_per_minute: u32, capacity: f64) -> Self {
        Self {
            tokens: capacity,
            last_update: Instant::now(),
            rate: requests_per_minute as f64 / 60.0,
            capacity,
        }
    }

    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.rate).min(self.capacity);
        self.last_update = now;
    }

    fn try_acquire(&mut self) -> bool {
        self.refill();
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    fn time_until_available(&mut self) -> Duration {
        self.refill();
        if self.tokens >= 1.0 || self.rate <= 0.0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64((1.0 - self.tokens) / self.rate)
        }
    }
}

/// Thread-safe token bucket shared by all requests to one provider.
pub struct RateLimiter {
    provider: &'static str,
    bucket: Mutex<TokenBucket>,
    min_delay: Duration,
}

impl RateLimiter {
    pub fn new(provider: &'static str, limit: &RateLimit) -> Self {
        Self {
            provider,
            bucket: Mutex::new(TokenBucket::new(
                limit.requests_per_minute,
                limit.burst_capacity.max(1) as f64,
            )),
            min_delay: limit.min_delay,
        }
    }

    /// Recovering from a poisoned lock only risks a slightly wrong token count.
    fn lock_bucket(&self) -> MutexGuard<'_, TokenBucket> {
        self.bucket.lock().unwrap_or_else(|poisoned| {
            warn!("Rate limiter mutex for '{}' was poisoned, recovering", self.provider);
            poisoned.into_inner()
        })
    }

    /// Waits until a token is available, then consumes it.
    pub async fn acquire(&self) {
        loop {
            let wait_time = {
                let mut bucket = self.lock_bucket();
                if bucket.try_acquire() {
                    return;
                }
                bucket.time_until_available().max(self.min_delay)
            };

            debug!(
                "Rate limiter: waiting {:?} for provider '{}'",
                wait_time, self.provider
            );
            tokio::time::sleep(wait_time).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limit(requests_per_minute: u32, burst_capacity: u32) -> RateLimit {
        RateLimit {
            requests_per_minute,
            burst_capacity,
            min_delay: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_bucket_allows_burst_then_blocks() {
        let mut bucket = TokenBucket::new(60, 3.0);

        assert!(bucket.try_acquire());
        assert!(bucket.try_acquire());
        assert!(bucket.try_acquire());
        assert!(!bucket.try_acquire());
        assert!(bucket.time_until_available() > Duration::ZERO);
    }

    #[test]
    fn test_bucket_refills_over_time() {
        let mut bucket = TokenBucket::new(60, 1.0);
        assert!(bucket.try_acquire());
        assert!(!bucket.try_acquire());

        bucket.last_update = Instant::now() - Duration::from_secs(2);
        assert!(bucket.try_acquire());
    }

    #[test]
    fn test_refill_is_capped_at_capacity() {
        let mut bucket = TokenBucket::new(60, 5.0);
        bucket.tokens = 3.0;
        bucket.last_update = Instant::now() - Duration::from_secs(3600);

        bucket.refill();
        assert_eq!(bucket.tokens, 5.0);
    }

    #[tokio::test]
    async fn test_zero_burst_capacity_still_admits_one_request() {
        let limiter = RateLimiter::new("TEST", &limit(60, 0));
        tokio::time::timeout(Duration::from_secs(1), limiter.acquire())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_acquire_waits_for_refill() {
        // 100 tokens per second, burst of 1
        let limiter = RateLimiter::new("TEST", &limit(6000, 1));

        limiter.acquire().await;
        let start = Instant::now();
        limiter.acquire().await;

        assert!(start.elapsed() >= Duration::from_millis(5));
    }
}
