//! Rate Limiter implementation using token bucket algorithm
//!
//! Blocking variant for the synchronous exchange client: callers sleep on
//! the current thread until a permit is available.

use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

/// Configuration for the rate limiter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimiterConfig {
    /// Maximum requests allowed per refill interval
    pub max_requests_per_second: usize,
    /// Refill interval for tokens
    pub refill_interval: Duration,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        // Binance weight budget allows ~20 light requests per second
        Self {
            max_requests_per_second: 20,
            refill_interval: Duration::from_secs(1),
        }
    }
}

impl RateLimiterConfig {
    /// Set the number of requests per refill interval
    pub fn with_rate(mut self, requests_per_second: usize) -> Self {
        self.max_requests_per_second = requests_per_second.max(1);
        self
    }
}

#[derive(Debug)]
struct Bucket {
    available: usize,
    last_refill: Instant,
}

/// Rate limiter using token bucket algorithm
///
/// # Example
///
/// ```
/// use binance_wallet_manager::common::{RateLimiter, RateLimiterConfig};
///
/// let limiter = RateLimiter::new(RateLimiterConfig::default().with_rate(5));
///
/// // Acquire a permit before making a request
/// limiter.acquire();
/// ```
#[derive(Debug, Clone)]
pub struct RateLimiter {
    bucket: Arc<Mutex<Bucket>>,
    max_permits: usize,
    refill_interval: Duration,
}

impl RateLimiter {
    pub fn new(config: RateLimiterConfig) -> Self {
        let max_permits = config.max_requests_per_second.max(1);
        Self {
            bucket: Arc::new(Mutex::new(Bucket {
                available: max_permits,
                last_refill: Instant::now(),
            })),
            max_permits,
            refill_interval: config.refill_interval,
        }
    }

    /// Block until a permit is available, then consume it.
    pub fn acquire(&self) {
        loop {
            let wait = {
                let mut bucket = self.lock();
                self.refill(&mut bucket);
                if bucket.available > 0 {
                    bucket.available -= 1;
                    return;
                }
                self.refill_interval
                    .saturating_sub(bucket.last_refill.elapsed())
            };
            tracing::debug!("Rate limit reached, waiting {}ms", wait.as_millis());
            thread::sleep(wait.max(Duration::from_millis(1)));
        }
    }

    fn lock(&self) -> MutexGuard<'_, Bucket> {
        // A panic while holding the lock cannot leave the counters invalid
        self.bucket.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn refill(&self, bucket: &mut Bucket) {
        let elapsed = bucket.last_refill.elapsed();
        if elapsed < self.refill_interval {
            return;
        }

        let interval_ms = self.refill_interval.as_millis().max(1);
        let intervals = (elapsed.as_millis() / interval_ms) as usize;
        let to_add = intervals.saturating_mul(self.max_permits);

        bucket.available = bucket.available.saturating_add(to_add).min(self.max_permits);
        bucket.last_refill = Instant::now();
    }
}
