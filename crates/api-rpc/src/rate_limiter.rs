//! Rate Limiter (Token Bucket)
//!
//! Bounds how fast clients can write logs. One bucket is shared by all
//! write methods; reads are not limited.

use std::time::Instant;
use tokio::sync::Mutex;

/// Token bucket rate limiter
pub struct RateLimiter {
    bucket: Mutex<Bucket>,
    capacity: f64,
    refill_per_sec: f64,
}

struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

impl RateLimiter {
    /// Create a new rate limiter
    ///
    /// # Arguments
    /// * `burst` - Maximum number of requests accepted at once
    /// * `refill_per_sec` - Tokens added back per second
    pub fn new(burst: u32, refill_per_sec: u32) -> Self {
        Self {
            bucket: Mutex::new(Bucket {
                tokens: burst as f64,
                last_refill: Instant::now(),
            }),
            capacity: burst as f64,
            refill_per_sec: refill_per_sec as f64,
        }
    }

    /// Take one token; returns false if the caller is over the limit
    pub async fn check(&self) -> bool {
        let mut bucket = self.bucket.lock().await;

        let now = Instant::now();
        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.refill_per_sec).min(self.capacity);
        bucket.last_refill = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::time::{sleep, Duration};

    #[tokio::test]
    async fn test_allows_burst_then_denies() {
        let limiter = RateLimiter::new(10, 1);

        for _ in 0..10 {
            assert!(limiter.check().await);
        }
        assert!(!limiter.check().await);
    }

    #[tokio::test]
    async fn test_refills_over_time() {
        let limiter = RateLimiter::new(2, 20); // one token every 50ms

        assert!(limiter.check().await);
        assert!(limiter.check().await);
        assert!(!limiter.check().await);

        sleep(Duration::from_millis(200)).await;

        assert!(limiter.check().await);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_bucket() {
        let limiter = Arc::new(RateLimiter::new(50, 1));

        let mut handles = vec![];
        for _ in 0..5 {
            let limiter = Arc::clone(&limiter);
            handles.push(tokio::spawn(async move {
                let mut allowed = 0;
                for _ in 0..20 {
                    if limiter.check().await {
                        allowed += 1;
                    }
                }
                allowed
            }));
        }

        let mut total_allowed = 0;
        for handle in handles {
            total_allowed += handle.await.unwrap();
        }

        // 100 attempts against a burst of 50 with a near-zero refill rate
        assert!(
            (50..=51).contains(&total_allowed),
            "Expected about 50 allowed, got {}",
            total_allowed
        );
    }
}
