//! Per-worker request throttling.

use std::time::Duration;

use rand::Rng;
use tokio::time::sleep;

/// Fixed delay applied by each fetch worker before every request.
///
/// This bounds one worker's request rate only. With `n` workers up to `n`
/// requests may start at nearly the same instant; it is not a global token
/// bucket.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateLimiter {
    interval: Duration,
    jitter: Duration,
}

impl RateLimiter {
    /// Limiter with a fixed interval and no jitter.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            jitter: Duration::ZERO,
        }
    }

    /// Add up to `jitter` of extra random delay to every wait.
    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    /// Limiter that never waits.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Delay of the next wait.
    fn next_delay(&self) -> Duration {
        if self.jitter.is_zero() {
            return self.interval;
        }
        let max = self.jitter.as_millis() as u64;
        let extra = rand::thread_rng().gen_range(0..=max);
        self.interval + Duration::from_millis(extra)
    }

    /// Block the calling worker for the configured interval.
    pub async fn wait(&self) {
        let delay = self.next_delay();
        if !delay.is_zero() {
            sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_wait_sleeps_for_interval() {
        let limiter = RateLimiter::new(Duration::from_millis(30));
        let start = Instant::now();
        limiter.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[tokio::test]
    async fn test_disabled_returns_immediately() {
        let limiter = RateLimiter::disabled();
        let start = Instant::now();
        limiter.wait().await;
        assert!(start.elapsed() < Duration::from_millis(20));
    }

    #[test]
    fn test_jitter_bounds() {
        let limiter =
            RateLimiter::new(Duration::from_millis(100)).with_jitter(Duration::from_millis(50));
        for _ in 0..50 {
            let delay = limiter.next_delay();
            assert!(delay >= Duration::from_millis(100));
            assert!(delay <= Duration::from_millis(150));
        }
    }
}
