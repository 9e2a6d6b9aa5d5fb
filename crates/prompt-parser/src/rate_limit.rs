//! External-call pacing

use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard};
use tokio::time::{sleep, Instant};
use tracing::debug;

/// Serializes external calls and enforces a minimum spacing between them.
///
/// `acquire` returns a permit that holds the internal lock, so concurrent
/// callers queue up behind the one in flight; the interval is stamped at
/// acquire time.
pub struct RateLimiter {
    min_interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last: Mutex::new(None),
        }
    }

    pub async fn acquire(&self) -> RateLimitPermit<'_> {
        let mut last = self.last.lock().await;
        if let Some(previous) = *last {
            let since = previous.elapsed();
            if since < self.min_interval {
                let pause = self.min_interval - since;
                debug!(?pause, "pacing external call");
                sleep(pause).await;
            }
        }
        *last = Some(Instant::now());
        RateLimitPermit { _guard: last }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

/// Held for the duration of the paced call.
pub struct RateLimitPermit<'a> {
    _guard: MutexGuard<'a, Option<Instant>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn back_to_back_acquires_are_spaced_out() {
        let limiter = RateLimiter::default();
        let start = Instant::now();

        drop(limiter.acquire().await);
        drop(limiter.acquire().await);
        drop(limiter.acquire().await);

        assert!(start.elapsed() >= Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn spacing_counts_from_acquire_time() {
        let limiter = RateLimiter::default();

        drop(limiter.acquire().await);
        sleep(Duration::from_secs(3)).await;

        let start = Instant::now();
        drop(limiter.acquire().await);
        // The interval already elapsed while we slept.
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn permit_holder_blocks_other_callers() {
        use std::sync::Arc;

        let limiter = Arc::new(RateLimiter::new(Duration::ZERO));
        let permit = limiter.acquire().await;

        let contender = {
            let limiter = limiter.clone();
            tokio::spawn(async move {
                let _permit = limiter.acquire().await;
            })
        };
        tokio::task::yield_now().await;
        assert!(!contender.is_finished());

        drop(permit);
        contender.await.unwrap();
    }
}
