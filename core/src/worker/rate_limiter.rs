//! Rate limiting for token delivery

use std::time::Duration;

use flume::TryRecvError;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

use crate::channel::{Token, TokenReceiver, TokenSender};

/// Paces a token stream to a fixed frequency
///
/// Each forward is scheduled at `begin + count * interval` rather than
/// relative to the previous one, so scheduling jitter does not accumulate.
/// The schedule, not the upstream volume, decides how many tokens go out:
/// upstream tokens beyond the schedule are left behind, and a missing
/// upstream token does not hold a slot back. The paced stream closes only
/// when upstream closes.
pub struct RateLimiter {
    interval: Duration,
}

impl RateLimiter {
    /// Create a rate limiter
    ///
    /// # Arguments
    /// * `rate` - tokens per second. Zero disables rate limiting.
    ///
    /// # Examples
    /// ```
    /// use pacebench_core::worker::RateLimiter;
    /// use std::time::Duration;
    ///
    /// let limiter = RateLimiter::new(100).unwrap();
    /// assert_eq!(limiter.interval(), Duration::from_millis(10));
    ///
    /// assert!(RateLimiter::new(0).is_none());
    /// ```
    pub fn new(rate: u32) -> Option<Self> {
        if rate == 0 {
            return None;
        }
        Self::with_interval(Duration::from_secs(1) / rate)
    }

    /// Create a rate limiter from an explicit interval; `None` if zero
    pub fn with_interval(interval: Duration) -> Option<Self> {
        (!interval.is_zero()).then_some(Self { interval })
    }

    /// Minimum spacing between forwarded tokens
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start pacing in a background task
    pub fn spawn(
        self,
        upstream: TokenReceiver,
        paced: TokenSender,
        shutdown: CancellationToken,
    ) -> JoinHandle<u64> {
        tokio::spawn(self.run(upstream, paced, shutdown))
    }

    /// Forward tokens on schedule until upstream closes. Returns the number
    /// forwarded. Dropping `paced` on return closes the paced channel.
    pub async fn run(
        self,
        upstream: TokenReceiver,
        paced: TokenSender,
        shutdown: CancellationToken,
    ) -> u64 {
        let begin = Instant::now();
        let mut count: u64 = 0;

        tracing::debug!(interval = ?self.interval, "Rate limiter started");

        loop {
            let target = begin + self.offset(count);
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => break,
                _ = sleep_until(target) => {}
            }

            match upstream.try_recv() {
                Ok(Token) | Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => break,
            }

            tokio::select! {
                biased;

                _ = shutdown.cancelled() => break,
                res = paced.send_async(Token) => {
                    if res.is_err() {
                        break;
                    }
                }
            }

            count += 1;
        }

        tracing::debug!(forwarded = count, "Rate limiter finished");
        count
    }

    fn offset(&self, count: u64) -> Duration {
        let nanos = u64::try_from(self.interval.as_nanos()).unwrap_or(u64::MAX);
        Duration::from_nanos(nanos.saturating_mul(count))
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("interval", &self.interval)
            .finish()
    }
}
