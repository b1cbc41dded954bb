//! Token producer
//!
//! Emits tokens according to a [`Bound`] and closes the channel when the
//! bound is exhausted. The channel is closed by dropping the sender, which
//! the producer owns, so every exit path closes it exactly once.

use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

use crate::channel::{Token, TokenSender};
use crate::config::Bound;

/// Token source driven by a [`Bound`]
#[derive(Debug)]
pub struct Producer {
    bound: Bound,
    tx: TokenSender,
    shutdown: CancellationToken,
}

impl Producer {
    /// Create a producer over the sending half of a token channel
    ///
    /// `shutdown` is the explicit stop hook; it is the only thing that ends
    /// [`Bound::Unbounded`] emission.
    pub fn new(bound: Bound, tx: TokenSender, shutdown: CancellationToken) -> Self {
        Self {
            bound,
            tx,
            shutdown,
        }
    }

    /// Start emitting in a background task
    ///
    /// `Count(0)` closes the channel before returning, without spawning, so
    /// downstream stages never observe it open.
    pub fn spawn(self) -> Option<JoinHandle<u64>> {
        if self.bound == Bound::Count(0) {
            tracing::debug!("No work requested, closing token channel");
            return None;
        }
        Some(tokio::spawn(self.run()))
    }

    /// Emit tokens until the bound is exhausted, then close the channel.
    ///
    /// Returns how many tokens were sent.
    pub async fn run(self) -> u64 {
        let sent = match self.bound {
            Bound::Duration(duration) => self.until(Instant::now() + duration).await,
            Bound::Count(n) => self.count(n).await,
            Bound::Unbounded => self.forever().await,
        };
        tracing::debug!(tokens = sent, "Producer finished");
        sent
    }

    async fn until(&self, deadline: Instant) -> u64 {
        let mut sent = 0;
        loop {
            tokio::select! {
                biased;

                _ = sleep_until(deadline) => break,
                _ = self.shutdown.cancelled() => break,
                res = self.tx.send_async(Token) => {
                    if res.is_err() {
                        break;
                    }
                    sent += 1;
                }
            }
        }
        sent
    }

    async fn count(&self, n: u64) -> u64 {
        let mut sent = 0;
        while sent < n {
            if !self.send_one().await {
                break;
            }
            sent += 1;
        }
        sent
    }

    async fn forever(&self) -> u64 {
        let mut sent = 0;
        while self.send_one().await {
            sent += 1;
        }
        sent
    }

    /// Blocking send that gives up on shutdown or when every receiver is gone
    async fn send_one(&self) -> bool {
        tokio::select! {
            biased;

            _ = self.shutdown.cancelled() => false,
            res = self.tx.send_async(Token) => res.is_ok(),
        }
    }
}
