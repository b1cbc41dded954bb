//! Worker pool and rate limiting
//!
//! Workers here are thin: each one hands the shared
//! [`TokenStream`](crate::channel::TokenStream) to the workload once and
//! returns when the workload does. The per-token loop belongs to the
//! [`Workload`](crate::traits::Workload).
//!
//! The [`RateLimiter`] sits between the producer and the pool when a rate is
//! configured and re-paces the token stream to a fixed frequency.
//!
//! # Example
//!
//! ```ignore
//! use pacebench_core::worker::WorkerPool;
//!
//! let pool = WorkerPool::spawn(8, workload, tokens);
//! pool.drained().await;
//! assert_eq!(pool.outstanding(), 0);
//! ```

mod executor;
mod rate_limiter;
mod stats;

pub use executor::WorkerPool;
pub use rate_limiter::RateLimiter;
pub use stats::WorkerStats;

#[cfg(test)]
mod tests;
