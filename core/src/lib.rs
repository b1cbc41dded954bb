//! pacebench-core: token scheduling for load generation
//!
//! This crate drives a pluggable [`Workload`] from a configurable number of
//! parallel workers, bounded by a count, a duration, or unbounded, optionally
//! paced to a fixed rate:
//!
//! - Token channel and shared [`TokenStream`]
//! - [`Producer`] emitting tokens per [`Bound`]
//! - [`RateLimiter`] re-pacing the stream
//! - [`WorkerPool`] calling the workload once per worker
//! - [`Orchestrator`] owning the run lifecycle and shutdown ordering
//! - Latency histogram and per-worker stats for workloads that report
//!
//! # Example
//!
//! ```ignore
//! use pacebench_core::{OrchestratorBuilder, Termination};
//!
//! let mut orchestrator = OrchestratorBuilder::new()
//!     .concurrent(4)
//!     .duration(Duration::from_secs(10))
//!     .rate(50)
//!     .workload(workload)
//!     .build()?;
//!
//! if orchestrator.run_with_signal_handling().await == Termination::Interrupted {
//!     tracing::warn!("run interrupted");
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod channel;
pub mod config;
pub mod error;
pub mod metrics;
pub mod orchestrator;
pub mod producer;
pub mod traits;
pub mod worker;

pub use channel::{ChannelConfig, Token, TokenReceiver, TokenSender, TokenStream};
pub use config::{Bound, RunConfig};
pub use error::*;
pub use metrics::*;
pub use orchestrator::{
    aggregate_worker_stats, AggregatedStats, Orchestrator, OrchestratorBuilder, RunState,
    Termination,
};
pub use producer::Producer;
pub use traits::*;
pub use worker::{RateLimiter, WorkerPool, WorkerStats};

pub use tokio_util::sync::CancellationToken;
