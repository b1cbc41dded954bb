//! Orchestrator for run lifecycle management
//!
//! The Orchestrator coordinates one complete run:
//! - Allocating the token channel and starting the producer
//! - Inserting the rate limiter when a rate is configured
//! - Spawning the worker pool
//! - Racing natural completion against cancellation (Ctrl+C or a caller token)
//! - Stopping and draining the workload exactly once
//!
//! # Example
//!
//! ```ignore
//! use pacebench_core::OrchestratorBuilder;
//!
//! let mut orchestrator = OrchestratorBuilder::new()
//!     .concurrent(10)
//!     .number(1000)
//!     .workload(workload)
//!     .build()?;
//!
//! let termination = orchestrator.run_with_signal_handling().await;
//! ```

mod aggregator;
mod builder;
mod executor;

pub use aggregator::{aggregate_worker_stats, AggregatedStats};
pub use builder::OrchestratorBuilder;
pub use executor::{Orchestrator, RunState, Termination};
