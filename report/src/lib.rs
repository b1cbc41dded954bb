//! Result collection for pacebench runs
//!
//! [`Report`] is the workload the command line drives: it runs a
//! [`pacebench_core::Probe`] once per token, records latency, status codes
//! and bytes, and renders a [`ReportSummary`] once the run has drained.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod collector;
mod summary;

pub use collector::Report;
pub use summary::ReportSummary;
