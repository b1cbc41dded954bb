//! Core traits for workloads and probes
//!
//! These traits are defined in core so the scheduler can drive any workload
//! and the report collector can drive any probe. Implementations live in
//! their own crates (report/, probes/).

use std::time::Duration;

use async_trait::async_trait;

use crate::channel::TokenStream;

// ============================================================================
// Workload Trait
// ============================================================================

/// The unit of work the scheduler drives
///
/// The orchestrator calls `setup` once, hands the token stream to `consume`
/// once per worker, and on shutdown calls `stop` then `drain`, each exactly
/// once, whatever ended the run.
#[async_trait]
pub trait Workload: Send + Sync {
    /// Workload identifier for logs
    fn name(&self) -> &str {
        "workload"
    }

    /// One-time warm-up before any token flows (connection pools etc.)
    async fn setup(&self) {}

    /// Perform one unit of work per received token
    ///
    /// Must keep receiving until the stream closes or a stop has been
    /// requested. Called concurrently from every worker over clones of the
    /// same stream.
    async fn consume(&self, tokens: TokenStream);

    /// Ask outstanding units to wind down. Must not block.
    fn stop(&self);

    /// Wait until every unit started during the run has finished and any
    /// aggregated results are safe to read
    async fn drain(&self);
}

// ============================================================================
// Probe Trait
// ============================================================================

/// One unit of work against a target
///
/// Used by the report collector; a probe is shared by every worker, so it
/// must be safe to call concurrently.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Probe identifier (e.g. "GET http://127.0.0.1:8080/")
    fn name(&self) -> &str;

    /// Perform the unit of work once
    async fn probe(&self) -> Result<ProbeOutcome, ProbeError>;
}

/// What a successful probe observed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProbeOutcome {
    /// Status code reported by the target, if it has one
    pub status: Option<u16>,

    /// Payload bytes received
    pub bytes: u64,
}

impl ProbeOutcome {
    /// Outcome with a status code
    pub fn with_status(status: u16, bytes: u64) -> Self {
        Self {
            status: Some(status),
            bytes,
        }
    }
}

/// Probe-specific errors
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// Connection or protocol failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Target answered with a failure status
    #[error("target returned status {status}")]
    Status {
        /// Status code
        status: u16,
        /// Payload bytes received
        bytes: u64,
    },

    /// Unit of work timed out
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// Anything else
    #[error("{0}")]
    Other(String),
}

impl ProbeError {
    /// Status code carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ProbeError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
