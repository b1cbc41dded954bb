//! Orchestrator execution logic

use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::channel::{token_channel, ChannelConfig, TokenReceiver, TokenSender, TokenStream};
use crate::config::RunConfig;
use crate::producer::Producer;
use crate::traits::Workload;
use crate::worker::{RateLimiter, WorkerPool};

/// Lifecycle of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Constructed, nothing allocated
    Created,
    /// Defaults resolved and token channel allocated
    Initialized,
    /// Workers consuming tokens
    Running,
    /// Workload told to stop, waiting for it to drain
    Draining,
    /// Run finished; the orchestrator cannot run again
    Terminated,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The token source was exhausted and every worker returned
    Completed,
    /// The run was cancelled from outside (Ctrl+C or a caller token)
    Interrupted,
}

/// Orchestrator manages the run lifecycle
///
/// Responsible for allocating the token channel, starting the producer and
/// optional rate limiter, spawning the worker pool, and shutting the workload
/// down exactly once.
pub struct Orchestrator {
    /// Run configuration, defaults resolved at initialization
    pub(crate) config: RunConfig,

    /// Workload shared by every worker
    pub(crate) workload: Arc<dyn Workload>,

    /// Channel buffer sizes
    pub(crate) channel_config: ChannelConfig,

    state: RunState,
}

/// Token source started for one run
pub(super) struct Source {
    tokens: TokenStream,
    producer: Option<JoinHandle<u64>>,
    limiter: Option<JoinHandle<u64>>,
}

impl Orchestrator {
    /// Create a new orchestrator
    ///
    /// Use `OrchestratorBuilder` for a more ergonomic construction.
    pub fn new(config: RunConfig, workload: Arc<dyn Workload>) -> Self {
        Self {
            config,
            workload,
            channel_config: ChannelConfig::default(),
            state: RunState::Created,
        }
    }

    /// Get the run configuration
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Current lifecycle state
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Run until the token source is exhausted or Ctrl+C arrives
    ///
    /// The signal listener lives only for this call.
    pub async fn run_with_signal_handling(&mut self) -> Termination {
        let cancel = CancellationToken::new();

        let signal_handle = tokio::spawn({
            let cancel = cancel.clone();
            async move {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => {
                        tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
                        cancel.cancel();
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                    }
                }
            }
        });

        let termination = self.run_until(cancel).await;

        signal_handle.abort();

        termination
    }

    /// Run until the token source is exhausted or `cancel` fires
    ///
    /// Whatever ends the run, the workload sees exactly one `stop` followed
    /// by exactly one `drain`, and every `consume` call has returned before
    /// this does.
    ///
    /// # Panics
    ///
    /// Panics if this orchestrator has already run.
    pub async fn run_until(&mut self, cancel: CancellationToken) -> Termination {
        let start = Instant::now();
        let (tx, rx) = self.initialize();

        self.workload.setup().await;

        // stop hook for the producer and rate limiter; cancelled on shutdown
        let shutdown = cancel.child_token();
        let source = self.start_source(tx, rx, shutdown.clone());

        self.transition(RunState::Initialized, RunState::Running);
        let pool = WorkerPool::spawn(
            self.config.concurrency(),
            Arc::clone(&self.workload),
            source.tokens,
        );

        tracing::info!(
            concurrency = pool.size(),
            bound = ?self.config.bound(),
            rate = self.config.rate,
            workload = self.workload.name(),
            "Starting run"
        );

        let termination = tokio::select! {
            _ = cancel.cancelled() => Termination::Interrupted,
            _ = pool.drained() => Termination::Completed,
        };

        self.transition(RunState::Running, RunState::Draining);
        tracing::info!(
            ?termination,
            outstanding = pool.outstanding(),
            "Stopping workload"
        );
        shutdown.cancel();
        self.workload.stop();
        self.workload.drain().await;

        // workers not yet polled when the interrupt won still have to return
        pool.drained().await;

        let produced = join_source_task(source.producer).await;
        let forwarded = join_source_task(source.limiter).await;

        self.transition(RunState::Draining, RunState::Terminated);
        tracing::info!(
            elapsed_secs = start.elapsed().as_secs_f64(),
            ?produced,
            ?forwarded,
            ?termination,
            "Run finished"
        );

        termination
    }

    /// Created -> Initialized: resolve defaults and allocate the token channel
    fn initialize(&mut self) -> (TokenSender, TokenReceiver) {
        self.transition(RunState::Created, RunState::Initialized);
        self.config = self.config.resolved();
        token_channel(self.channel_config.token_buffer)
    }

    /// Start the producer and, when a rate is set, the rate limiter behind it
    pub(super) fn start_source(
        &self,
        tx: TokenSender,
        rx: TokenReceiver,
        shutdown: CancellationToken,
    ) -> Source {
        assert_eq!(
            self.state,
            RunState::Initialized,
            "token source started before the orchestrator was initialized"
        );

        let producer = Producer::new(self.config.bound(), tx, shutdown.clone()).spawn();

        match self.config.interval().and_then(RateLimiter::with_interval) {
            Some(limiter) => {
                let (paced_tx, paced_rx) = token_channel(self.channel_config.paced_buffer);
                Source {
                    tokens: TokenStream::new(paced_rx),
                    producer,
                    limiter: Some(limiter.spawn(rx, paced_tx, shutdown)),
                }
            }
            None => Source {
                tokens: TokenStream::new(rx),
                producer,
                limiter: None,
            },
        }
    }

    fn transition(&mut self, from: RunState, to: RunState) {
        assert_eq!(
            self.state, from,
            "invalid run state transition to {to:?}: orchestrator is {:?}, expected {from:?}",
            self.state
        );
        tracing::trace!(?from, ?to, "Run state transition");
        self.state = to;
    }
}

/// Await a token source task; `None` if it was never spawned or panicked
async fn join_source_task(handle: Option<JoinHandle<u64>>) -> Option<u64> {
    let handle = handle?;
    match handle.await {
        Ok(n) => Some(n),
        Err(e) => {
            tracing::error!(error = %e, "Token source task panicked");
            None
        }
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("config", &self.config)
            .field("workload", &self.workload.name())
            .field("state", &self.state)
            .finish()
    }
}
