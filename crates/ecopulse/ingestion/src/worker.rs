//! Ingestion worker
//!
//! The worker is the only writer of the history store. It runs a
//! connect/listen loop, publishing its [`WorkerState`] so the query surface
//! can report it, and stops promptly once the shutdown flag is raised.

use crate::error::SourceError;
use crate::message::parse_reading;
use crate::source::{EventSource, SourceConnector};
use ecopulse_analytics::{enrich, EnrichmentContext, VOLATILITY_WINDOW};
use ecopulse_history::HistoryWriter;
use ecopulse_types::ThresholdTable;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Worker behaviour settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionConfig {
    /// Upper bound on a single poll; also bounds shutdown latency
    #[serde(default = "default_poll_timeout_ms")]
    pub poll_timeout_ms: u64,

    /// Reconnect after terminal errors. Without it the worker faults.
    #[serde(default)]
    pub reconnect: Option<ReconnectPolicy>,
}

fn default_poll_timeout_ms() -> u64 {
    1_000
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            poll_timeout_ms: default_poll_timeout_ms(),
            reconnect: None,
        }
    }
}

impl IngestionConfig {
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms.max(1))
    }
}

/// Exponential backoff between reconnect attempts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconnectPolicy {
    /// Consecutive failed attempts tolerated before faulting
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

fn default_max_attempts() -> u32 {
    5
}

fn default_initial_backoff_ms() -> u64 {
    500
}

fn default_max_backoff_ms() -> u64 {
    30_000
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

impl ReconnectPolicy {
    /// Delay before attempt number `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(20);
        let delay = self.initial_backoff_ms.saturating_mul(1u64 << shift);
        Duration::from_millis(delay.min(self.max_backoff_ms))
    }
}

/// Lifecycle of the worker as observed by readers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WorkerState {
    Connecting,
    Listening,
    /// Ingestion stopped on an error; history stays readable
    Faulted { reason: String },
    Stopped,
}

impl WorkerState {
    pub fn is_finished(&self) -> bool {
        matches!(self, WorkerState::Faulted { .. } | WorkerState::Stopped)
    }
}

#[derive(Debug, Default)]
struct IngestionStats {
    ingested: AtomicU64,
    dropped: AtomicU64,
    transport_errors: AtomicU64,
    reconnects: AtomicU64,
}

/// Point-in-time copy of the worker counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct IngestionCounters {
    pub ingested: u64,
    pub dropped: u64,
    pub transport_errors: u64,
    pub reconnects: u64,
}

/// Read-only view of a running worker.
#[derive(Debug, Clone)]
pub struct WorkerHandle {
    source: String,
    state: watch::Receiver<WorkerState>,
    stats: Arc<IngestionStats>,
}

impl WorkerHandle {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn state(&self) -> WorkerState {
        self.state.borrow().clone()
    }

    pub fn counters(&self) -> IngestionCounters {
        IngestionCounters {
            ingested: self.stats.ingested.load(Ordering::Relaxed),
            dropped: self.stats.dropped.load(Ordering::Relaxed),
            transport_errors: self.stats.transport_errors.load(Ordering::Relaxed),
            reconnects: self.stats.reconnects.load(Ordering::Relaxed),
        }
    }

    /// Wait until the worker reaches `wanted`, or finishes in another state.
    pub async fn wait_until(&mut self, wanted: impl Fn(&WorkerState) -> bool) -> WorkerState {
        let reached = self
            .state
            .wait_for(|state| wanted(state) || state.is_finished())
            .await
            .map(|state| state.clone());
        reached.unwrap_or_else(|_| self.state())
    }
}

enum ListenOutcome {
    Shutdown,
    Lost(SourceError),
}

pub struct IngestionWorker {
    connector: Arc<dyn SourceConnector>,
    writer: HistoryWriter,
    thresholds: ThresholdTable,
    config: IngestionConfig,
    state: watch::Sender<WorkerState>,
    stats: Arc<IngestionStats>,
}

impl IngestionWorker {
    pub fn new(
        connector: Arc<dyn SourceConnector>,
        writer: HistoryWriter,
        thresholds: ThresholdTable,
        config: IngestionConfig,
    ) -> (Self, WorkerHandle) {
        let (state, state_rx) = watch::channel(WorkerState::Connecting);
        let stats = Arc::new(IngestionStats::default());
        let handle = WorkerHandle {
            source: connector.describe(),
            state: state_rx,
            stats: Arc::clone(&stats),
        };

        let worker = Self {
            connector,
            writer,
            thresholds,
            config,
            state,
            stats,
        };
        (worker, handle)
    }

    /// Run until shutdown is signalled or the source fails for good.
    /// Returns the final state.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> WorkerState {
        let target = self.connector.describe();
        let mut failures: u32 = 0;

        let final_state = loop {
            if *shutdown.borrow() {
                break WorkerState::Stopped;
            }
            self.set_state(WorkerState::Connecting);
            tracing::info!(source = %target, "connecting");

            let connected = tokio::select! {
                connected = self.connector.connect() => connected,
                _ = wait_for_shutdown(&mut shutdown) => break WorkerState::Stopped,
            };

            let error = match connected {
                Ok(source) => {
                    failures = 0;
                    self.set_state(WorkerState::Listening);
                    tracing::info!(source = %target, "listening");
                    match self.listen(source, &mut shutdown).await {
                        ListenOutcome::Shutdown => break WorkerState::Stopped,
                        ListenOutcome::Lost(error) => error,
                    }
                }
                Err(error) => error,
            };

            match self.config.reconnect.as_ref() {
                Some(policy) if failures < policy.max_attempts => {
                    failures += 1;
                    let delay = policy.backoff(failures);
                    tracing::warn!(
                        source = %target,
                        error = %error,
                        attempt = failures,
                        delay_ms = delay.as_millis() as u64,
                        "source failed, reconnecting"
                    );
                    self.stats.reconnects.fetch_add(1, Ordering::Relaxed);
                    tokio::select! {
                        _ = tokio::time::sleep(delay) => {}
                        _ = wait_for_shutdown(&mut shutdown) => break WorkerState::Stopped,
                    }
                }
                _ => {
                    tracing::error!(source = %target, error = %error, "ingestion faulted");
                    break WorkerState::Faulted {
                        reason: error.to_string(),
                    };
                }
            }
        };

        if final_state == WorkerState::Stopped {
            tracing::info!(source = %target, "ingestion stopped");
        }
        self.set_state(final_state.clone());
        final_state
    }

    async fn listen(
        &self,
        mut source: Box<dyn EventSource>,
        shutdown: &mut watch::Receiver<bool>,
    ) -> ListenOutcome {
        let timeout = self.config.poll_timeout();
        loop {
            let polled = tokio::select! {
                biased;
                _ = wait_for_shutdown(shutdown) => None,
                polled = source.poll(timeout) => Some(polled),
            };
            let Some(polled) = polled else {
                source.close().await;
                return ListenOutcome::Shutdown;
            };

            match polled {
                Ok(Some(payload)) => self.ingest(&payload),
                Ok(None) => {}
                Err(error) if error.is_terminal() => {
                    source.close().await;
                    return ListenOutcome::Lost(error);
                }
                Err(error) => {
                    self.stats.transport_errors.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!(error = %error, "transient source error");
                }
            }
        }
    }

    /// Parse, enrich against current history, append.
    fn ingest(&self, payload: &[u8]) {
        let reading = match parse_reading(payload) {
            Ok(reading) => reading,
            Err(error) => {
                self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(error = %error, bytes = payload.len(), "dropping malformed message");
                return;
            }
        };

        let prior = self.writer.snapshot().recent_aqi(VOLATILITY_WINDOW);
        let context = EnrichmentContext::new(&prior, &self.thresholds);
        let record = enrich(reading, &context);

        tracing::debug!(
            timestamp = %record.timestamp(),
            aqi = record.aqi(),
            severity = %record.severity,
            "reading ingested"
        );
        // Counted first so a visible record is always reflected in the counters.
        self.stats.ingested.fetch_add(1, Ordering::Relaxed);
        self.writer.append(record);
    }

    fn set_state(&self, state: WorkerState) {
        self.state.send_replace(state);
    }
}

/// Resolves once shutdown is requested or its sender is gone.
async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}
