//! Server setup and lifecycle management

use crate::api::{create_router, AppState};
use crate::config::EngineConfig;
use crate::error::{DaemonError, DaemonResult};
use ecopulse_history::history_channel;
use ecopulse_ingestion::{IngestionWorker, SourceConnector, WorkerState};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;

/// EcoPulse engine server
pub struct Server {
    config: EngineConfig,
    connector: Arc<dyn SourceConnector>,
}

impl Server {
    /// Create a server reading from the configured source
    pub fn new(config: EngineConfig) -> Self {
        let connector = Arc::new(config.source.clone());
        Self::with_connector(config, connector)
    }

    /// Create a server reading from an explicit connector
    pub fn with_connector(config: EngineConfig, connector: Arc<dyn SourceConnector>) -> Self {
        Self { config, connector }
    }

    /// Run until Ctrl+C or SIGTERM
    pub async fn run(self) -> DaemonResult<()> {
        let listener = TcpListener::bind(self.config.server.listen_addr).await?;
        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on `listener` until `shutdown` resolves, then stop the worker.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> DaemonResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (writer, reader) = history_channel(self.config.history.capacity);
        let (worker, handle) = IngestionWorker::new(
            Arc::clone(&self.connector),
            writer,
            self.config.thresholds,
            self.config.ingestion.clone(),
        );

        // Start the single writer in background
        let (stop_tx, stop_rx) = watch::channel(false);
        let worker_task = tokio::spawn(worker.run(stop_rx));

        let state = AppState::new(
            reader,
            self.config.history.capacity,
            handle,
            self.config.thresholds,
            self.config.query,
        );
        let app = create_router(state, self.config.server.enable_cors);

        let addr = listener.local_addr()?;
        tracing::info!(%addr, source = %self.connector.describe(), "EcoPulse listening");

        // Run server with graceful shutdown
        let served = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| DaemonError::Server(e.to_string()));

        tracing::info!("EcoPulse shutting down");

        // Stop ingestion; it releases its source within one poll timeout
        let _ = stop_tx.send(true);
        match worker_task.await {
            Ok(WorkerState::Faulted { reason }) => {
                tracing::warn!(%reason, "ingestion had faulted before shutdown")
            }
            Ok(_) => {}
            Err(e) => tracing::error!(error = %e, "ingestion task panicked"),
        }

        served
    }
}

/// Graceful shutdown signal handler
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
