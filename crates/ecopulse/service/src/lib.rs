//! EcoPulse Service library
//!
//! This crate wires the engine together:
//! - REST query handlers over the shared history
//! - Layered configuration
//! - Server lifecycle with graceful shutdown of the ingestion worker

pub mod api;
pub mod config;
pub mod error;
pub mod server;
pub mod views;

pub use api::{create_router, AppState};
pub use config::EngineConfig;
pub use error::{ApiError, ApiResult, DaemonError, DaemonResult};
pub use server::Server;
