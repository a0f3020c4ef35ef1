//! EcoPulse Ingestion - Event sources and the single-writer ingestion worker
//!
//! The worker connects to a configured [`EventSource`], polls it with a
//! bounded timeout, enriches every valid reading against the current history
//! and appends the result. Malformed payloads are dropped; a lost connection
//! faults the worker unless a [`ReconnectPolicy`] is configured.

#![deny(unsafe_code)]

pub mod error;
pub mod message;
pub mod source;
pub mod worker;

pub use error::{MessageError, SourceError};
pub use message::parse_reading;
pub use source::{
    ChannelConnector, ChannelSource, EventSource, JsonLinesFileSource, RedisPubSubSource,
    SourceConfig, SourceConnector,
};
pub use worker::{
    IngestionConfig, IngestionCounters, IngestionWorker, ReconnectPolicy, WorkerHandle,
    WorkerState,
};
