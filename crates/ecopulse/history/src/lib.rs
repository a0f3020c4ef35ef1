//! EcoPulse History - Bounded rolling window of enriched records
//!
//! A single [`HistoryWriter`] appends; any number of [`HistoryReader`]s take
//! point-in-time [`HistorySnapshot`]s. Each append publishes a new snapshot;
//! a reader holding an older snapshot keeps seeing exactly what it took.

#![deny(unsafe_code)]

mod snapshot;
mod store;

pub use snapshot::HistorySnapshot;
pub use store::{history_channel, HistoryReader, HistoryWriter, DEFAULT_CAPACITY};
