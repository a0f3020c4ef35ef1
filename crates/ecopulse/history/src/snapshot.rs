use chrono::{DateTime, Utc};
use ecopulse_types::EnrichedRecord;
use std::collections::VecDeque;
use std::sync::Arc;

/// Immutable view of the history at one instant.
///
/// Cloning is cheap (shared buffer). Records are in arrival order, oldest
/// first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HistorySnapshot {
    pub(crate) records: Arc<VecDeque<EnrichedRecord>>,
    pub(crate) total_appended: u64,
    pub(crate) published_at: Option<DateTime<Utc>>,
}

impl HistorySnapshot {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Newest record, if any.
    pub fn latest(&self) -> Option<&EnrichedRecord> {
        self.records.back()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &EnrichedRecord> + ExactSizeIterator {
        self.records.iter()
    }

    /// The newest `n` records, oldest first.
    pub fn tail(&self, n: usize) -> Vec<EnrichedRecord> {
        let skip = self.records.len().saturating_sub(n);
        self.records.iter().skip(skip).cloned().collect()
    }

    /// Aqi of the newest `n` records, oldest first.
    pub fn recent_aqi(&self, n: usize) -> Vec<f64> {
        let skip = self.records.len().saturating_sub(n);
        self.records.iter().skip(skip).map(|r| r.reading.aqi).collect()
    }

    /// Records ever appended, including evicted ones.
    pub fn total_appended(&self) -> u64 {
        self.total_appended
    }

    /// When the newest record was appended.
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }
}
