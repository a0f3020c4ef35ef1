//! Single-writer history store with snapshot publication

use crate::snapshot::HistorySnapshot;
use chrono::Utc;
use ecopulse_types::EnrichedRecord;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::watch;

/// Records retained when no capacity is configured.
pub const DEFAULT_CAPACITY: usize = 100;

/// Create a store holding at most `capacity` records (minimum 1).
///
/// The writer is unique; readers can be cloned freely.
pub fn history_channel(capacity: usize) -> (HistoryWriter, HistoryReader) {
    let capacity = capacity.max(1);
    let initial = HistorySnapshot {
        records: Arc::new(VecDeque::with_capacity(capacity + 1)),
        total_appended: 0,
        published_at: None,
    };
    let (tx, rx) = watch::channel(initial);

    (HistoryWriter { capacity, tx }, HistoryReader { rx })
}

/// Write handle. Not `Clone`: exactly one task appends.
#[derive(Debug)]
pub struct HistoryWriter {
    capacity: usize,
    tx: watch::Sender<HistorySnapshot>,
}

impl HistoryWriter {
    /// Append `record`, evicting the oldest entry once over capacity, and
    /// publish the result.
    ///
    /// The backing buffer is mutated in place when no reader still holds the
    /// previous snapshot, otherwise it is copied first.
    pub fn append(&self, record: EnrichedRecord) {
        let capacity = self.capacity;
        self.tx.send_modify(|snapshot| {
            let records = Arc::make_mut(&mut snapshot.records);
            records.push_back(record);
            while records.len() > capacity {
                records.pop_front();
            }
            snapshot.total_appended += 1;
            snapshot.published_at = Some(Utc::now());
        });
        tracing::trace!(len = self.tx.borrow().len(), "history appended");
    }

    pub fn snapshot(&self) -> HistorySnapshot {
        self.tx.borrow().clone()
    }

    pub fn latest(&self) -> Option<EnrichedRecord> {
        self.tx.borrow().latest().cloned()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Read handle. Cheap to clone; never blocks the writer beyond the copy of
/// an `Arc`.
#[derive(Debug, Clone)]
pub struct HistoryReader {
    rx: watch::Receiver<HistorySnapshot>,
}

impl HistoryReader {
    pub fn snapshot(&self) -> HistorySnapshot {
        self.rx.borrow().clone()
    }

    pub fn latest(&self) -> Option<EnrichedRecord> {
        self.rx.borrow().latest().cloned()
    }

    /// Wait until at least `total` records have ever been appended.
    pub async fn wait_for_total(&mut self, total: u64) -> HistorySnapshot {
        let reached = self
            .rx
            .wait_for(|snapshot| snapshot.total_appended >= total)
            .await
            .map(|snapshot| snapshot.clone());
        reached.unwrap_or_else(|_| self.snapshot())
    }
}
