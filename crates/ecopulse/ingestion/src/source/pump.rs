//! Background reader task feeding a bounded queue

use crate::error::SourceError;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Items buffered between the reader task and the poller.
pub(crate) const PUMP_BUFFER: usize = 256;

pub(crate) type PumpItem = Result<Vec<u8>, SourceError>;

/// Owns a reader task. Polling only awaits the queue, so dropping a poll
/// mid-wait never loses a partially read message.
#[derive(Debug)]
pub(crate) struct Pump {
    rx: mpsc::Receiver<PumpItem>,
    task: JoinHandle<()>,
}

impl Pump {
    pub(crate) fn spawn<F, Fut>(reader: F) -> Self
    where
        F: FnOnce(mpsc::Sender<PumpItem>) -> Fut,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(PUMP_BUFFER);
        let task = tokio::spawn(reader(tx));
        Self { rx, task }
    }

    pub(crate) async fn poll(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>, SourceError> {
        match tokio::time::timeout(timeout, self.rx.recv()).await {
            Ok(Some(item)) => item.map(Some),
            Ok(None) => Err(SourceError::ConnectionLost("reader task ended".into())),
            Err(_) => Ok(None),
        }
    }

    pub(crate) fn stop(&mut self) {
        self.task.abort();
        self.rx.close();
    }
}

impl Drop for Pump {
    fn drop(&mut self) {
        self.task.abort();
    }
}
