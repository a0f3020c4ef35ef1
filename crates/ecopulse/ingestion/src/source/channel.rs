//! In-process source backed by an mpsc channel

use super::{EventSource, SourceConnector};
use crate::error::SourceError;
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;

/// Yields whatever is sent on the paired sender. Dropping every sender is
/// treated as a lost connection.
#[derive(Debug)]
pub struct ChannelSource {
    rx: mpsc::Receiver<Vec<u8>>,
}

impl ChannelSource {
    pub fn new(rx: mpsc::Receiver<Vec<u8>>) -> Self {
        Self { rx }
    }
}

#[async_trait]
impl EventSource for ChannelSource {
    async fn poll(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>, SourceError> {
        match tokio::time::timeout(timeout, self.rx.recv()).await {
            Ok(Some(payload)) => Ok(Some(payload)),
            Ok(None) => Err(SourceError::ConnectionLost("channel closed".into())),
            Err(_) => Ok(None),
        }
    }

    async fn close(&mut self) {
        self.rx.close();
    }
}

/// Hands out each queued receiver once; further connects are refused.
#[derive(Debug, Default)]
pub struct ChannelConnector {
    pending: Mutex<Vec<mpsc::Receiver<Vec<u8>>>>,
}

impl ChannelConnector {
    /// A connector with one connection and its sender.
    pub fn pair(buffer: usize) -> (Self, mpsc::Sender<Vec<u8>>) {
        let connector = Self::default();
        let tx = connector.push(buffer);
        (connector, tx)
    }

    /// Queue another connection for a later reconnect.
    pub fn push(&self, buffer: usize) -> mpsc::Sender<Vec<u8>> {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        if let Ok(mut pending) = self.pending.lock() {
            pending.push(rx);
        }
        tx
    }
}

#[async_trait]
impl SourceConnector for ChannelConnector {
    fn describe(&self) -> String {
        "channel".to_string()
    }

    async fn connect(&self) -> Result<Box<dyn EventSource>, SourceError> {
        let next = match self.pending.lock() {
            Ok(mut pending) if !pending.is_empty() => Some(pending.remove(0)),
            _ => None,
        };
        next.map(|rx| Box::new(ChannelSource::new(rx)) as Box<dyn EventSource>)
            .ok_or_else(|| SourceError::Connect {
                target: self.describe(),
                reason: "no connection available".into(),
            })
    }
}
