//! Redis pub/sub subscriber

use super::pump::{Pump, PumpItem};
use super::resp::{encode_command, read_frame, RespFrame};
use super::EventSource;
use crate::error::SourceError;
use async_trait::async_trait;
use std::time::Duration;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::mpsc;

/// Subscribes to a single channel and yields each message payload.
#[derive(Debug)]
pub struct RedisPubSubSource {
    address: String,
    channel: String,
    pump: Pump,
    writer: Option<OwnedWriteHalf>,
}

impl RedisPubSubSource {
    /// Connect, subscribe and wait for the broker's confirmation.
    pub async fn connect(
        address: &str,
        channel: &str,
        connect_timeout: Duration,
    ) -> Result<Self, SourceError> {
        let refused = |reason: String| SourceError::Connect {
            target: address.to_string(),
            reason,
        };

        let stream = tokio::time::timeout(connect_timeout, TcpStream::connect(address))
            .await
            .map_err(|_| refused("timed out".into()))?
            .map_err(|e| refused(e.to_string()))?;
        let (read_half, mut write_half) = stream.into_split();

        write_half
            .write_all(&encode_command(&["SUBSCRIBE", channel]))
            .await
            .map_err(|e| refused(e.to_string()))?;

        let mut reader = BufReader::new(read_half);
        let confirmation = tokio::time::timeout(connect_timeout, read_frame(&mut reader))
            .await
            .map_err(|_| refused("no subscription confirmation".into()))?
            .map_err(|e| refused(e.to_string()))?;
        match confirmation {
            Some(RespFrame::Array(Some(items)))
                if items.len() == 3 && items[0].is_text("subscribe") => {}
            Some(RespFrame::Error(message)) => return Err(refused(message)),
            Some(other) => return Err(refused(format!("unexpected reply {other:?}"))),
            None => return Err(refused("closed before confirming".into())),
        }

        tracing::info!(address, channel, "subscribed");

        let subscribed = channel.to_string();
        let pump = Pump::spawn(move |tx| read_messages(reader, subscribed, tx));

        Ok(Self {
            address: address.to_string(),
            channel: channel.to_string(),
            pump,
            writer: Some(write_half),
        })
    }
}

#[async_trait]
impl EventSource for RedisPubSubSource {
    async fn poll(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>, SourceError> {
        self.pump.poll(timeout).await
    }

    async fn close(&mut self) {
        self.pump.stop();
        if let Some(mut writer) = self.writer.take() {
            let _ = writer
                .write_all(&encode_command(&["UNSUBSCRIBE", &self.channel]))
                .await;
            let _ = writer.shutdown().await;
        }
        tracing::debug!(address = %self.address, channel = %self.channel, "unsubscribed");
    }
}

async fn read_messages(
    mut reader: BufReader<OwnedReadHalf>,
    channel: String,
    tx: mpsc::Sender<PumpItem>,
) {
    loop {
        let item = match read_frame(&mut reader).await {
            Ok(Some(frame)) => match classify(frame, &channel) {
                Some(item) => item,
                None => continue,
            },
            Ok(None) => Err(SourceError::ConnectionLost(
                "broker closed the connection".into(),
            )),
            Err(e) => Err(SourceError::ConnectionLost(e.to_string())),
        };

        let terminal = matches!(&item, Err(e) if e.is_terminal());
        if tx.send(item).await.is_err() || terminal {
            break;
        }
    }
}

/// Map a pushed frame to a payload, an error, or nothing worth surfacing.
fn classify(frame: RespFrame, channel: &str) -> Option<PumpItem> {
    match frame {
        RespFrame::Array(Some(mut items)) if items.len() == 3 && items[0].is_text("message") => {
            if !items[1].is_text(channel) {
                tracing::debug!("message for another channel skipped");
                return None;
            }
            match items.pop() {
                Some(RespFrame::Bulk(Some(payload))) => Some(Ok(payload)),
                Some(RespFrame::Simple(payload)) => Some(Ok(payload.into_bytes())),
                _ => Some(Err(SourceError::Protocol("message without payload".into()))),
            }
        }
        RespFrame::Array(Some(items))
            if items.first().map_or(false, |kind| {
                kind.is_text("subscribe") || kind.is_text("unsubscribe") || kind.is_text("pong")
            }) =>
        {
            None
        }
        RespFrame::Error(message) => Some(Err(SourceError::Protocol(message))),
        other => Some(Err(SourceError::Protocol(format!(
            "unexpected frame {other:?}"
        )))),
    }
}
