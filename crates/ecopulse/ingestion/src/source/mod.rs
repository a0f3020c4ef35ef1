//! Event sources
//!
//! An [`EventSource`] yields raw payloads one at a time. A [`SourceConnector`]
//! establishes (and re-establishes) sources; [`SourceConfig`] is the
//! connector chosen from configuration.

mod channel;
mod file;
mod pump;
mod redis;
pub mod resp;

pub use channel::{ChannelConnector, ChannelSource};
pub use file::JsonLinesFileSource;
pub use redis::RedisPubSubSource;

use crate::error::SourceError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// A connected stream of payloads.
#[async_trait]
pub trait EventSource: Send {
    /// Wait up to `timeout` for the next payload. `Ok(None)` means nothing
    /// arrived in time. Cancelling a poll never drops a payload.
    async fn poll(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>, SourceError>;

    /// Release the underlying connection.
    async fn close(&mut self);
}

/// Opens event sources.
#[async_trait]
pub trait SourceConnector: Send + Sync {
    /// Human-readable target, used in logs and status.
    fn describe(&self) -> String;

    async fn connect(&self) -> Result<Box<dyn EventSource>, SourceError>;
}

/// Configured event source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceConfig {
    Redis {
        #[serde(default = "default_redis_address")]
        address: String,
        #[serde(default = "default_channel")]
        channel: String,
        #[serde(default = "default_connect_timeout_ms")]
        connect_timeout_ms: u64,
    },
    File {
        path: PathBuf,
        #[serde(default)]
        from_start: bool,
    },
}

fn default_redis_address() -> String {
    "127.0.0.1:6379".to_string()
}

fn default_channel() -> String {
    "environmental_stream".to_string()
}

fn default_connect_timeout_ms() -> u64 {
    5_000
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Redis {
            address: default_redis_address(),
            channel: default_channel(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

#[async_trait]
impl SourceConnector for SourceConfig {
    fn describe(&self) -> String {
        match self {
            SourceConfig::Redis { address, channel, .. } => format!("redis://{address}/{channel}"),
            SourceConfig::File { path, .. } => format!("file://{}", path.display()),
        }
    }

    async fn connect(&self) -> Result<Box<dyn EventSource>, SourceError> {
        match self {
            SourceConfig::Redis {
                address,
                channel,
                connect_timeout_ms,
            } => {
                let timeout = Duration::from_millis(*connect_timeout_ms);
                let source = RedisPubSubSource::connect(address, channel, timeout).await?;
                Ok(Box::new(source))
            }
            SourceConfig::File { path, from_start } => {
                let source = JsonLinesFileSource::open(path, *from_start).await?;
                Ok(Box::new(source))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_config_is_tagged_by_type() {
        let parsed: SourceConfig =
            serde_json::from_str(r#"{"type": "file", "path": "/tmp/readings.jsonl"}"#).unwrap();
        assert_eq!(
            parsed,
            SourceConfig::File {
                path: PathBuf::from("/tmp/readings.jsonl"),
                from_start: false
            }
        );

        let parsed: SourceConfig = serde_json::from_str(r#"{"type": "redis"}"#).unwrap();
        assert_eq!(parsed, SourceConfig::default());
        assert_eq!(parsed.describe(), "redis://127.0.0.1:6379/environmental_stream");
    }
}
