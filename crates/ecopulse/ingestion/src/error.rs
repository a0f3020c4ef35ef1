//! Error types for event sources and message parsing

use thiserror::Error;

/// Event source failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    /// The source could not be reached or refused the subscription
    #[error("failed to connect to {target}: {reason}")]
    Connect { target: String, reason: String },

    /// An established connection is gone
    #[error("connection lost: {0}")]
    ConnectionLost(String),

    /// A transient transport hiccup; the connection is still usable
    #[error("transport error: {0}")]
    Transport(String),

    /// The peer sent something this client does not understand
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl SourceError {
    /// Terminal errors end the current connection.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SourceError::Connect { .. } | SourceError::ConnectionLost(_))
    }
}

/// Payloads that cannot become a reading.
#[derive(Debug, Error)]
pub enum MessageError {
    #[error("malformed reading: {0}")]
    Malformed(#[from] serde_json::Error),
}
