//! Payload parsing

use crate::error::MessageError;
use ecopulse_types::RawReading;

/// Decode one event payload into a reading.
///
/// The payload must be a JSON object with a string `timestamp`. Absent
/// numeric fields become `0.0`; present non-numeric ones are malformed.
pub fn parse_reading(payload: &[u8]) -> Result<RawReading, MessageError> {
    Ok(serde_json::from_slice(payload)?)
}
