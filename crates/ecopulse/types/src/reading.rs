//! Raw sensor readings (wire format)

use chrono::{DateTime, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// One environmental sensor payload as published on the event channel.
///
/// - Mirrors the JSON message 1:1; nothing is derived here.
/// - Numeric fields that are absent default to `0.0`. A field that is present
///   but not a number is rejected by deserialization.
/// - Values are non-negative by convention only; nothing is enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawReading {
    /// Source timestamp, ISO-8601 as written by the producer (offset optional).
    pub timestamp: String,

    #[serde(default)]
    pub aqi: f64,

    #[serde(default)]
    pub pm25: f64,

    #[serde(default)]
    pub co2: f64,

    /// Ambient temperature in °C
    #[serde(default)]
    pub temperature: f64,

    /// Relative humidity in percent
    #[serde(default)]
    pub humidity: f64,

    #[serde(default)]
    pub wind_speed: f64,

    #[serde(default)]
    pub traffic_density: f64,

    #[serde(default)]
    pub industrial_index: f64,
}

impl RawReading {
    /// Wall-clock time of the reading as written by the producer.
    ///
    /// Accepts RFC 3339 (with offset, the local part is kept) and naive
    /// ISO-8601 with optional fractional seconds.
    pub fn observed_at(&self) -> Option<NaiveDateTime> {
        let raw = self.timestamp.trim();
        if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
            return Some(with_offset.naive_local());
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()
    }

    /// Hour of day (0-23) of [`observed_at`](Self::observed_at).
    pub fn observed_hour(&self) -> Option<u32> {
        self.observed_at().map(|at| at.hour())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading_at(timestamp: &str) -> RawReading {
        RawReading {
            timestamp: timestamp.to_string(),
            aqi: 0.0,
            pm25: 0.0,
            co2: 0.0,
            temperature: 0.0,
            humidity: 0.0,
            wind_speed: 0.0,
            traffic_density: 0.0,
            industrial_index: 0.0,
        }
    }

    #[test]
    fn missing_numeric_fields_default_to_zero() {
        let reading: RawReading =
            serde_json::from_str(r#"{"timestamp": "2026-03-01T09:15:00", "aqi": 42.5}"#).unwrap();
        assert_eq!(reading.aqi, 42.5);
        assert_eq!(reading.pm25, 0.0);
        assert_eq!(reading.industrial_index, 0.0);
    }

    #[test]
    fn non_numeric_field_is_rejected() {
        let parsed: Result<RawReading, _> =
            serde_json::from_str(r#"{"timestamp": "2026-03-01T09:15:00", "aqi": "high"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn python_isoformat_timestamp_parses() {
        let reading = reading_at("2026-03-01T18:04:05.123456");
        assert_eq!(reading.observed_hour(), Some(18));
    }

    #[test]
    fn rfc3339_keeps_local_wall_clock() {
        let reading = reading_at("2026-03-01T08:30:00+05:30");
        assert_eq!(reading.observed_hour(), Some(8));
    }

    #[test]
    fn garbage_timestamp_has_no_hour() {
        assert_eq!(reading_at("yesterday").observed_hour(), None);
    }
}
