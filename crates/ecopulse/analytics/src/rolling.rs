//! Rolling averages over recent records

use crate::rounding::round_to;
use ecopulse_types::{EnrichedRecord, RollingSummary};

/// Average aqi, PM2.5 and CO2 over `recent` (arrival order).
///
/// The timestamp is the newest record's. `None` for an empty window.
pub fn rolling_summary(recent: &[EnrichedRecord]) -> Option<RollingSummary> {
    let newest = recent.last()?;
    let samples = recent.len();
    let mean = |field: fn(&EnrichedRecord) -> f64| {
        round_to(recent.iter().map(field).sum::<f64>() / samples as f64, 2)
    };

    Some(RollingSummary {
        timestamp: newest.timestamp().to_string(),
        avg_aqi: mean(|r| r.reading.aqi),
        avg_pm25: mean(|r| r.reading.pm25),
        avg_co2: mean(|r| r.reading.co2),
        samples,
    })
}
