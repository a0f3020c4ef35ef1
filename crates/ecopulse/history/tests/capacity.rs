//! Capacity and ordering properties of the history store.

use ecopulse_history::history_channel;
use ecopulse_types::{Attribution, CarbonFootprint, EnrichedRecord, RawReading, Severity};
use proptest::prelude::*;

fn record(sequence: usize) -> EnrichedRecord {
    EnrichedRecord {
        reading: RawReading {
            timestamp: format!("seq-{sequence}"),
            aqi: sequence as f64,
            pm25: 0.0,
            co2: 0.0,
            temperature: 0.0,
            humidity: 0.0,
            wind_speed: 0.0,
            traffic_density: 0.0,
            industrial_index: 0.0,
        },
        attribution: Attribution::default(),
        severity: Severity::Optimal,
        carbon_footprint: CarbonFootprint::default(),
        aqi_momentum: 0.0,
        heat_pollution_index: 0.0,
        dispersion_factor: 0.0,
        volatility: 0.0,
        health_score: 100.0,
        is_simulated: false,
    }
}

proptest! {
    /// After any number of appends the store holds exactly the newest
    /// `min(inserted, capacity)` records, in arrival order.
    #[test]
    fn keeps_exactly_the_newest_records(capacity in 1usize..150, inserted in 0usize..400) {
        let (writer, reader) = history_channel(capacity);
        for sequence in 0..inserted {
            writer.append(record(sequence));
            prop_assert!(reader.snapshot().len() <= capacity);
        }

        let snapshot = reader.snapshot();
        let expected: Vec<String> = (inserted.saturating_sub(capacity)..inserted)
            .map(|sequence| format!("seq-{sequence}"))
            .collect();
        let actual: Vec<String> = snapshot.iter().map(|r| r.timestamp().to_string()).collect();
        prop_assert_eq!(actual, expected);
    }
}
