//! Reading enrichment: one raw reading in, one enriched record out

use crate::attribution::compute_attribution;
use crate::carbon::estimate_carbon;
use crate::health::compute_health_score;
use crate::rounding::round_to;
use crate::severity::classify_severity;
use crate::trend::{compute_momentum, compute_volatility};
use crate::whatif::apply_whatif;
use chrono::{Local, Timelike};
use ecopulse_types::{EnrichedRecord, RawReading, ThresholdTable, WhatIfParams};

/// History and policy an enrichment runs against.
#[derive(Debug, Clone, Copy)]
pub struct EnrichmentContext<'a> {
    /// Stored aqi values in arrival order, newest last
    pub prior_aqi: &'a [f64],

    pub thresholds: &'a ThresholdTable,

    /// Hour used for peak detection when the reading timestamp is unparseable
    pub fallback_hour: u32,
}

impl<'a> EnrichmentContext<'a> {
    /// Context whose fallback hour is the current local hour.
    pub fn new(prior_aqi: &'a [f64], thresholds: &'a ThresholdTable) -> Self {
        Self {
            prior_aqi,
            thresholds,
            fallback_hour: Local::now().hour(),
        }
    }

    fn previous_aqi(&self) -> Option<f64> {
        self.prior_aqi.last().copied()
    }
}

pub fn heat_pollution_index(temperature: f64, aqi: f64) -> f64 {
    round_to(temperature * aqi / 100.0, 2)
}

/// `10 / (wind + 1)`; negative wind is treated as calm.
pub fn dispersion_factor(wind_speed: f64) -> f64 {
    round_to(10.0 / (wind_speed.max(0.0) + 1.0), 2)
}

/// Derive every analytic for `reading` against `context`.
pub fn enrich(reading: RawReading, context: &EnrichmentContext<'_>) -> EnrichedRecord {
    let aqi = reading.aqi;
    let hour = reading.observed_hour().unwrap_or(context.fallback_hour);

    EnrichedRecord {
        attribution: compute_attribution(
            reading.traffic_density,
            reading.industrial_index,
            reading.wind_speed,
            reading.temperature,
        ),
        severity: classify_severity(aqi, hour, &context.thresholds.aqi),
        carbon_footprint: estimate_carbon(reading.traffic_density, reading.industrial_index),
        aqi_momentum: compute_momentum(aqi, context.previous_aqi()),
        heat_pollution_index: heat_pollution_index(reading.temperature, aqi),
        dispersion_factor: dispersion_factor(reading.wind_speed),
        volatility: compute_volatility(context.prior_aqi, aqi),
        health_score: compute_health_score(aqi, reading.co2, reading.pm25),
        is_simulated: false,
        reading,
    }
}

/// Re-derive `latest` as if `params` had been in force.
///
/// Works on a copy; the returned record is flagged simulated and is meant to
/// be served, never stored.
pub fn simulate(
    latest: &EnrichedRecord,
    params: &WhatIfParams,
    context: &EnrichmentContext<'_>,
) -> EnrichedRecord {
    let mut reading = latest.reading.clone();
    reading.aqi = apply_whatif(reading.aqi, params);

    let mut simulated = enrich(reading, context);
    simulated.is_simulated = true;
    simulated
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecopulse_types::Severity;

    fn reading(aqi: f64) -> RawReading {
        RawReading {
            timestamp: "2026-03-01T13:00:00".to_string(),
            aqi,
            pm25: 12.0,
            co2: 400.0,
            temperature: 25.0,
            humidity: 50.0,
            wind_speed: 10.0,
            traffic_density: 30.0,
            industrial_index: 20.0,
        }
    }

    #[test]
    fn first_record_has_no_trend() {
        let thresholds = ThresholdTable::default();
        let record = enrich(reading(50.0), &EnrichmentContext::new(&[], &thresholds));

        assert_eq!(record.aqi_momentum, 0.0);
        assert_eq!(record.volatility, 0.0);
        assert_eq!(record.severity, Severity::Optimal);
        assert_eq!(record.health_score, 76.0);
        assert_eq!(record.heat_pollution_index, 12.5);
        assert_eq!(record.dispersion_factor, 0.91);
        assert!(!record.is_simulated);
    }

    #[test]
    fn momentum_uses_newest_prior_value() {
        let thresholds = ThresholdTable::default();
        let prior = [10.0, 40.0];
        let record = enrich(reading(55.5), &EnrichmentContext::new(&prior, &thresholds));
        assert_eq!(record.aqi_momentum, 15.5);
    }

    #[test]
    fn unparseable_timestamp_uses_fallback_hour() {
        let thresholds = ThresholdTable::default();
        let mut raw = reading(110.0);
        raw.timestamp = "not-a-time".to_string();

        let peak = EnrichmentContext {
            prior_aqi: &[],
            thresholds: &thresholds,
            fallback_hour: 9,
        };
        let off_peak = EnrichmentContext {
            fallback_hour: 14,
            ..peak
        };

        assert_eq!(enrich(raw.clone(), &peak).severity, Severity::Optimal);
        assert_eq!(enrich(raw, &off_peak).severity, Severity::Warning);
    }

    #[test]
    fn simulation_recomputes_from_adjusted_aqi() {
        let thresholds = ThresholdTable::default();
        let stored = enrich(reading(350.0), &EnrichmentContext::new(&[], &thresholds));
        let params = WhatIfParams {
            traffic_reduction: 100.0,
            industrial_restriction: 100.0,
            green_cover: 0.0,
        };
        let prior = [350.0];

        let simulated = simulate(&stored, &params, &EnrichmentContext::new(&prior, &thresholds));

        assert!(simulated.is_simulated);
        assert_eq!(simulated.aqi(), 105.0);
        assert_eq!(simulated.severity, Severity::Warning);
        assert_eq!(simulated.aqi_momentum, -245.0);
        assert_eq!(stored.aqi(), 350.0);
        assert!(!stored.is_simulated);
    }

    #[test]
    fn negative_wind_is_treated_as_calm() {
        assert_eq!(dispersion_factor(-3.0), 10.0);
    }
}
