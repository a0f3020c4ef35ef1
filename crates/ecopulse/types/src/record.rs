//! Enriched records and the values derived for them

use crate::reading::RawReading;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Percentage breakdown of pollution causes.
///
/// Each share carries one decimal place; the four shares sum to roughly 100
/// (rounding may drift by a tenth either way).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Attribution {
    pub traffic: f64,
    pub industrial: f64,
    pub wind_impact: f64,
    pub temp_inversion: f64,
}

impl Attribution {
    pub fn total(&self) -> f64 {
        self.traffic + self.industrial + self.wind_impact + self.temp_inversion
    }
}

/// Ordered risk scale. Variant order is significant: `Optimal < Warning < Critical < Emergency`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Optimal,
    Warning,
    Critical,
    Emergency,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Optimal => "Optimal",
            Severity::Warning => "Warning",
            Severity::Critical => "Critical",
            Severity::Emergency => "Emergency",
        };
        f.write_str(label)
    }
}

/// Carbon load estimate; `total_equivalent` is a 24h extrapolation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CarbonFootprint {
    pub traffic_load: f64,
    pub industrial_load: f64,
    pub total_equivalent: f64,
}

/// Hypothetical policy levers, all in percent (expected 0-100, not clamped).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WhatIfParams {
    #[serde(default)]
    pub traffic_reduction: f64,
    #[serde(default)]
    pub industrial_restriction: f64,
    #[serde(default)]
    pub green_cover: f64,
}

/// A reading together with every analytic derived from it.
///
/// Serialized flat: the reading's fields sit next to the derived ones.
/// Once stored a record is never mutated; simulated records are built from
/// a copy and carry `is_simulated = true`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub reading: RawReading,

    pub attribution: Attribution,

    pub severity: Severity,

    pub carbon_footprint: CarbonFootprint,

    /// Current aqi minus the previous stored aqi (0 without a predecessor)
    pub aqi_momentum: f64,

    pub heat_pollution_index: f64,

    pub dispersion_factor: f64,

    /// Population std-dev of recent aqi; 0 until ten prior records exist
    pub volatility: f64,

    pub health_score: f64,

    #[serde(default)]
    pub is_simulated: bool,
}

impl EnrichedRecord {
    pub fn aqi(&self) -> f64 {
        self.reading.aqi
    }

    pub fn timestamp(&self) -> &str {
        &self.reading.timestamp
    }
}
