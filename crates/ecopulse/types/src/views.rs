//! Derived views served by the query interface
//!
//! District and national figures are multiplicative scalings of the latest
//! stored AQI. They are extrapolations, not sensed data, and every view
//! carries `derived: true` so consumers can tell.

use serde::{Deserialize, Serialize};

/// One row of the district comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictView {
    pub name: String,
    pub aqi: f64,
    pub vulnerability: String,
    pub risk: String,
    pub trend: String,
    pub derived: bool,
}

/// One row of the national comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NationalView {
    pub id: String,
    pub name: String,
    pub aqi: f64,
    pub derived: bool,
}

/// Averages over the most recent records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingSummary {
    /// Timestamp of the newest record in the window
    pub timestamp: String,
    pub avg_aqi: f64,
    pub avg_pm25: f64,
    pub avg_co2: f64,
    pub samples: usize,
}

/// Short-term instability flags for the latest record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnomalyFlags {
    /// |z| > 3 against the recent window
    pub zscore_outlier: bool,
    /// Jump of more than 50 over the previous record
    pub spike: bool,
}
