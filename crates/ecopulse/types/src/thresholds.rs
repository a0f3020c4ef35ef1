//! Per-metric alert thresholds

use serde::{Deserialize, Serialize};
use std::fmt;

/// Metrics that carry a threshold table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Metric {
    Aqi,
    Pm25,
    Co2,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Metric::Aqi => "AQI",
            Metric::Pm25 => "PM25",
            Metric::Co2 => "CO2",
        };
        f.write_str(label)
    }
}

/// Warning / critical / emergency limits for one metric (inclusive lower bounds).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricThresholds {
    pub warning: f64,
    pub critical: f64,
    pub emergency: f64,
}

/// Threshold table for every tracked metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdTable {
    #[serde(default = "default_aqi")]
    pub aqi: MetricThresholds,

    #[serde(default = "default_pm25")]
    pub pm25: MetricThresholds,

    #[serde(default = "default_co2")]
    pub co2: MetricThresholds,
}

impl ThresholdTable {
    pub fn for_metric(&self, metric: Metric) -> &MetricThresholds {
        match metric {
            Metric::Aqi => &self.aqi,
            Metric::Pm25 => &self.pm25,
            Metric::Co2 => &self.co2,
        }
    }
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self {
            aqi: default_aqi(),
            pm25: default_pm25(),
            co2: default_co2(),
        }
    }
}

fn default_aqi() -> MetricThresholds {
    MetricThresholds {
        warning: 100.0,
        critical: 200.0,
        emergency: 300.0,
    }
}

fn default_pm25() -> MetricThresholds {
    MetricThresholds {
        warning: 35.0,
        critical: 75.0,
        emergency: 150.0,
    }
}

fn default_co2() -> MetricThresholds {
    MetricThresholds {
        warning: 1000.0,
        critical: 2000.0,
        emergency: 5000.0,
    }
}
