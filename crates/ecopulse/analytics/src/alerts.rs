//! Threshold alerts for the latest record

use ecopulse_types::{Alert, EnrichedRecord, Metric, MetricThresholds, Severity, ThresholdTable};

/// Active alerts for `record`, at most one per metric.
///
/// Levels use the absolute thresholds (no peak-hour adjustment). Metrics are
/// reported in the order AQI, PM2.5, CO2.
pub fn alert_status(record: &EnrichedRecord, thresholds: &ThresholdTable) -> Vec<Alert> {
    let reading = &record.reading;
    [
        (Metric::Aqi, reading.aqi),
        (Metric::Pm25, reading.pm25),
        (Metric::Co2, reading.co2),
    ]
    .into_iter()
    .filter_map(|(metric, value)| {
        let level = breached_level(value, thresholds.for_metric(metric))?;
        Some(Alert {
            metric,
            level,
            value,
            message: advisory(metric, level).to_string(),
        })
    })
    .collect()
}

fn breached_level(value: f64, limits: &MetricThresholds) -> Option<Severity> {
    if value >= limits.emergency {
        Some(Severity::Emergency)
    } else if value >= limits.critical {
        Some(Severity::Critical)
    } else if value >= limits.warning {
        Some(Severity::Warning)
    } else {
        None
    }
}

fn advisory(metric: Metric, level: Severity) -> &'static str {
    match (metric, level) {
        (Metric::Aqi, Severity::Emergency) => {
            "Hazardous air quality! Immediate shelter advised. Cease all outdoor activities."
        }
        (Metric::Aqi, Severity::Critical) => {
            "Very unhealthy air levels detected. High-risk groups should remain indoors."
        }
        (Metric::Aqi, _) => {
            "Air quality is deteriorating. Moderate health risks for sensitive individuals."
        }
        (Metric::Pm25, Severity::Emergency) => {
            "Extreme fine particulate load. Wear filtering masks and stay indoors."
        }
        (Metric::Pm25, Severity::Critical) => {
            "High fine particulate levels. Limit prolonged outdoor exertion."
        }
        (Metric::Pm25, _) => "Fine particulate levels are elevated.",
        (Metric::Co2, Severity::Emergency) => {
            "Dangerous carbon dioxide concentration. Evacuate enclosed spaces."
        }
        (Metric::Co2, Severity::Critical) => {
            "Very high carbon dioxide levels. Increase ventilation immediately."
        }
        (Metric::Co2, _) => {
            "High carbon dioxide levels detected. Ventilation and air circulation required."
        }
    }
}
