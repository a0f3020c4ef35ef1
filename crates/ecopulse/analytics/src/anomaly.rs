//! Instability flags for the latest aqi

use ecopulse_types::AnomalyFlags;

const Z_SCORE_LIMIT: f64 = 3.0;
const SPIKE_DELTA: f64 = 50.0;

/// Flag `current` against `history` (arrival order, newest last, not
/// including `current`).
pub fn anomaly_flags(current: f64, history: &[f64]) -> AnomalyFlags {
    AnomalyFlags {
        zscore_outlier: is_zscore_outlier(current, history),
        spike: history
            .last()
            .map(|previous| current - previous > SPIKE_DELTA)
            .unwrap_or(false),
    }
}

fn is_zscore_outlier(value: f64, history: &[f64]) -> bool {
    if history.is_empty() {
        return false;
    }
    let n = history.len() as f64;
    let mean = history.iter().sum::<f64>() / n;
    let std = (history.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n).sqrt();
    if std == 0.0 {
        return false;
    }
    ((value - mean) / std).abs() > Z_SCORE_LIMIT
}
