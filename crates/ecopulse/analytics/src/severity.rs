//! Risk severity classification

use ecopulse_types::{MetricThresholds, Severity};

/// Warning threshold multiplier applied during transit peaks.
pub const PEAK_WARNING_FACTOR: f64 = 1.2;

const MORNING_PEAK: std::ops::RangeInclusive<u32> = 8..=10;
const EVENING_PEAK: std::ops::RangeInclusive<u32> = 17..=19;

/// Whether `hour` (0-23) falls in a transit peak: 08-10 or 17-19 inclusive.
pub fn is_peak_hour(hour: u32) -> bool {
    MORNING_PEAK.contains(&hour) || EVENING_PEAK.contains(&hour)
}

/// Classify `aqi` against `thresholds` at hour-of-day `hour`.
///
/// Emergency and critical limits are absolute. During peak hours the warning
/// limit is raised by [`PEAK_WARNING_FACTOR`].
pub fn classify_severity(aqi: f64, hour: u32, thresholds: &MetricThresholds) -> Severity {
    let warning = if is_peak_hour(hour) {
        thresholds.warning * PEAK_WARNING_FACTOR
    } else {
        thresholds.warning
    };

    if aqi >= thresholds.emergency {
        Severity::Emergency
    } else if aqi >= thresholds.critical {
        Severity::Critical
    } else if aqi >= warning {
        Severity::Warning
    } else {
        Severity::Optimal
    }
}
