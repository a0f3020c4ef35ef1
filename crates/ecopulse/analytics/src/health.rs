//! Composite environmental health score

use crate::rounding::round_to;

/// `max(0, 100 - (aqi/5 + co2/50 + pm25/2))`, rounded to two decimals.
///
/// Floored at zero only. For non-negative inputs the score cannot exceed
/// 100, but negative inputs are not corrected.
pub fn compute_health_score(aqi: f64, co2: f64, pm25: f64) -> f64 {
    let penalty = aqi / 5.0 + co2 / 50.0 + pm25 / 2.0;
    round_to((100.0 - penalty).max(0.0), 2)
}
