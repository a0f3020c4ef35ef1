//! Carbon load estimate

use crate::rounding::round_to;
use ecopulse_types::CarbonFootprint;

const TRAFFIC_FACTOR: f64 = 0.45;
const INDUSTRIAL_FACTOR: f64 = 1.2;
const HOURS_PER_DAY: f64 = 24.0;

/// Estimate hourly traffic/industrial load and its daily equivalent.
///
/// Loads are rounded to two decimals, the daily total to one. The total is
/// computed from the unrounded loads.
pub fn estimate_carbon(traffic: f64, industrial: f64) -> CarbonFootprint {
    let traffic_load = traffic * TRAFFIC_FACTOR;
    let industrial_load = industrial * INDUSTRIAL_FACTOR;

    CarbonFootprint {
        traffic_load: round_to(traffic_load, 2),
        industrial_load: round_to(industrial_load, 2),
        total_equivalent: round_to((traffic_load + industrial_load) * HOURS_PER_DAY, 1),
    }
}
