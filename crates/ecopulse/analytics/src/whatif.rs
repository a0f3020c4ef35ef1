//! What-if policy adjustment

use crate::rounding::round_to;
use ecopulse_types::WhatIfParams;

const TRAFFIC_ELASTICITY: f64 = 0.4;
const INDUSTRIAL_ELASTICITY: f64 = 0.5;
const GREEN_COVER_ELASTICITY: f64 = 0.2;

/// Scale `aqi` by the three policy levers, rounded to two decimals.
///
/// Percentages outside 0-100 are applied as given; callers that need bounds
/// must clamp before calling.
pub fn apply_whatif(aqi: f64, params: &WhatIfParams) -> f64 {
    let lever = |percent: f64, elasticity: f64| 1.0 - percent / 100.0 * elasticity;

    let adjusted = aqi
        * lever(params.traffic_reduction, TRAFFIC_ELASTICITY)
        * lever(params.industrial_restriction, INDUSTRIAL_ELASTICITY)
        * lever(params.green_cover, GREEN_COVER_ELASTICITY);

    round_to(adjusted, 2)
}
