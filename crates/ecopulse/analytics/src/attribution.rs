//! Pollution-source attribution

use crate::rounding::round_to;
use ecopulse_types::Attribution;

const TRAFFIC_WEIGHT: f64 = 1.5;
const INDUSTRIAL_WEIGHT: f64 = 2.0;
/// Wind below this speed stops dispersing pollutants
const CALM_WIND_LIMIT: f64 = 15.0;
const DISPERSION_WEIGHT: f64 = 5.0;
/// Temperature above which inversion starts trapping pollutants (°C)
const INVERSION_ONSET: f64 = 25.0;
const INVERSION_WEIGHT: f64 = 2.0;

/// Split pollution into traffic, industrial, stagnant-wind and
/// temperature-inversion shares (percent, one decimal).
///
/// The denominator never drops below 1, so all-zero inputs yield all-zero
/// shares rather than a division by zero.
pub fn compute_attribution(traffic: f64, industrial: f64, wind: f64, temp: f64) -> Attribution {
    let traffic_coeff = traffic * TRAFFIC_WEIGHT;
    let industrial_coeff = industrial * INDUSTRIAL_WEIGHT;
    let dispersion_penalty = (CALM_WIND_LIMIT - wind).max(0.0) * DISPERSION_WEIGHT;
    let temp_inversion = if temp > INVERSION_ONSET {
        (temp - INVERSION_ONSET) * INVERSION_WEIGHT
    } else {
        0.0
    };

    let total = (traffic_coeff + industrial_coeff + dispersion_penalty + temp_inversion).max(1.0);
    let share = |component: f64| round_to(component / total * 100.0, 1);

    Attribution {
        traffic: share(traffic_coeff),
        industrial: share(industrial_coeff),
        wind_impact: share(dispersion_penalty),
        temp_inversion: share(temp_inversion),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shares_follow_weights() {
        // 30*1.5=45, 20*2=40, (15-10)*5=25, no inversion; total 110
        let attribution = compute_attribution(30.0, 20.0, 10.0, 25.0);
        assert_eq!(attribution.traffic, 40.9);
        assert_eq!(attribution.industrial, 36.4);
        assert_eq!(attribution.wind_impact, 22.7);
        assert_eq!(attribution.temp_inversion, 0.0);
    }

    #[test]
    fn hot_calm_day_attributes_inversion() {
        let attribution = compute_attribution(0.0, 0.0, 15.0, 35.0);
        assert_eq!(attribution.temp_inversion, 100.0);
        assert_eq!(attribution.wind_impact, 0.0);
    }

    #[test]
    fn all_zero_inputs_do_not_divide_by_zero() {
        let attribution = compute_attribution(0.0, 0.0, 20.0, 10.0);
        assert_eq!(attribution.total(), 0.0);
    }
}
