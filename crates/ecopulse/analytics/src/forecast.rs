//! Next-step aqi forecast

use crate::rounding::round_to;

/// Fewest points a forecast is fitted on.
pub const MIN_FORECAST_POINTS: usize = 5;

/// Fit an ordinary least-squares line through `history` (x = 0..n) and
/// evaluate it at x = n. `None` with fewer than [`MIN_FORECAST_POINTS`].
pub fn forecast_next(history: &[f64]) -> Option<f64> {
    if history.len() < MIN_FORECAST_POINTS {
        return None;
    }

    let n = history.len() as f64;
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = history.iter().sum::<f64>() / n;

    let (covariance, spread) = history
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(cov, var), (i, y)| {
            let dx = i as f64 - mean_x;
            (cov + dx * (y - mean_y), var + dx * dx)
        });

    let slope = covariance / spread;
    let intercept = mean_y - slope * mean_x;
    Some(round_to(intercept + slope * n, 2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_short_history_has_no_forecast() {
        assert_eq!(forecast_next(&[10.0, 20.0, 30.0, 40.0]), None);
    }

    #[test]
    fn linear_history_extrapolates() {
        assert_eq!(forecast_next(&[10.0, 20.0, 30.0, 40.0, 50.0]), Some(60.0));
    }

    #[test]
    fn flat_history_stays_flat() {
        assert_eq!(forecast_next(&[72.5; 8]), Some(72.5));
    }
}
