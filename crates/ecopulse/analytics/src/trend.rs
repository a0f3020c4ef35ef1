//! Short-term trend indicators over stored aqi history

use crate::rounding::round_to;

/// Number of prior records required before volatility is reported.
pub const VOLATILITY_WINDOW: usize = 10;

/// `current - previous`, rounded to two decimals; 0 without a previous aqi.
pub fn compute_momentum(current_aqi: f64, previous_aqi: Option<f64>) -> f64 {
    previous_aqi
        .map(|previous| round_to(current_aqi - previous, 2))
        .unwrap_or(0.0)
}

/// Population standard deviation of the last [`VOLATILITY_WINDOW`] prior
/// aqi values plus `current_aqi`, rounded to two decimals.
///
/// `prior_aqi` is in arrival order, newest last. Returns 0 while fewer than
/// [`VOLATILITY_WINDOW`] prior values exist.
pub fn compute_volatility(prior_aqi: &[f64], current_aqi: f64) -> f64 {
    if prior_aqi.len() < VOLATILITY_WINDOW {
        return 0.0;
    }

    let window = &prior_aqi[prior_aqi.len() - VOLATILITY_WINDOW..];
    let points = window.len() as f64 + 1.0;
    let mean = (window.iter().sum::<f64>() + current_aqi) / points;
    let variance = window
        .iter()
        .chain(std::iter::once(&current_aqi))
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / points;

    round_to(variance.sqrt(), 2)
}
