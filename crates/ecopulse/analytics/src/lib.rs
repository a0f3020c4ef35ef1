//! EcoPulse Analytics - Metric math for the enrichment pipeline
//!
//! Every function here is pure: no state, no I/O, no clock unless one is
//! passed in. The ingestion worker and the query service both call
//! [`enrich`] so stored and simulated records are derived identically.

#![deny(unsafe_code)]

pub mod alerts;
pub mod anomaly;
pub mod attribution;
pub mod carbon;
pub mod enrich;
pub mod forecast;
pub mod health;
pub mod rolling;
pub mod rounding;
pub mod severity;
pub mod trend;
pub mod whatif;

pub use alerts::alert_status;
pub use anomaly::anomaly_flags;
pub use attribution::compute_attribution;
pub use carbon::estimate_carbon;
pub use enrich::{dispersion_factor, enrich, heat_pollution_index, simulate, EnrichmentContext};
pub use forecast::forecast_next;
pub use health::compute_health_score;
pub use rolling::rolling_summary;
pub use rounding::round_to;
pub use severity::{classify_severity, is_peak_hour};
pub use trend::{compute_momentum, compute_volatility, VOLATILITY_WINDOW};
pub use whatif::apply_whatif;
