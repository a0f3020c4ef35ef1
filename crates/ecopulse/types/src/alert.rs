//! Threshold alerts

use crate::record::Severity;
use crate::thresholds::Metric;
use serde::{Deserialize, Serialize};

/// An active alert for one metric, at the highest level it breached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "type")]
    pub metric: Metric,
    pub level: Severity,
    pub value: f64,
    #[serde(rename = "msg")]
    pub message: String,
}
