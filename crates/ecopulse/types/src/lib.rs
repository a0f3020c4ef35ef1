//! EcoPulse Types - Core data model for the analytics engine
//!
//! This crate holds the plain data that flows through the pipeline:
//! - [`RawReading`]: one sensor payload as it arrives from the event source
//! - [`EnrichedRecord`]: a reading plus every derived analytic
//! - [`ThresholdTable`]: per-metric warning/critical/emergency limits
//! - Alert and cross-sectional view types served by the query interface

#![deny(unsafe_code)]

pub mod alert;
pub mod reading;
pub mod record;
pub mod thresholds;
pub mod views;

pub use alert::Alert;
pub use reading::RawReading;
pub use record::{Attribution, CarbonFootprint, EnrichedRecord, Severity, WhatIfParams};
pub use thresholds::{Metric, MetricThresholds, ThresholdTable};
pub use views::{AnomalyFlags, DistrictView, NationalView, RollingSummary};
