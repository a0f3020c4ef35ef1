//! Request handlers

mod metrics;
mod system;
mod views;

pub use metrics::*;
pub use system::*;
pub use views::*;
