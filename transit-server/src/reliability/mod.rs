//! Reliability scoring for assembled connections.
//!
//! Converts transfer margins, station size, time of day and live delays
//! into a bounded score, a risk level and the top reasons behind it.

mod config;
mod scorer;
mod types;

pub use config::ReliabilityConfig;
pub use scorer::{ReliabilityScorer, is_peak_time};
pub use types::{ReliabilityInsight, ReliabilityReason, TransferRisk};
