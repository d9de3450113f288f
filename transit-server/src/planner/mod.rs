//! Connection planning.
//!
//! One call answers a connection query end to end: fetch the provider
//! page, assemble canonical connections, score each one for reliability
//! and, when enabled, sample the weather at the stations along the way.

mod plan;
mod points;

pub use plan::{ConnectionPlanner, PlanError, validate};
pub use points::weather_points;
