//! Area-wide disruption reports.

mod aggregator;
mod types;

pub use aggregator::{
    CONNECTIONS_PER_ROUTE, DisruptionAggregator, HUBS_PER_CHECK, candidate_hubs, sample_hubs,
};
pub use types::{AreaStatus, DelayedRoute, DisruptionReport};
