//! Application state for the web layer.

use std::sync::Arc;

use crate::disruption::DisruptionAggregator;
use crate::planner::ConnectionPlanner;
use crate::transport::TransportClient;
use crate::weather::{ForecastClient, WeatherRiskEstimator};

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Connection planner (fetch, assemble, score)
    pub planner: Arc<ConnectionPlanner<TransportClient>>,

    /// Transport API client, for station lookups
    pub transport: TransportClient,

    /// Area disruption checks
    pub disruptions: Arc<DisruptionAggregator<TransportClient>>,

    /// Cached weather risk estimator
    pub weather: Arc<WeatherRiskEstimator<ForecastClient>>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        planner: ConnectionPlanner<TransportClient>,
        transport: TransportClient,
        disruptions: DisruptionAggregator<TransportClient>,
        weather: Arc<WeatherRiskEstimator<ForecastClient>>,
    ) -> Self {
        Self {
            planner: Arc::new(planner),
            transport,
            disruptions: Arc::new(disruptions),
            weather,
        }
    }
}
