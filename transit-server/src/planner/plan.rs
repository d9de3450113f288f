//! Connection search with reliability scoring.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::ConnectionBatch;
use crate::domain::time::parse_timestamp;
use crate::reliability::ReliabilityScorer;
use crate::transport::{
    ConnectionProvider, ConnectionQuery, MAX_CONNECTIONS, TransportError, assemble_connections,
    batch_window,
};
use crate::weather::{ForecastClient, ForecastProvider, WeatherRiskEstimator};

use super::points::weather_points;

/// Error from connection planning.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// The provider call failed
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Invalid query
    #[error("invalid query: {0}")]
    InvalidRequest(String),
}

/// Check a query before it goes to the provider.
pub fn validate(query: &ConnectionQuery) -> Result<(), PlanError> {
    if query.from.trim().is_empty() {
        return Err(PlanError::InvalidRequest("origin is empty".to_string()));
    }
    if query.to.trim().is_empty() {
        return Err(PlanError::InvalidRequest("destination is empty".to_string()));
    }
    if let Some(datetime) = &query.datetime {
        if parse_timestamp(datetime).is_none() {
            return Err(PlanError::InvalidRequest(format!(
                "unparseable datetime: {datetime}"
            )));
        }
    }
    Ok(())
}

/// Fetches, assembles and scores connections.
pub struct ConnectionPlanner<P, F = ForecastClient> {
    provider: P,
    scorer: ReliabilityScorer,
    weather: Option<Arc<WeatherRiskEstimator<F>>>,
    fold_weather: bool,
}

impl<P: ConnectionProvider, F: ForecastProvider> ConnectionPlanner<P, F> {
    /// Create a planner without weather enrichment.
    pub fn new(provider: P, scorer: ReliabilityScorer) -> Self {
        Self {
            provider,
            scorer,
            weather: None,
            fold_weather: false,
        }
    }

    /// Sample the weather along every connection and attach it.
    ///
    /// The reliability score is left alone unless [`Self::fold_weather`]
    /// is also set.
    pub fn with_weather(mut self, estimator: Arc<WeatherRiskEstimator<F>>) -> Self {
        self.weather = Some(estimator);
        self
    }

    /// Add the attached weather penalty into the reliability score.
    pub fn fold_weather(mut self, fold: bool) -> Self {
        self.fold_weather = fold;
        self
    }

    /// Plan connections for `query`.
    ///
    /// A provider failure fails the whole batch. Weather lookups that fail
    /// only drop their sample.
    pub async fn plan(&self, query: &ConnectionQuery) -> Result<ConnectionBatch, PlanError> {
        validate(query)?;
        let limit = query.limit.clamp(1, MAX_CONNECTIONS);

        let response = self.provider.fetch_connections(query).await?;
        let raw = response.connections();
        let mut batch = assemble_connections(raw, limit);

        // Same window the assembler used, so raw and canonical stay paired
        let window: Vec<_> = batch_window(raw, limit).collect();

        for (connection, raw) in batch.connections.iter_mut().zip(window) {
            let weather = match &self.weather {
                Some(estimator) => {
                    let points = weather_points(raw);
                    if points.is_empty() {
                        debug!(id = %connection.id, "no weather sample points");
                        None
                    } else {
                        Some(estimator.estimate(&points).await)
                    }
                }
                None => None,
            };

            let insight = if self.fold_weather {
                self.scorer.score_with_weather(
                    &connection.legs,
                    &connection.departure_time,
                    weather.as_ref(),
                )
            } else {
                self.scorer.score(&connection.legs, &connection.departure_time)
            };
            connection.set_reliability(insight);
            connection.weather = weather;
        }

        info!(
            from = %query.from,
            to = %query.to,
            connections = batch.connections.len(),
            weather = self.weather.is_some(),
            fold_weather = self.fold_weather,
            "planned connections"
        );

        Ok(batch)
    }
}
