//! Area-wide disruption checks.
//!
//! Samples a few routes from a station to the main hubs, departing now,
//! and turns the live delays found on them into an area status.

use std::sync::Arc;

use chrono::SecondsFormat;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::domain::{ConnectionBatch, HUB_STATIONS};
use crate::transport::{ConnectionProvider, ConnectionQuery, assemble_connections};

use super::types::{AreaStatus, DelayedRoute, DisruptionReport};

/// Hubs sampled per check.
pub const HUBS_PER_CHECK: usize = 4;

/// Connections requested per sampled route.
pub const CONNECTIONS_PER_ROUTE: usize = 2;

/// Hubs worth checking from `station`.
///
/// A hub is left out when its first word appears in the station name, so
/// "Zürich Oerlikon" is never checked against "Zürich HB".
pub fn candidate_hubs(station: &str) -> Vec<&'static str> {
    let station = station.to_lowercase();
    HUB_STATIONS
        .iter()
        .copied()
        .filter(|hub| {
            hub.split_whitespace()
                .next()
                .is_none_or(|word| !station.contains(&word.to_lowercase()))
        })
        .collect()
}

/// A random selection of up to [`HUBS_PER_CHECK`] candidate hubs.
pub fn sample_hubs<R: Rng + ?Sized>(station: &str, rng: &mut R) -> Vec<&'static str> {
    let mut hubs = candidate_hubs(station);
    hubs.shuffle(rng);
    hubs.truncate(HUBS_PER_CHECK);
    hubs
}

fn pick_hubs(station: &str) -> Vec<&'static str> {
    sample_hubs(station, &mut rand::rng())
}

/// Running totals over the sampled routes.
#[derive(Debug, Default)]
struct Tally {
    total_connections: usize,
    delayed_connections: usize,
    cancelled_or_missing: usize,
    delays: Vec<u32>,
    delayed_routes: Vec<DelayedRoute>,
}

impl Tally {
    fn add(&mut self, batch: &ConnectionBatch) {
        self.total_connections += batch.connections.len();

        for connection in &batch.connections {
            let mut delayed = false;
            for leg in &connection.legs {
                let Some(delay) = leg.delay_minutes.filter(|d| *d > 0) else {
                    continue;
                };
                delayed = true;
                self.delays.push(delay);
                self.delayed_routes.push(DelayedRoute {
                    from: leg.from.name.clone(),
                    to: leg.to.name.clone(),
                    line: leg.line.clone(),
                    delay_minutes: delay,
                });
            }
            if delayed {
                self.delayed_connections += 1;
            }
        }
    }

    fn max_delay(&self) -> u32 {
        self.delays.iter().copied().max().unwrap_or(0)
    }

    fn average_delay(&self) -> f64 {
        if self.delays.is_empty() {
            return 0.0;
        }
        let sum: u32 = self.delays.iter().sum();
        let mean = f64::from(sum) / self.delays.len() as f64;
        (mean * 10.0).round() / 10.0
    }
}

/// Checks service health around a station.
pub struct DisruptionAggregator<P> {
    provider: P,
    clock: Arc<dyn Clock>,
}

impl<P: ConnectionProvider> DisruptionAggregator<P> {
    pub fn new(provider: P, clock: Arc<dyn Clock>) -> Self {
        Self { provider, clock }
    }

    /// Check routes from `station` to a random sample of hubs.
    pub async fn check(&self, station: &str) -> DisruptionReport {
        let hubs = pick_hubs(station);
        self.check_routes(station, &hubs).await
    }

    /// Check routes from `station` to each of `hubs`, one after another.
    ///
    /// A failed request or an empty result counts as cancelled or missing;
    /// it never fails the report.
    pub async fn check_routes(&self, station: &str, hubs: &[&str]) -> DisruptionReport {
        let mut tally = Tally::default();

        for hub in hubs {
            let query = ConnectionQuery::new(station, *hub, CONNECTIONS_PER_ROUTE);
            match self.provider.fetch_connections(&query).await {
                Ok(response) => {
                    let batch = assemble_connections(response.connections(), CONNECTIONS_PER_ROUTE);
                    if batch.is_empty() {
                        debug!(station, hub, "no connections found");
                        tally.cancelled_or_missing += 1;
                    } else {
                        tally.add(&batch);
                    }
                }
                Err(e) => {
                    warn!(station, hub, error = %e, "route check failed");
                    tally.cancelled_or_missing += 1;
                }
            }
        }

        let max_delay = tally.max_delay();
        let status = AreaStatus::classify(
            max_delay,
            tally.delayed_connections,
            tally.total_connections,
            tally.cancelled_or_missing,
        );

        info!(
            station,
            routes = hubs.len(),
            connections = tally.total_connections,
            delayed = tally.delayed_connections,
            missing = tally.cancelled_or_missing,
            max_delay,
            ?status,
            "disruption check complete"
        );

        DisruptionReport {
            station: station.to_string(),
            checked_at: self.clock.now().to_rfc3339_opts(SecondsFormat::Secs, true),
            routes_checked: hubs.len(),
            total_connections_checked: tally.total_connections,
            delayed_connections_count: tally.delayed_connections,
            cancelled_or_missing: tally.cancelled_or_missing,
            average_delay_minutes: tally.average_delay(),
            max_delay_minutes: max_delay,
            summary: status.summary(station),
            status,
            delayed_routes: tally.delayed_routes,
        }
    }
}
