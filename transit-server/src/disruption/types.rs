//! Disruption report types.

use serde::Serialize;

/// Area-wide service health around a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaStatus {
    Normal,
    MinorDelays,
    MajorDelays,
    Disrupted,
}

impl AreaStatus {
    /// Classify a tally of sampled routes. The first matching rule wins.
    pub fn classify(
        max_delay: u32,
        delayed_connections: usize,
        total_connections: usize,
        cancelled_or_missing: usize,
    ) -> Self {
        if cancelled_or_missing >= 2 || max_delay > 30 {
            AreaStatus::Disrupted
        } else if max_delay > 15 || delayed_connections as f64 > total_connections as f64 * 0.5 {
            AreaStatus::MajorDelays
        } else if max_delay > 5 || delayed_connections > 0 {
            AreaStatus::MinorDelays
        } else {
            AreaStatus::Normal
        }
    }

    /// One-line human summary for `station`.
    pub fn summary(self, station: &str) -> String {
        match self {
            AreaStatus::Normal => {
                format!("Services around {station} are running normally.")
            }
            AreaStatus::MinorDelays => {
                format!("Minor delays on some services from {station}.")
            }
            AreaStatus::MajorDelays => {
                format!("Significant delays on services from {station}. Allow extra time.")
            }
            AreaStatus::Disrupted => format!(
                "Services from {station} are disrupted. Check alternatives before travelling."
            ),
        }
    }
}

/// A leg found running late.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DelayedRoute {
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,
    pub delay_minutes: u32,
}

/// Outcome of sampling routes from a station to the main hubs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisruptionReport {
    pub station: String,
    /// RFC 3339, UTC.
    pub checked_at: String,
    pub routes_checked: usize,
    pub total_connections_checked: usize,
    /// Connections with at least one delayed leg.
    pub delayed_connections_count: usize,
    pub cancelled_or_missing: usize,
    /// Mean over delayed legs, one decimal.
    pub average_delay_minutes: f64,
    pub max_delay_minutes: u32,
    pub delayed_routes: Vec<DelayedRoute>,
    pub status: AreaStatus,
    pub summary: String,
}
