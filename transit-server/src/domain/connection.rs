//! Canonical connection model.
//!
//! These are the types handed to the presentation layer. Optional fields
//! are omitted from JSON rather than sent as `null`.

use serde::Serialize;

use crate::reliability::ReliabilityInsight;
use crate::weather::WeatherInsight;

/// A station. Identity is by name; the id is provider-assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Station {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
}

impl Station {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

/// A scheduled (and possibly live) time at a station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopTime {
    pub name: String,

    /// Scheduled time; empty when the provider sent none.
    pub time_planned: String,

    /// Live time, only when it differs from the scheduled one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_actual: Option<String>,

    /// Platform. A `!` marks a change from the scheduled platform.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

impl StopTime {
    /// The live time if known, otherwise the scheduled time.
    pub fn effective_time(&self) -> &str {
        self.time_actual.as_deref().unwrap_or(&self.time_planned)
    }

    /// Whether the provider flagged a platform change.
    pub fn has_platform_change(&self) -> bool {
        self.platform.as_deref().is_some_and(|p| p.contains('!'))
    }
}

/// How a leg is travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LegKind {
    Walk,
    Ride,
}

/// One uninterrupted ride or walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Leg {
    #[serde(rename = "type")]
    pub kind: LegKind,

    /// Line name; never set on walks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,

    pub from: StopTime,
    pub to: StopTime,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stops: Vec<StopTime>,

    /// Departure delay, only when strictly positive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_minutes: Option<u32>,
}

/// Comparative label assigned across a batch of connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tag {
    #[serde(rename = "fastest")]
    Fastest,
    #[serde(rename = "fewest transfers")]
    FewestTransfers,
    #[serde(rename = "recommended")]
    Recommended,
}

/// A complete journey option from origin to destination.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    /// Derived from departure time and line names. Stable across calls,
    /// not globally unique.
    pub id: String,
    pub departure_time: String,
    pub arrival_time: String,

    /// Zero when the provider duration could not be parsed.
    pub duration_minutes: u32,

    /// Provider-reported transfers (ride legs only), kept for display.
    pub transfers_count: u32,

    pub legs: Vec<Leg>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reliability_score: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reliability: Option<ReliabilityInsight>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherInsight>,

    pub tags: Vec<Tag>,
}

impl Connection {
    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }

    /// Attach a reliability assessment.
    pub fn set_reliability(&mut self, insight: ReliabilityInsight) {
        self.reliability_score = Some(insight.score);
        self.reliability = Some(insight);
    }
}

/// All connections returned for one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionBatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_station: Option<Station>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_station: Option<Station>,
    pub connections: Vec<Connection>,
}

impl ConnectionBatch {
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
