//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::Station;
use crate::transport::ConnectionQuery;

/// Connections returned when the request names no limit.
pub const DEFAULT_LIMIT: usize = 4;

/// Stations returned when the request names no limit.
pub const DEFAULT_STATION_LIMIT: usize = 10;

/// Upper bound on station results.
pub const MAX_STATION_LIMIT: usize = 50;

/// Request to look up stations by name.
#[derive(Debug, Deserialize)]
pub struct StationSearchRequest {
    /// Name or partial name
    pub q: String,

    /// Maximum results (defaults to 10, at most 50)
    pub limit: Option<usize>,
}

/// Station lookup results.
#[derive(Debug, Serialize)]
pub struct StationSearchResponse {
    pub stations: Vec<Station>,
}

/// Request to plan connections between two stations.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionsRequest {
    pub from: String,

    pub to: String,

    /// ISO 8601 timestamp (defaults to now)
    pub datetime: Option<String>,

    pub limit: Option<usize>,

    /// `1` or `true` to treat `datetime` as the latest arrival
    pub is_arrival_time: Option<String>,
}

impl ConnectionsRequest {
    pub fn into_query(self) -> ConnectionQuery {
        let arriving = self
            .is_arrival_time
            .as_deref()
            .is_some_and(|v| matches!(v.trim(), "1" | "true"));
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        let query = ConnectionQuery::new(self.from, self.to, limit);

        match self.datetime.filter(|d| !d.trim().is_empty()) {
            Some(dt) if arriving => query.arriving_by(dt),
            Some(dt) => query.at(dt),
            None => query,
        }
    }
}

/// Request for an area disruption check.
#[derive(Debug, Deserialize)]
pub struct DisruptionRequest {
    pub station: String,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: serde_json::Value) -> ConnectionsRequest {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn defaults_to_departing_now() {
        let query = request(serde_json::json!({"from": "Bern", "to": "Thun"})).into_query();

        assert_eq!(query.from, "Bern");
        assert_eq!(query.to, "Thun");
        assert_eq!(query.limit, DEFAULT_LIMIT);
        assert!(query.datetime.is_none());
        assert!(!query.is_arrival_time);
    }

    #[test]
    fn arrival_flag() {
        let query = request(serde_json::json!({
            "from": "Bern",
            "to": "Thun",
            "datetime": "2024-03-13T09:00:00+01:00",
            "limit": 2,
            "isArrivalTime": "1"
        }))
        .into_query();

        assert!(query.is_arrival_time);
        assert_eq!(query.limit, 2);
        assert_eq!(query.datetime.as_deref(), Some("2024-03-13T09:00:00+01:00"));
    }

    #[test]
    fn arrival_flag_without_time_is_ignored() {
        let query = request(serde_json::json!({
            "from": "Bern",
            "to": "Thun",
            "datetime": "",
            "isArrivalTime": "true"
        }))
        .into_query();

        assert!(query.datetime.is_none());
        assert!(!query.is_arrival_time);
    }

    #[test]
    fn zero_is_not_arrival() {
        let query = request(serde_json::json!({
            "from": "Bern",
            "to": "Thun",
            "datetime": "2024-03-13T09:00",
            "isArrivalTime": "0"
        }))
        .into_query();

        assert!(!query.is_arrival_time);
        assert!(query.datetime.is_some());
    }
}
