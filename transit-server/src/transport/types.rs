//! Transport API response DTOs.
//!
//! These map directly to the provider's JSON. Live data is sparse outside
//! operating hours, so nearly every field is optional and absent values
//! are tolerated rather than rejected.

use serde::{Deserialize, Deserializer};

/// Response from `/connections`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConnectionsResponse {
    #[serde(default)]
    pub connections: Option<Vec<RawConnection>>,
}

impl ConnectionsResponse {
    pub fn connections(&self) -> &[RawConnection] {
        self.connections.as_deref().unwrap_or(&[])
    }
}

/// One journey option as returned by the provider.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConnection {
    #[serde(default)]
    pub from: Option<RawCheckpoint>,

    #[serde(default)]
    pub to: Option<RawCheckpoint>,

    /// Duration like `"00d01:23:00"`.
    #[serde(default)]
    pub duration: Option<String>,

    /// Number of ride-to-ride transfers.
    #[serde(default)]
    pub transfers: Option<u32>,

    #[serde(default)]
    pub sections: Option<Vec<RawSection>>,
}

impl RawConnection {
    pub fn sections(&self) -> &[RawSection] {
        self.sections.as_deref().unwrap_or(&[])
    }
}

/// One ride or walk within a connection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSection {
    #[serde(default)]
    pub journey: Option<RawJourney>,

    /// Present (non-null) only for walking sections.
    #[serde(default)]
    pub walk: Option<serde_json::Value>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub departure: RawCheckpoint,

    #[serde(default, deserialize_with = "null_as_default")]
    pub arrival: RawCheckpoint,
}

/// Treat an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The vehicle run a ride section travels on.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawJourney {
    /// Display name, e.g. "IC 1".
    #[serde(default)]
    pub name: Option<String>,

    /// Category code, e.g. "IC", "S".
    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub number: Option<String>,

    #[serde(default)]
    pub operator: Option<String>,

    /// Terminus of the run.
    #[serde(default)]
    pub to: Option<String>,

    #[serde(default)]
    pub pass_list: Option<Vec<RawCheckpoint>>,
}

/// A stop on a connection with scheduled and live data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCheckpoint {
    #[serde(default)]
    pub station: Option<RawStation>,

    #[serde(default)]
    pub arrival: Option<String>,

    #[serde(default)]
    pub departure: Option<String>,

    #[serde(default)]
    pub platform: Option<String>,

    #[serde(default)]
    pub prognosis: Option<RawPrognosis>,
}

impl RawCheckpoint {
    /// Station name, or empty if the provider omitted it.
    pub fn station_name(&self) -> &str {
        self.station
            .as_ref()
            .and_then(|s| s.name.as_deref())
            .unwrap_or("")
    }

    /// WGS84 (lat, lon), if the provider sent both.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let coordinate = self.station.as_ref()?.coordinate.as_ref()?;
        Some((coordinate.x?, coordinate.y?))
    }
}

/// Live override of scheduled values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPrognosis {
    #[serde(default)]
    pub arrival: Option<String>,

    #[serde(default)]
    pub departure: Option<String>,

    #[serde(default)]
    pub platform: Option<String>,
}

/// A station or stop as reported by the provider.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStation {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub coordinate: Option<RawCoordinate>,
}

/// WGS84 coordinate; `x` is latitude and `y` longitude.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RawCoordinate {
    #[serde(default)]
    pub x: Option<f64>,

    #[serde(default)]
    pub y: Option<f64>,
}

/// Response from `/locations`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationsResponse {
    #[serde(default)]
    pub stations: Option<Vec<RawStation>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_connection() {
        let json = r#"{
            "connections": [{
                "from": {
                    "station": {"id": "8507000", "name": "Bern", "coordinate": {"type": "WGS84", "x": 46.948825, "y": 7.439122}},
                    "departure": "2024-03-13T08:02:00+0100",
                    "platform": "7",
                    "prognosis": {"platform": null, "departure": null}
                },
                "to": {
                    "station": {"id": "8503000", "name": "Zürich HB"},
                    "arrival": "2024-03-13T08:58:00+0100"
                },
                "duration": "00d00:56:00",
                "transfers": 0,
                "sections": [{
                    "journey": {"name": "IC 1", "category": "IC", "number": "1", "operator": "SBB", "to": "St. Gallen", "passList": null},
                    "walk": null,
                    "departure": {"station": {"name": "Bern"}, "departure": "2024-03-13T08:02:00+0100", "platform": "7"},
                    "arrival": {"station": {"name": "Zürich HB"}, "arrival": "2024-03-13T08:58:00+0100", "platform": "32"}
                }]
            }]
        }"#;

        let response: ConnectionsResponse = serde_json::from_str(json).unwrap();
        let connections = response.connections();
        assert_eq!(connections.len(), 1);

        let c = &connections[0];
        assert_eq!(c.duration.as_deref(), Some("00d00:56:00"));
        assert_eq!(c.transfers, Some(0));

        let from = c.from.as_ref().unwrap();
        assert_eq!(from.station_name(), "Bern");
        let (lat, lon) = from.coordinates().unwrap();
        assert!((lat - 46.948825).abs() < 1e-9);
        assert!((lon - 7.439122).abs() < 1e-9);

        let section = &c.sections()[0];
        assert!(section.walk.is_none());
        let journey = section.journey.as_ref().unwrap();
        assert_eq!(journey.name.as_deref(), Some("IC 1"));
        assert!(journey.pass_list.is_none());
    }

    #[test]
    fn deserialize_walk_section() {
        let json = r#"{
            "journey": null,
            "walk": {"duration": 300},
            "departure": {"station": {"name": "Zürich HB"}, "departure": "2024-03-13T09:00:00+0100"},
            "arrival": {"station": {"name": "Zürich, Bahnhofquai/HB"}, "arrival": "2024-03-13T09:05:00+0100"}
        }"#;

        let section: RawSection = serde_json::from_str(json).unwrap();
        assert!(section.walk.is_some());
        assert!(section.journey.is_none());
    }

    #[test]
    fn null_checkpoint_defaults() {
        let section: RawSection = serde_json::from_str(r#"{"departure": null}"#).unwrap();
        assert_eq!(section.departure.station_name(), "");
        assert!(section.arrival.departure.is_none());
    }

    #[test]
    fn missing_fields_default() {
        let c: RawConnection = serde_json::from_str("{}").unwrap();
        assert!(c.from.is_none());
        assert!(c.sections().is_empty());

        let cp: RawCheckpoint = serde_json::from_str(r#"{"station": null}"#).unwrap();
        assert_eq!(cp.station_name(), "");
        assert!(cp.coordinates().is_none());
    }

    #[test]
    fn deserialize_locations() {
        let json = r#"{"stations": [
            {"id": "8507000", "name": "Bern"},
            {"id": null, "name": null}
        ]}"#;

        let response: LocationsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.stations.unwrap().len(), 2);
    }
}
