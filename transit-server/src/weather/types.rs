//! Weather sample, insight and forecast DTO types.

use serde::{Deserialize, Serialize};

use crate::domain::{Reason, RiskLevel};

/// Why the weather adds risk.
pub type WeatherReason = Reason;

/// A station and time to sample the forecast for.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherQuery {
    pub station: String,
    pub lat: f64,
    pub lon: f64,
    /// ISO 8601 timestamp.
    pub time: String,
}

impl WeatherQuery {
    pub fn new(station: impl Into<String>, lat: f64, lon: f64, time: impl Into<String>) -> Self {
        Self {
            station: station.into(),
            lat,
            lon,
            time: time.into(),
        }
    }
}

/// Forecast conditions at one station for one local hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSample {
    pub station: String,
    /// Local forecast hour, e.g. `2024-01-15T08:00`.
    pub time: String,
    pub lat: f64,
    pub lon: f64,
    /// °C
    pub temperature: f64,
    /// mm
    pub precipitation: f64,
    /// cm
    pub snowfall: f64,
    /// km/h
    pub wind_speed: f64,
    /// km/h
    pub wind_gusts: f64,
    /// WMO weather code.
    pub weather_code: i32,
}

/// Aggregate weather risk over a set of samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherInsight {
    pub level: RiskLevel,
    /// In `[0, 0.35]`.
    pub penalty: f64,
    pub reasons: Vec<WeatherReason>,
    pub samples: Vec<WeatherSample>,
}

/// Open-Meteo forecast response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub hourly: Option<HourlyForecast>,
}

/// Parallel arrays of hourly values, indexed by `time`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HourlyForecast {
    /// Local times like `2024-01-15T08:00`.
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    pub precipitation: Vec<Option<f64>>,
    #[serde(default)]
    pub snowfall: Vec<Option<f64>>,
    #[serde(default)]
    pub wind_speed_10m: Vec<Option<f64>>,
    #[serde(default)]
    pub wind_gusts_10m: Vec<Option<f64>>,
    #[serde(default)]
    pub weather_code: Vec<Option<i32>>,
}
