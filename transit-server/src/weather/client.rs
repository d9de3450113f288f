//! Open-Meteo hourly forecast client.

use std::future::Future;

use chrono::NaiveDate;
use tracing::debug;

use super::error::ForecastError;
use super::types::{ForecastResponse, HourlyForecast};

/// Default base URL for the forecast API.
const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com/v1";

/// Hourly variables requested from the provider.
const HOURLY_FIELDS: &str =
    "temperature_2m,precipitation,snowfall,wind_speed_10m,wind_gusts_10m,weather_code";

/// Forecast times are requested in Swiss local time.
const TIMEZONE: &str = "Europe/Zurich";

/// Configuration for the forecast client.
#[derive(Debug, Clone)]
pub struct ForecastConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl ForecastConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 8,
        }
    }
}

/// Trait for fetching one local day of hourly forecast.
pub trait ForecastProvider: Send + Sync {
    fn hourly_forecast(
        &self,
        lat: f64,
        lon: f64,
        date: NaiveDate,
    ) -> impl Future<Output = Result<HourlyForecast, ForecastError>> + Send;
}

/// Open-Meteo API client.
#[derive(Debug, Clone)]
pub struct ForecastClient {
    http: reqwest::Client,
    base_url: String,
}

impl ForecastClient {
    pub fn new(config: ForecastConfig) -> Result<Self, ForecastError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl ForecastProvider for ForecastClient {
    async fn hourly_forecast(
        &self,
        lat: f64,
        lon: f64,
        date: NaiveDate,
    ) -> Result<HourlyForecast, ForecastError> {
        let url = format!("{}/forecast", self.base_url);
        let day = date.format("%Y-%m-%d").to_string();

        debug!(lat, lon, %day, "fetching hourly forecast");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("latitude", lat.to_string()),
                ("longitude", lon.to_string()),
                ("hourly", HOURLY_FIELDS.to_string()),
                ("timezone", TIMEZONE.to_string()),
                ("start_date", day.clone()),
                ("end_date", day),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ForecastError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let forecast: ForecastResponse =
            serde_json::from_str(&body).map_err(|e| ForecastError::Json {
                message: e.to_string(),
            })?;

        Ok(forecast.hourly.unwrap_or_default())
    }
}
