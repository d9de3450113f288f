//! Weather risk estimation over a handful of station samples.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use futures::future::join_all;
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::domain::time::{parse_timestamp, to_swiss_local};
use crate::domain::{Reason, ReasonList, RiskLevel, round2};

use super::cache::{SampleKey, WeatherCache, WeatherCacheConfig};
use super::client::ForecastProvider;
use super::types::{HourlyForecast, WeatherInsight, WeatherQuery, WeatherSample};

/// Queries beyond this many are dropped.
pub const MAX_SAMPLES: usize = 4;

/// Upper bound on the combined weather penalty.
pub const MAX_PENALTY: f64 = 0.35;

const MAX_REASONS: usize = 2;

/// Hour format used by the forecast provider.
const FORECAST_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Resolves weather samples through a cache and scores them.
pub struct WeatherRiskEstimator<F> {
    provider: F,
    cache: WeatherCache,
}

impl<F: ForecastProvider> WeatherRiskEstimator<F> {
    pub fn new(provider: F, config: &WeatherCacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            provider,
            cache: WeatherCache::new(config, clock),
        }
    }

    /// Sample the forecast at up to [`MAX_SAMPLES`] stations and assess the risk.
    ///
    /// Lookups run concurrently. A sample that cannot be resolved is left out.
    pub async fn estimate(&self, queries: &[WeatherQuery]) -> WeatherInsight {
        if queries.len() > MAX_SAMPLES {
            debug!(
                requested = queries.len(),
                kept = MAX_SAMPLES,
                "dropping extra weather samples"
            );
        }

        let lookups = queries.iter().take(MAX_SAMPLES).map(|q| self.sample(q));
        let samples = join_all(lookups).await.into_iter().flatten().collect();

        assess(samples)
    }

    async fn sample(&self, query: &WeatherQuery) -> Option<WeatherSample> {
        let Some(timestamp) = parse_timestamp(&query.time) else {
            warn!(station = %query.station, time = %query.time, "unparseable weather time");
            return None;
        };
        let local = to_swiss_local(&timestamp);
        let date = local.date_naive();
        let hour = local.hour();
        let key = SampleKey::new(query.lat, query.lon, date, hour);

        if let Some(cached) = self.cache.get(&key).await {
            debug!(station = %query.station, "weather cache hit");
            return Some(WeatherSample {
                station: query.station.clone(),
                lat: query.lat,
                lon: query.lon,
                ..cached
            });
        }

        let forecast = match self.provider.hourly_forecast(query.lat, query.lon, date).await {
            Ok(forecast) => forecast,
            Err(e) => {
                warn!(station = %query.station, error = %e, "weather lookup failed");
                return None;
            }
        };

        let Some(sample) = sample_at(&forecast, query, date, hour) else {
            debug!(station = %query.station, %date, hour, "forecast has no matching hour");
            return None;
        };

        self.cache.insert(key, sample.clone()).await;
        Some(sample)
    }
}

/// Pick the forecast hour matching `date` and `hour`. Missing values read as 0.
fn sample_at(
    forecast: &HourlyForecast,
    query: &WeatherQuery,
    date: NaiveDate,
    hour: u32,
) -> Option<WeatherSample> {
    let idx = forecast.time.iter().position(|t| {
        NaiveDateTime::parse_from_str(t, FORECAST_TIME_FORMAT)
            .is_ok_and(|dt| dt.date() == date && dt.hour() == hour)
    })?;

    Some(WeatherSample {
        station: query.station.clone(),
        time: forecast.time[idx].clone(),
        lat: query.lat,
        lon: query.lon,
        temperature: value_at(&forecast.temperature_2m, idx),
        precipitation: value_at(&forecast.precipitation, idx),
        snowfall: value_at(&forecast.snowfall, idx),
        wind_speed: value_at(&forecast.wind_speed_10m, idx),
        wind_gusts: value_at(&forecast.wind_gusts_10m, idx),
        weather_code: value_at(&forecast.weather_code, idx),
    })
}

fn value_at<T: Copy + Default>(values: &[Option<T>], idx: usize) -> T {
    values.get(idx).copied().flatten().unwrap_or_default()
}

/// Score a set of samples.
///
/// Each rule contributes at most once across the whole set, however many
/// samples trigger it.
pub fn assess(samples: Vec<WeatherSample>) -> WeatherInsight {
    let mut reasons = ReasonList::new();

    for s in &samples {
        if s.temperature < 1.0 && s.precipitation > 0.5 {
            reasons.push_once(Reason::new(
                "snow_risk",
                format!("Snow or ice likely at {}", s.station),
                0.20,
            ));
        }

        if s.precipitation > 5.0 {
            reasons.push_once(Reason::new(
                "heavy_rain",
                format!("Heavy rain at {} ({:.1} mm)", s.station, s.precipitation),
                0.12,
            ));
        } else if s.precipitation > 2.0 {
            reasons.push_once(Reason::new(
                "rain",
                format!("Rain at {} ({:.1} mm)", s.station, s.precipitation),
                0.06,
            ));
        }

        if s.wind_gusts > 60.0 {
            reasons.push_once(Reason::new(
                "high_wind",
                format!("Strong gusts at {} ({:.0} km/h)", s.station, s.wind_gusts),
                0.15,
            ));
        } else if s.wind_gusts > 40.0 {
            reasons.push_once(Reason::new(
                "wind",
                format!("Gusty wind at {} ({:.0} km/h)", s.station, s.wind_gusts),
                0.08,
            ));
        }

        if s.temperature < -5.0 {
            reasons.push_once(Reason::new(
                "freezing",
                format!("Freezing at {} ({:.0} °C)", s.station, s.temperature),
                0.05,
            ));
        }
    }

    let penalty = round2(reasons.total().min(MAX_PENALTY));
    let level = if penalty >= 0.20 {
        RiskLevel::High
    } else if penalty >= 0.08 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    WeatherInsight {
        level,
        penalty,
        reasons: reasons.into_ranked(MAX_REASONS),
        samples,
    }
}
