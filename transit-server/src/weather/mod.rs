//! Weather risk from the Open-Meteo hourly forecast.
//!
//! Samples are taken at a few stations along a connection, at the local
//! hour the traveller passes through, and cached for a short while since
//! many connections share the same stations and hours.

mod cache;
mod client;
mod error;
mod estimator;
mod types;

pub use cache::{SampleKey, WeatherCache, WeatherCacheConfig};
pub use client::{ForecastClient, ForecastConfig, ForecastProvider};
pub use error::ForecastError;
pub use estimator::{MAX_PENALTY, MAX_SAMPLES, WeatherRiskEstimator, assess};
pub use types::{
    ForecastResponse, HourlyForecast, WeatherInsight, WeatherQuery, WeatherReason, WeatherSample,
};
