//! Time-limited cache for weather samples.
//!
//! Entries carry their own expiry instant, checked against an injectable
//! clock on lookup. Stale entries are evicted lazily when looked up; there
//! is no background sweep. A duplicate fetch racing on the same key simply
//! overwrites with an equivalent sample.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use moka::future::Cache as MokaCache;

use crate::clock::Clock;

use super::types::WeatherSample;

/// Cache key: coordinates rounded to 0.01° plus the local date and hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SampleKey {
    lat_centi: i32,
    lon_centi: i32,
    date: NaiveDate,
    hour: u32,
}

impl SampleKey {
    pub fn new(lat: f64, lon: f64, date: NaiveDate, hour: u32) -> Self {
        Self {
            lat_centi: (lat * 100.0).round() as i32,
            lon_centi: (lon * 100.0).round() as i32,
            date,
            hour,
        }
    }
}

/// Configuration for the weather cache.
#[derive(Debug, Clone)]
pub struct WeatherCacheConfig {
    /// How long a sample stays valid.
    pub ttl: Duration,

    /// Maximum number of cached samples.
    pub max_capacity: u64,
}

impl Default for WeatherCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(15 * 60),
            max_capacity: 1000,
        }
    }
}

#[derive(Debug, Clone)]
struct CachedSample {
    sample: WeatherSample,
    expires_at: DateTime<Utc>,
}

/// Weather samples keyed by rounded location and local hour.
pub struct WeatherCache {
    samples: MokaCache<SampleKey, CachedSample>,
    ttl: chrono::Duration,
    clock: Arc<dyn Clock>,
}

impl WeatherCache {
    pub fn new(config: &WeatherCacheConfig, clock: Arc<dyn Clock>) -> Self {
        let samples = MokaCache::builder()
            .max_capacity(config.max_capacity)
            .build();
        let ttl = chrono::Duration::from_std(config.ttl)
            .unwrap_or_else(|_| chrono::Duration::minutes(15));

        Self {
            samples,
            ttl,
            clock,
        }
    }

    /// Get a fresh sample, evicting it if it has expired.
    pub async fn get(&self, key: &SampleKey) -> Option<WeatherSample> {
        let cached = self.samples.get(key).await?;
        if cached.expires_at > self.clock.now() {
            return Some(cached.sample);
        }
        self.samples.invalidate(key).await;
        None
    }

    /// Store a sample, valid for the configured TTL from now.
    pub async fn insert(&self, key: SampleKey, sample: WeatherSample) {
        let expires_at = self.clock.now() + self.ttl;
        self.samples
            .insert(key, CachedSample { sample, expires_at })
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::TimeZone;

    fn sample() -> WeatherSample {
        WeatherSample {
            station: "Bern".into(),
            time: "2024-01-15T08:00".into(),
            lat: 46.9488,
            lon: 7.4391,
            temperature: 2.0,
            precipitation: 0.0,
            snowfall: 0.0,
            wind_speed: 8.0,
            wind_gusts: 15.0,
            weather_code: 2,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    fn setup() -> (Arc<ManualClock>, WeatherCache) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 1, 15, 7, 0, 0).unwrap(),
        ));
        let cache = WeatherCache::new(&WeatherCacheConfig::default(), clock.clone());
        (clock, cache)
    }

    #[test]
    fn key_rounds_coordinates() {
        let a = SampleKey::new(46.9488, 7.4391, date(), 8);
        let b = SampleKey::new(46.9512, 7.4449, date(), 8);
        let c = SampleKey::new(46.9600, 7.4391, date(), 8);
        let d = SampleKey::new(46.9488, 7.4391, date(), 9);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[tokio::test]
    async fn hit_within_ttl() {
        let (clock, cache) = setup();
        let key = SampleKey::new(46.9488, 7.4391, date(), 8);

        cache.insert(key, sample()).await;
        clock.advance(chrono::Duration::minutes(14));

        assert_eq!(cache.get(&key).await, Some(sample()));
    }

    #[tokio::test]
    async fn expired_entry_is_evicted_on_lookup() {
        let (clock, cache) = setup();
        let key = SampleKey::new(46.9488, 7.4391, date(), 8);

        cache.insert(key, sample()).await;
        clock.advance(chrono::Duration::minutes(15));

        assert_eq!(cache.get(&key).await, None);
        assert_eq!(cache.get(&key).await, None);
    }

    #[tokio::test]
    async fn miss_for_unknown_key() {
        let (_clock, cache) = setup();
        let key = SampleKey::new(47.3769, 8.5417, date(), 8);
        assert_eq!(cache.get(&key).await, None);
    }

    #[test]
    fn default_config() {
        let config = WeatherCacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(900));
        assert_eq!(config.max_capacity, 1000);
    }
}
